//! CLI primitive types shared by the `playground` binary.
//!
//! # Examples
//!
//! ```
//! use playground_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format.as_str(), "json");
//!
//! assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
//! ```

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// CLI output format.
///
/// All formats carry the same information; only presentation differs.
///
/// # Examples
///
/// ```
/// use playground_core::cli::OutputFormat;
///
/// let format: OutputFormat = "Pretty".parse().unwrap();
/// assert_eq!(format, OutputFormat::Pretty);
/// assert!("yaml".parse::<OutputFormat>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// JSON output for machine parsing
    Json,
    /// Plain text output for scripts
    Text,
    /// Colored tree output for humans
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::InvalidArgument(format!(
                "invalid output format: '{s}' (expected: json, text, or pretty)"
            ))),
        }
    }
}

/// CLI exit code with semantic meaning.
///
/// # Examples
///
/// ```
/// use playground_core::Error;
/// use playground_core::cli::ExitCode;
///
/// let err = Error::NotFound { path: "src".to_string() };
/// assert_eq!(ExitCode::for_error(&err), ExitCode::NOT_FOUND);
/// assert!(!ExitCode::NOT_FOUND.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// General error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Invalid input, path or arguments (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// Storage or mount gateway failure (exit code 3).
    pub const BOUNDARY_ERROR: Self = Self(3);

    /// Requested path or project does not exist (exit code 4).
    pub const NOT_FOUND: Self = Self(4);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Picks the exit code that matches an error's classification.
    #[must_use]
    pub const fn for_error(error: &Error) -> Self {
        if error.is_not_found() {
            Self::NOT_FOUND
        } else if error.is_boundary_error() {
            Self::BOUNDARY_ERROR
        } else if error.is_user_error()
            || error.is_kind_mismatch()
            || error.is_config_error()
            || matches!(error, Error::InvalidArgument(_))
        {
            Self::INVALID_INPUT
        } else {
            Self::ERROR
        }
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Pretty);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("".parse::<OutputFormat>().is_err());
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Pretty.to_string(), "pretty");
    }

    #[test]
    fn test_exit_code_constants() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::ERROR.as_i32(), 1);
        assert_eq!(ExitCode::INVALID_INPUT.as_i32(), 2);
        assert_eq!(ExitCode::BOUNDARY_ERROR.as_i32(), 3);
        assert_eq!(ExitCode::NOT_FOUND.as_i32(), 4);
        assert_eq!(ExitCode::default(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_exit_code_for_error() {
        let cases = [
            (
                Error::DuplicateName {
                    parent: String::new(),
                    name: "a.ts".to_string(),
                },
                ExitCode::INVALID_INPUT,
            ),
            (
                Error::NotAFile {
                    path: "src".to_string(),
                },
                ExitCode::INVALID_INPUT,
            ),
            (
                Error::PersistenceFailure {
                    project: "p".to_string(),
                    source: "down".into(),
                },
                ExitCode::BOUNDARY_ERROR,
            ),
            (
                Error::NotFound {
                    path: "x".to_string(),
                },
                ExitCode::NOT_FOUND,
            ),
            (
                Error::SerializationError {
                    message: "bad".to_string(),
                    source: None,
                },
                ExitCode::ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ExitCode::for_error(&error), expected, "{error}");
        }
    }

    #[test]
    fn test_exit_code_into_i32() {
        let value: i32 = ExitCode::BOUNDARY_ERROR.into();
        assert_eq!(value, 3);
        assert_eq!(ExitCode::from_i32(42).to_string(), "42");
    }
}
