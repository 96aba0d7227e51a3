//! Error types for the playground project tree.
//!
//! One error hierarchy is shared by every crate in the workspace. Variants
//! carry the path, project or name that caused them so the UI layer can
//! surface the failure next to the offending action.
//!
//! # Examples
//!
//! ```
//! use playground_core::{Error, Result};
//!
//! fn ensure_name(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(Error::InvalidPath {
//!             path: name.to_string(),
//!             reason: "name cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = ensure_name("").unwrap_err();
//! assert!(err.is_invalid_path());
//! assert!(err.is_user_error());
//! ```

use thiserror::Error;

/// Main error type for playground operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A path or name is empty or malformed.
    ///
    /// Raised during tree construction for empty segments, leading or
    /// trailing separators and `.`/`..` segments, and during mutation for
    /// names that cannot be display names.
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending path or name
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// A sibling with the same display name already exists.
    #[error("'{name}' already exists in '{parent}'")]
    DuplicateName {
        /// Logical path of the folder holding the collision (empty for root)
        parent: String,
        /// The colliding display name
        name: String,
    },

    /// No node exists at the given logical path, or no open entry has the given id.
    #[error("Not found: {path}")]
    NotFound {
        /// The path or id that was not found
        path: String,
    },

    /// The path exists but is a file where a folder was expected.
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The path that is not a folder
        path: String,
    },

    /// The path exists but is a folder where a file was expected.
    #[error("Not a file: {path}")]
    NotAFile {
        /// The path that is not a file
        path: String,
    },

    /// The persistence gateway failed to load or save a project.
    ///
    /// Never retried by the core; retry policy belongs to the gateway.
    #[error("Failed to persist project '{project}'")]
    PersistenceFailure {
        /// Project whose document could not be stored or retrieved
        project: String,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The mount gateway rejected a write, mount or removal.
    #[error("Failed to write '{path}' to the mounted runtime")]
    MountWriteFailure {
        /// Logical path of the rejected write (empty for a wholesale mount)
        path: String,
        /// Underlying error cause
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// JSON conversion of a project document or listing failed.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// A function argument or CLI value is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Local filesystem access failed while scanning or storing.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Filesystem path involved in the failure
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if this is an invalid path error.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` if this is a duplicate name error.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_core::Error;
    ///
    /// let err = Error::DuplicateName {
    ///     parent: "src".to_string(),
    ///     name: "index.ts".to_string(),
    /// };
    /// assert!(err.is_duplicate_name());
    /// assert_eq!(err.to_string(), "'index.ts' already exists in 'src'");
    /// ```
    #[must_use]
    pub const fn is_duplicate_name(&self) -> bool {
        matches!(self, Self::DuplicateName { .. })
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if a node had the wrong kind (file vs folder).
    #[must_use]
    pub const fn is_kind_mismatch(&self) -> bool {
        matches!(self, Self::NotADirectory { .. } | Self::NotAFile { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if the error should be shown inline at the offending action.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidPath { .. } | Self::DuplicateName { .. })
    }

    /// Returns `true` if an external gateway failed.
    ///
    /// Boundary failures leave the in-memory tree and working set intact.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_core::Error;
    ///
    /// let err = Error::MountWriteFailure {
    ///     path: "src/index.ts".to_string(),
    ///     source: "runtime stopped".into(),
    /// };
    /// assert!(err.is_boundary_error());
    /// assert!(!err.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_boundary_error(&self) -> bool {
        matches!(
            self,
            Self::PersistenceFailure { .. } | Self::MountWriteFailure { .. }
        )
    }

    /// Wraps a serde error with a short description.
    #[must_use]
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Wraps an I/O error with the path it happened at.
    #[must_use]
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Result type alias for playground operations.
pub type Result<T> = std::result::Result<T, Error>;
