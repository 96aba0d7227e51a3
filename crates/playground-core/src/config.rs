//! Configuration for imports, template scans and project storage.
//!
//! Configuration is stored as TOML. Every section is optional; missing keys
//! fall back to the defaults below.
//!
//! ```toml
//! [general]
//! default_format = "pretty"
//! log_level = "info"
//!
//! [import]
//! max_file_size = 1048576
//! root_name = "my-app"
//!
//! [scan]
//! max_file_size = 1048576
//! ignore_files = ["secrets.json"]
//! ignore_folders = ["tmp"]
//! ignore_patterns = ["\\.bak$"]
//!
//! [storage]
//! projects_dir = "/home/me/.local/share/playground/projects"
//! ```
//!
//! # Examples
//!
//! ```
//! use playground_core::PlaygroundConfig;
//!
//! let config = PlaygroundConfig::from_toml_str("[scan]\nmax_file_size = 2048\n").unwrap();
//! assert_eq!(config.scan.max_file_size, Some(2048));
//! assert_eq!(config.general.default_format, "pretty");
//! assert!(config.validate().is_ok());
//! ```

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default byte ceiling for imported and scanned file content (1 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

const VALID_FORMATS: [&str; 3] = ["json", "text", "pretty"];
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level playground configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PlaygroundConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Repository import settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Template directory scan settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Project storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// General configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format (json, text, pretty)
    pub default_format: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_format: "pretty".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Repository import settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImportConfig {
    /// Byte ceiling above which imported content becomes a placeholder.
    ///
    /// `None` disables the ceiling.
    pub max_file_size: Option<u64>,

    /// Name of the root folder of imported trees.
    ///
    /// `None` names the root after the imported listing.
    pub root_name: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
            root_name: None,
        }
    }
}

/// Template directory scan settings.
///
/// The ignore lists are appended to the built-in defaults of the scanner;
/// they never replace them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// Extra file names to skip (exact names with extension)
    pub ignore_files: Vec<String>,

    /// Extra folder names to skip
    pub ignore_folders: Vec<String>,

    /// Extra regular expressions matched against file names
    pub ignore_patterns: Vec<String>,

    /// Byte ceiling above which scanned content becomes a placeholder
    pub max_file_size: Option<u64>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_files: Vec::new(),
            ignore_folders: Vec::new(),
            ignore_patterns: Vec::new(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }
}

/// Project storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one `<project-id>.json` document per project
    pub projects_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
        }
    }
}

fn default_projects_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".playground/projects"),
        |dir| dir.join("playground").join("projects"),
    )
}

impl PlaygroundConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_core::PlaygroundConfig;
    ///
    /// let config = PlaygroundConfig::builder()
    ///     .scan_max_file_size(Some(4096))
    ///     .ignore_folder("vendor")
    ///     .build();
    ///
    /// assert_eq!(config.scan.max_file_size, Some(4096));
    /// assert_eq!(config.scan.ignore_folders, vec!["vendor".to_string()]);
    /// ```
    #[must_use]
    pub fn builder() -> PlaygroundConfigBuilder {
        PlaygroundConfigBuilder::new()
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the text is not valid TOML or does not
    /// match the configuration schema.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("failed to parse configuration: {e}"),
        })
    }

    /// Renders the configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigError {
            message: format!("failed to serialize configuration: {e}"),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if:
    /// - the default format or log level is unknown
    /// - a byte ceiling is zero
    /// - the import root name is empty
    /// - an ignore pattern is not a valid regular expression
    /// - the projects directory is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_core::PlaygroundConfig;
    ///
    /// let mut config = PlaygroundConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.scan.ignore_patterns.push("(unclosed".to_string());
    /// assert!(config.validate().unwrap_err().is_config_error());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if !VALID_FORMATS.contains(&self.general.default_format.as_str()) {
            return Err(config_error(format!(
                "invalid default_format '{}', must be one of: {}",
                self.general.default_format,
                VALID_FORMATS.join(", ")
            )));
        }

        if !VALID_LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(config_error(format!(
                "invalid log_level '{}', must be one of: {}",
                self.general.log_level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if self.import.max_file_size == Some(0) {
            return Err(config_error("import.max_file_size must be greater than 0"));
        }

        if let Some(name) = &self.import.root_name
            && name.trim().is_empty()
        {
            return Err(config_error("import.root_name cannot be empty"));
        }

        if self.scan.max_file_size == Some(0) {
            return Err(config_error("scan.max_file_size must be greater than 0"));
        }

        for pattern in &self.scan.ignore_patterns {
            Regex::new(pattern).map_err(|e| {
                config_error(format!("invalid scan.ignore_patterns entry '{pattern}': {e}"))
            })?;
        }

        if self.storage.projects_dir.as_os_str().is_empty() {
            return Err(config_error("storage.projects_dir cannot be empty"));
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::ConfigError {
        message: message.into(),
    }
}

/// Builder for `PlaygroundConfig`.
#[derive(Debug, Default)]
pub struct PlaygroundConfigBuilder {
    config: PlaygroundConfig,
}

impl PlaygroundConfigBuilder {
    /// Creates a builder seeded with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the import byte ceiling.
    #[must_use]
    pub const fn import_max_file_size(mut self, limit: Option<u64>) -> Self {
        self.config.import.max_file_size = limit;
        self
    }

    /// Sets the root folder name of imported trees.
    #[must_use]
    pub fn import_root_name(mut self, name: impl Into<String>) -> Self {
        self.config.import.root_name = Some(name.into());
        self
    }

    /// Sets the scan byte ceiling.
    #[must_use]
    pub const fn scan_max_file_size(mut self, limit: Option<u64>) -> Self {
        self.config.scan.max_file_size = limit;
        self
    }

    /// Adds a file name to skip while scanning.
    #[must_use]
    pub fn ignore_file(mut self, name: impl Into<String>) -> Self {
        self.config.scan.ignore_files.push(name.into());
        self
    }

    /// Adds a folder name to skip while scanning.
    #[must_use]
    pub fn ignore_folder(mut self, name: impl Into<String>) -> Self {
        self.config.scan.ignore_folders.push(name.into());
        self
    }

    /// Adds a file-name regular expression to skip while scanning.
    #[must_use]
    pub fn ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.scan.ignore_patterns.push(pattern.into());
        self
    }

    /// Sets the directory that holds project documents.
    #[must_use]
    pub fn projects_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.storage.projects_dir = dir.into();
        self
    }

    /// Sets the default output format.
    #[must_use]
    pub fn default_format(mut self, format: impl Into<String>) -> Self {
        self.config.general.default_format = format.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> PlaygroundConfig {
        self.config
    }
}
