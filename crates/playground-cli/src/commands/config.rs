//! Config command implementation.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/playground/config.toml`
//! - macOS: `~/Library/Application Support/playground/config.toml`
//! - Windows: `%APPDATA%\playground\config.toml`
//!
//! `--config` or `PLAYGROUND_CONFIG` point at another file.
//!
//! ```toml
//! [general]
//! default_format = "pretty"
//! log_level = "info"
//!
//! [import]
//! max_file_size = 1048576
//!
//! [scan]
//! ignore_folders = ["coverage"]
//! ignore_patterns = ['\.snap$']
//!
//! [storage]
//! projects_dir = "/home/me/.local/share/playground/projects"
//! ```

use super::common::Context;
use crate::actions::ConfigAction;
use anyhow::{Context as _, Result};
use playground_core::PlaygroundConfig;
use playground_core::cli::ExitCode;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Initialization result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Whether a file was written
    pub success: bool,
    /// Status message
    pub message: String,
    /// Configuration file path
    pub path: String,
}

/// Configuration file location.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigPath {
    /// Configuration file path
    pub path: String,
    /// Whether the file exists
    pub exists: bool,
}

/// Runs the config command.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be written or the
/// output cannot be formatted.
pub async fn run(ctx: &Context, action: ConfigAction) -> Result<ExitCode> {
    debug!(?action, "config action");

    match action {
        ConfigAction::Init { force } => {
            let result = init_config(&ctx.config_path, force).await?;
            ctx.print(&result)?;
        }
        ConfigAction::Show => ctx.print(&ctx.config)?,
        ConfigAction::Path => ctx.print(&ConfigPath {
            path: ctx.config_path.display().to_string(),
            exists: ctx.config_path.exists(),
        })?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Writes the default configuration to `path`.
///
/// An existing file is kept unless `force` is set.
///
/// # Errors
///
/// Returns an error if the file or its directory cannot be written.
pub async fn init_config(path: &Path, force: bool) -> Result<InitResult> {
    if path.exists() && !force {
        return Ok(InitResult {
            success: false,
            message: "configuration file already exists".to_string(),
            path: path.display().to_string(),
        });
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .context("failed to create config directory")?;
    }
    let text = PlaygroundConfig::default().to_toml_string()?;
    tokio::fs::write(path, text)
        .await
        .context("failed to write config file")?;
    info!(path = %path.display(), "wrote default configuration");

    Ok(InitResult {
        success: true,
        message: "configuration file created with default values".to_string(),
        path: path.display().to_string(),
    })
}
