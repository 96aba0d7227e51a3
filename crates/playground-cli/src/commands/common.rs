//! Common utilities shared across CLI commands.
//!
//! Resolves the effective configuration (file, then flags), opens the
//! project store and prints command results in the requested format.

use anyhow::{Context as _, Result};
use playground_core::cli::OutputFormat;
use playground_core::{Error, PlaygroundConfig, ProjectId};
use playground_session::{
    DirectoryMount, JsonFileStore, MemoryMount, MountGateway, PersistenceGateway,
    PlaygroundSession,
};
use playground_tree::FolderNode;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Effective settings of one CLI invocation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Configuration after flag overrides
    pub config: PlaygroundConfig,
    /// Configuration file the settings were read from (it may not exist)
    pub config_path: PathBuf,
    /// Output format
    pub format: OutputFormat,
}

impl Context {
    /// Loads the configuration file and applies the global flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, the result is
    /// invalid, or `format` is not a known output format.
    pub fn load(
        config_path: Option<PathBuf>,
        projects_dir: Option<PathBuf>,
        format: Option<&str>,
    ) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => default_config_path()?,
        };
        let mut config = load_config(&config_path)?;
        if let Some(dir) = projects_dir {
            config.storage.projects_dir = dir;
        }
        config.validate()?;

        let format = format
            .unwrap_or(&config.general.default_format)
            .parse::<OutputFormat>()?;

        Ok(Self {
            config,
            config_path,
            format,
        })
    }

    /// Context for a given configuration, without touching the disk.
    #[must_use]
    pub fn with_config(config: PlaygroundConfig, format: OutputFormat) -> Self {
        Self {
            config,
            config_path: PathBuf::from("config.toml"),
            format,
        }
    }

    /// Document store under the configured projects directory.
    #[must_use]
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.config.storage.projects_dir)
    }

    /// Formats `data` and prints it to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails.
    pub fn print<T: Serialize>(&self, data: &T) -> Result<()> {
        let formatted =
            crate::formatters::format_output(data, self.format).context("failed to format output")?;
        println!("{formatted}");
        Ok(())
    }
}

/// Default configuration file path.
///
/// - Linux: `~/.config/playground/config.toml`
/// - macOS: `~/Library/Application Support/playground/config.toml`
/// - Windows: `%APPDATA%\playground\config.toml`
///
/// # Errors
///
/// Returns an error if the platform has no configuration directory.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("failed to determine config directory")?;
    Ok(config_dir.join("playground").join("config.toml"))
}

/// Loads the configuration at `path`, or the defaults if there is none.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<PlaygroundConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(PlaygroundConfig::default());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = PlaygroundConfig::from_toml_str(&text)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Uses the given project id or generates one.
#[must_use]
pub fn project_id(project: Option<String>) -> ProjectId {
    project.map_or_else(ProjectId::generate, ProjectId::new)
}

/// Result of a command that produced or changed a project.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProjectSummary {
    /// Project id
    pub project: String,
    /// Root folder name
    pub root: String,
    /// Number of files
    pub files: usize,
    /// Number of folders, excluding the root
    pub folders: usize,
    /// Session revision after the command
    pub revision: String,
    /// Directory the project was materialized into, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mounted_at: Option<String>,
}

impl ProjectSummary {
    /// Summarizes a session.
    #[must_use]
    pub fn of<P, M>(session: &PlaygroundSession<P, M>, mounted_at: Option<&Path>) -> Self
    where
        P: PersistenceGateway,
        M: MountGateway,
    {
        let tree = session.tree();
        Self {
            project: session.project().to_string(),
            root: tree.folder_name.clone(),
            files: tree.file_count(),
            folders: tree.folder_count(),
            revision: session.revision().to_string(),
            mounted_at: mounted_at.map(|p| p.display().to_string()),
        }
    }
}

/// Persists a new project and optionally materializes it into `mount`.
///
/// # Errors
///
/// Returns the persistence or mount error.
pub async fn create_project(
    ctx: &Context,
    project: ProjectId,
    tree: FolderNode,
    mount: Option<&Path>,
) -> Result<ProjectSummary> {
    let store = ctx.store();
    let summary = match mount {
        Some(dir) => {
            let session =
                PlaygroundSession::create(project, tree, store, DirectoryMount::new(dir)).await?;
            ProjectSummary::of(&session, Some(dir))
        }
        None => {
            let session = PlaygroundSession::create(project, tree, store, MemoryMount::new()).await?;
            ProjectSummary::of(&session, None)
        }
    };
    info!(project = %summary.project, files = summary.files, "stored project");
    Ok(summary)
}

/// Fails with `Error::NotFound` unless the store holds `project`.
///
/// # Errors
///
/// Returns `Error::NotFound` for an unknown project, or the store error.
pub async fn ensure_project_exists(store: &JsonFileStore, project: &ProjectId) -> Result<()> {
    if store.load(project).await?.is_none() {
        return Err(Error::NotFound {
            path: format!("project {project}"),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, PlaygroundConfig::default());
    }

    #[test]
    fn test_context_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[general]\ndefault_format = \"text\"\n\n[storage]\nprojects_dir = \"/from/file\"\n",
        )
        .unwrap();

        let ctx = Context::load(Some(path.clone()), None, None).unwrap();
        assert_eq!(ctx.format, OutputFormat::Text);
        assert_eq!(ctx.config.storage.projects_dir, PathBuf::from("/from/file"));

        let ctx = Context::load(Some(path), Some(dir.path().to_path_buf()), Some("json")).unwrap();
        assert_eq!(ctx.format, OutputFormat::Json);
        assert_eq!(ctx.config.storage.projects_dir, dir.path());
    }

    #[test]
    fn test_context_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scan]\nmax_file_size = 0\n").unwrap();
        assert!(Context::load(Some(path), None, None).is_err());
    }

    #[test]
    fn test_project_id() {
        assert_eq!(project_id(Some("demo".to_string())).as_str(), "demo");
        assert_ne!(project_id(None), project_id(None));
    }
}
