//! Scan command implementation.
//!
//! Turns a local template directory into a stored project.

use super::common::{Context, ProjectSummary, create_project, project_id};
use anyhow::Result;
use playground_core::cli::ExitCode;
use playground_tree::{ScanOptions, ScanStats, TemplateScanner};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Arguments of the scan command.
#[derive(Debug, Clone, Default)]
pub struct ScanCommand {
    /// Template directory
    pub dir: PathBuf,
    /// Project id; generated when absent
    pub project: Option<String>,
    /// Root folder name override
    pub root_name: Option<String>,
    /// Byte ceiling override
    pub max_file_size: Option<u64>,
    /// Extra file names to ignore
    pub ignore_files: Vec<String>,
    /// Extra folder names to ignore
    pub ignore_folders: Vec<String>,
    /// Directory to materialize the project into
    pub mount: Option<PathBuf>,
}

/// Output of the scan command.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Stored project
    #[serde(flatten)]
    pub summary: ProjectSummary,
    /// Scan statistics
    pub stats: ScanStats,
}

/// Scanner options: configuration first, then command-line additions.
///
/// # Errors
///
/// Returns an error if a configured ignore pattern does not compile.
pub fn scan_options(ctx: &Context, command: &ScanCommand) -> Result<ScanOptions> {
    let mut options = ScanOptions::from_config(&ctx.config.scan)?;
    if command.max_file_size.is_some() {
        options = options.max_file_size(command.max_file_size);
    }
    for name in &command.ignore_files {
        options = options.ignore_file(name);
    }
    for name in &command.ignore_folders {
        options = options.ignore_folder(name);
    }
    Ok(options)
}

/// Runs the scan command.
///
/// # Errors
///
/// Returns an error if the directory cannot be scanned or the project
/// cannot be stored or mounted.
pub async fn run(ctx: &Context, command: ScanCommand) -> Result<ExitCode> {
    let scanner = TemplateScanner::new(scan_options(ctx, &command)?);
    let (mut tree, stats) = scanner.scan_with_stats(&command.dir)?;
    if let Some(name) = command.root_name {
        tree.folder_name = name;
    }
    info!(
        dir = %command.dir.display(),
        files = stats.files,
        ignored = stats.ignored,
        "scanned template"
    );

    let summary = create_project(
        ctx,
        project_id(command.project),
        tree,
        command.mount.as_deref(),
    )
    .await?;

    ctx.print(&ScanResult { summary, stats })?;
    Ok(ExitCode::SUCCESS)
}
