//! Mount command implementation.

use super::common::{Context, ProjectSummary, ensure_project_exists};
use anyhow::Result;
use playground_core::ProjectId;
use playground_core::cli::ExitCode;
use playground_session::{DirectoryMount, PlaygroundSession};
use std::path::PathBuf;

/// Materializes a stored project into `dir`.
///
/// Existing files under `dir` that are not part of the project are left in
/// place.
///
/// # Errors
///
/// Returns an error if the project does not exist or cannot be written.
pub async fn run(ctx: &Context, project: String, dir: PathBuf) -> Result<ExitCode> {
    let project = ProjectId::new(project);
    let store = ctx.store();
    ensure_project_exists(&store, &project).await?;

    let session = PlaygroundSession::open(project, store, DirectoryMount::new(&dir)).await?;
    ctx.print(&ProjectSummary::of(&session, Some(&dir)))?;
    Ok(ExitCode::SUCCESS)
}
