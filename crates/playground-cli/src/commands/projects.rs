//! Stored project management.

use super::common::Context;
use crate::actions::ProjectAction;
use anyhow::Result;
use playground_core::cli::ExitCode;
use playground_core::{Error, ProjectId};
use serde::Serialize;
use tracing::info;

/// Stored project ids.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProjectList {
    /// Projects directory
    pub directory: String,
    /// Project ids, sorted
    pub projects: Vec<String>,
}

/// Result of a removal.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RemoveResult {
    /// Removed project id
    pub project: String,
    /// Whether a document was deleted
    pub removed: bool,
}

/// Runs a project action.
///
/// # Errors
///
/// Returns an error if the store cannot be read, or `Error::NotFound` when
/// removing an unknown project.
pub async fn run(ctx: &Context, action: ProjectAction) -> Result<ExitCode> {
    let store = ctx.store();
    match action {
        ProjectAction::List => {
            let projects = store.list().await?;
            ctx.print(&ProjectList {
                directory: store.base_dir().display().to_string(),
                projects: projects.iter().map(ToString::to_string).collect(),
            })?;
        }
        ProjectAction::Remove { project } => {
            let project = ProjectId::new(project);
            if !store.remove(&project).await? {
                return Err(Error::NotFound {
                    path: format!("project {project}"),
                }
                .into());
            }
            info!(project = %project, "removed project");
            ctx.print(&RemoveResult {
                project: project.to_string(),
                removed: true,
            })?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
