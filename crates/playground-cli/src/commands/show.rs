//! Show command implementation.
//!
//! Prints a stored project as a tree, or one of its files.

use super::common::Context;
use anyhow::Result;
use playground_core::cli::{ExitCode, OutputFormat};
use playground_core::{Error, ProjectId};
use playground_session::{PersistenceGateway, decode_document};
use playground_tree::{FolderNode, TreePath};
use serde::Serialize;

/// One file of a project.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileView {
    /// Logical path
    pub path: String,
    /// File content
    pub content: String,
}

/// Loads the stored tree of `project`.
///
/// # Errors
///
/// Returns `Error::NotFound` if the project is unknown, or the store or
/// decoding error.
pub async fn load_tree(ctx: &Context, project: &ProjectId) -> Result<FolderNode> {
    let Some(document) = ctx.store().load(project).await? else {
        return Err(Error::NotFound {
            path: format!("project {project}"),
        }
        .into());
    };
    Ok(decode_document(Some(document))?)
}

/// Runs the show command.
///
/// # Errors
///
/// Returns an error if the project or the requested file does not exist.
pub async fn run(ctx: &Context, project: String, file: Option<String>) -> Result<ExitCode> {
    let tree = load_tree(ctx, &ProjectId::new(project)).await?;

    match (file, ctx.format) {
        (Some(path), format) => {
            let path = TreePath::new(path)?;
            let content = tree.file(&path)?.content.clone();
            if format == OutputFormat::Pretty {
                println!("{content}");
            } else {
                ctx.print(&FileView {
                    path: path.to_string(),
                    content,
                })?;
            }
        }
        (None, OutputFormat::Pretty) => {
            println!("{}", crate::formatters::tree::render(&tree));
        }
        (None, _) => ctx.print(&tree)?,
    }
    Ok(ExitCode::SUCCESS)
}
