//! Apply command implementation.
//!
//! Replays a JSON list of tree mutations against a stored project. Every
//! mutation is persisted as it is applied; the first failing one stops the
//! run and leaves the earlier ones in place.

use super::common::{Context, ProjectSummary, ensure_project_exists};
use anyhow::{Context as _, Result};
use playground_core::cli::ExitCode;
use playground_core::{Error, ProjectId};
use playground_session::{
    DirectoryMount, MemoryMount, MountGateway, PersistenceGateway, PlaygroundSession,
};
use playground_tree::{TreeChange, TreeMutation};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output of the apply command.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyResult {
    /// Project after the mutations
    #[serde(flatten)]
    pub summary: ProjectSummary,
    /// One change per applied mutation
    pub changes: Vec<TreeChange>,
}

/// Parses a JSON mutation list.
///
/// # Errors
///
/// Returns `Error::SerializationError` if the text is not a mutation list.
///
/// # Examples
///
/// ```
/// use playground_cli::commands::apply::parse_mutations;
///
/// let mutations = parse_mutations(r#"[{"op": "delete_file", "path": "a.ts"}]"#)?;
/// assert_eq!(mutations.len(), 1);
/// # Ok::<(), playground_core::Error>(())
/// ```
pub fn parse_mutations(text: &str) -> playground_core::Result<Vec<TreeMutation>> {
    serde_json::from_str(text).map_err(|e| Error::serialization("invalid mutation list", e))
}

/// Applies mutations in order and collects their changes.
///
/// # Errors
///
/// Returns the first mutation or gateway error.
pub async fn apply_all<P, M>(
    session: &mut PlaygroundSession<P, M>,
    mutations: Vec<TreeMutation>,
) -> playground_core::Result<Vec<TreeChange>>
where
    P: PersistenceGateway,
    M: MountGateway,
{
    let mut changes = Vec::with_capacity(mutations.len());
    for (index, mutation) in mutations.into_iter().enumerate() {
        debug!(index, ?mutation, "applying mutation");
        changes.push(session.apply(mutation).await?);
    }
    Ok(changes)
}

/// Runs the apply command.
///
/// # Errors
///
/// Returns an error if the project does not exist, the mutation list cannot
/// be read, or a mutation fails.
pub async fn run(
    ctx: &Context,
    project: String,
    mutations: PathBuf,
    mount: Option<PathBuf>,
) -> Result<ExitCode> {
    let project = ProjectId::new(project);
    let store = ctx.store();
    ensure_project_exists(&store, &project).await?;

    let text = tokio::fs::read_to_string(&mutations)
        .await
        .with_context(|| format!("failed to read mutations {}", mutations.display()))?;
    let mutations = parse_mutations(&text)?;
    let count = mutations.len();

    let result = match mount.as_deref() {
        Some(dir) => {
            let mut session =
                PlaygroundSession::open(project, store, DirectoryMount::new(dir)).await?;
            finish(&mut session, mutations, Some(dir)).await?
        }
        None => {
            let mut session = PlaygroundSession::open(project, store, MemoryMount::new()).await?;
            finish(&mut session, mutations, None).await?
        }
    };

    info!(project = %result.summary.project, mutations = count, "applied mutations");
    ctx.print(&result)?;
    Ok(ExitCode::SUCCESS)
}

async fn finish<P, M>(
    session: &mut PlaygroundSession<P, M>,
    mutations: Vec<TreeMutation>,
    mounted_at: Option<&Path>,
) -> Result<ApplyResult>
where
    P: PersistenceGateway,
    M: MountGateway,
{
    let changes = apply_all(session, mutations).await?;
    Ok(ApplyResult {
        summary: ProjectSummary::of(session, mounted_at),
        changes,
    })
}
