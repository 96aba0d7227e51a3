//! Import command implementation.
//!
//! Builds a project from a repository tree listing. Blob content comes from
//! the listing itself or, when `--source` is given, from a local checkout.

use super::common::{Context, ProjectSummary, create_project, project_id};
use anyhow::{Context as _, Result};
use playground_core::Error;
use playground_core::cli::ExitCode;
use playground_tree::{BuildStats, EntryKind, PathTreeBuilder, RepoTreeEntry, TreePath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Arguments of the import command.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// JSON listing file
    pub listing: PathBuf,
    /// Project id; generated when absent
    pub project: Option<String>,
    /// Local checkout to read blob content from
    pub source: Option<PathBuf>,
    /// Root folder name override
    pub root_name: Option<String>,
    /// Byte ceiling override
    pub max_file_size: Option<u64>,
    /// Directory to materialize the project into
    pub mount: Option<PathBuf>,
}

/// Output of the import command.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    /// Stored project
    #[serde(flatten)]
    pub summary: ProjectSummary,
    /// Listing statistics
    pub stats: BuildStats,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Bare(Vec<RepoTreeEntry>),
    Wrapped { tree: Vec<RepoTreeEntry> },
}

/// Parses a listing: a bare entry array or an object with a `tree` array.
///
/// # Errors
///
/// Returns `Error::SerializationError` if the text is neither.
///
/// # Examples
///
/// ```
/// use playground_cli::commands::import::parse_listing;
///
/// let wrapped = r#"{"sha": "abc", "tree": [{"path": "a.ts", "type": "blob"}], "truncated": false}"#;
/// assert_eq!(parse_listing(wrapped)?.len(), 1);
/// assert_eq!(parse_listing("[]")?.len(), 0);
/// # Ok::<(), playground_core::Error>(())
/// ```
pub fn parse_listing(text: &str) -> playground_core::Result<Vec<RepoTreeEntry>> {
    match serde_json::from_str(text) {
        Ok(Listing::Bare(entries) | Listing::Wrapped { tree: entries }) => Ok(entries),
        Err(e) => Err(Error::serialization("invalid tree listing", e)),
    }
}

/// Fills missing blob content from files under `source`.
///
/// Files larger than `max_file_size` are not read; only their size is
/// recorded so the builder substitutes the placeholder. Missing files keep
/// empty content.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read.
pub async fn fill_content(
    entries: &mut [RepoTreeEntry],
    source: &Path,
    max_file_size: Option<u64>,
) -> Result<()> {
    for entry in entries
        .iter_mut()
        .filter(|e| e.kind == EntryKind::Blob && e.content.is_none())
    {
        // Invalid paths are left for the builder to reject.
        if TreePath::new(entry.path.as_str()).is_err() {
            continue;
        }

        let file = source.join(&entry.path);
        let Ok(metadata) = tokio::fs::metadata(&file).await else {
            warn!(path = %entry.path, "no source file for blob");
            continue;
        };

        if max_file_size.is_some_and(|max| metadata.len() > max) {
            entry.size = Some(metadata.len());
            continue;
        }

        let bytes = tokio::fs::read(&file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;
        debug!(path = %entry.path, bytes = bytes.len(), "read blob content");
        entry.size = Some(bytes.len() as u64);
        entry.content = Some(String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(())
}

/// Runs the import command.
///
/// # Errors
///
/// Returns an error if the listing cannot be read or built, or the project
/// cannot be stored or mounted.
pub async fn run(ctx: &Context, options: ImportOptions) -> Result<ExitCode> {
    let text = tokio::fs::read_to_string(&options.listing)
        .await
        .with_context(|| format!("failed to read listing {}", options.listing.display()))?;
    let mut entries = parse_listing(&text)?;

    let max_file_size = options
        .max_file_size
        .or(ctx.config.import.max_file_size);
    if let Some(source) = &options.source {
        fill_content(&mut entries, source, max_file_size).await?;
    }

    let root_name = options
        .root_name
        .or_else(|| ctx.config.import.root_name.clone())
        .unwrap_or_else(|| listing_name(&options.listing));

    info!(entries = entries.len(), root = %root_name, "importing listing");
    let (tree, stats) = PathTreeBuilder::new(root_name)
        .max_file_size(max_file_size)
        .add_entries(entries)
        .build_with_stats()?;

    let summary = create_project(
        ctx,
        project_id(options.project),
        tree,
        options.mount.as_deref(),
    )
    .await?;

    ctx.print(&ImportResult { summary, stats })?;
    Ok(ExitCode::SUCCESS)
}

/// Root folder name derived from the listing file name.
fn listing_name(listing: &Path) -> String {
    listing
        .file_stem()
        .map_or_else(|| "Root".to_string(), |s| s.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_core::cli::OutputFormat;
    use playground_core::{PlaygroundConfig, ProjectId};
    use playground_session::{JsonFileStore, PersistenceGateway, decode_document};
    use tempfile::TempDir;

    #[test]
    fn test_parse_listing_rejects_garbage() {
        let err = parse_listing(r#"{"items": 3}"#).unwrap_err();
        assert!(matches!(err, Error::SerializationError { .. }));
    }

    #[test]
    fn test_listing_name() {
        assert_eq!(listing_name(Path::new("/tmp/vite-app.json")), "vite-app");
        assert_eq!(listing_name(Path::new("/")), "Root");
    }

    #[tokio::test]
    async fn test_fill_content_from_source() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/main.ts"), "main").unwrap();
        std::fs::write(dir.path().join("big.bin"), vec![b'x'; 64]).unwrap();

        let mut entries = vec![
            RepoTreeEntry::blob("src/main.ts"),
            RepoTreeEntry::blob("big.bin"),
            RepoTreeEntry::blob("missing.ts"),
            RepoTreeEntry::blob("inline.ts").with_content("inline"),
            RepoTreeEntry::tree("src"),
        ];
        fill_content(&mut entries, dir.path(), Some(16)).await.unwrap();

        assert_eq!(entries[0].content.as_deref(), Some("main"));
        assert_eq!(entries[1].content, None);
        assert_eq!(entries[1].size, Some(64));
        assert_eq!(entries[2].content, None);
        assert_eq!(entries[3].content.as_deref(), Some("inline"));
    }

    #[tokio::test]
    async fn test_run_stores_project() {
        let dir = TempDir::new().unwrap();
        let listing = dir.path().join("app.json");
        std::fs::write(
            &listing,
            r#"{"tree": [
                {"path": "src", "type": "tree"},
                {"path": "src/index.ts", "type": "blob", "content": "export {};"},
                {"path": "README.md", "type": "blob", "content": "hi"}
            ]}"#,
        )
        .unwrap();

        let config = PlaygroundConfig::builder()
            .projects_dir(dir.path().join("projects"))
            .build();
        let ctx = Context::with_config(config, OutputFormat::Json);
        let code = run(
            &ctx,
            ImportOptions {
                listing,
                project: Some("app".to_string()),
                mount: Some(dir.path().join("runtime")),
                ..ImportOptions::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let store = JsonFileStore::new(dir.path().join("projects"));
        let tree = decode_document(store.load(&ProjectId::new("app")).await.unwrap()).unwrap();
        assert_eq!(tree.folder_name, "app");
        assert_eq!(tree.file_count(), 2);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("runtime/src/index.ts")).unwrap(),
            "export {};"
        );
    }
}
