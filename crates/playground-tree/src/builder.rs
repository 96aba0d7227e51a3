//! Builds a sorted project tree from a flat repository listing.
//!
//! The listing is the recursive tree of a version-control API: one entry
//! per path, typed `blob`, `tree` or `commit`. Only blobs become files;
//! folders are derived from blob paths, so `tree` entries and submodule
//! `commit` entries are skipped and counted.
//!
//! # Examples
//!
//! ```
//! use playground_tree::{PathTreeBuilder, RepoTreeEntry, TreeNode};
//!
//! let root = PathTreeBuilder::new("my-app")
//!     .add_entry(RepoTreeEntry::blob("src/main.ts"))
//!     .add_entry(RepoTreeEntry::tree("src"))
//!     .add_entry(RepoTreeEntry::blob("package.json"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(root.folder_name, "my-app");
//! let names: Vec<_> = root.items.iter().map(TreeNode::display_name).collect();
//! assert_eq!(names, ["src", "package.json"]);
//! ```

use crate::node::{FileNode, FolderNode, TreeNode, split_file_name};
use crate::path::TreePath;
use playground_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::mem;
use tracing::{debug, info, warn};

/// Kind of a repository listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// File content
    Blob,
    /// Directory
    Tree,
    /// Submodule reference
    Commit,
}

/// One entry of a flat repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoTreeEntry {
    /// Slash-separated path relative to the repository root
    pub path: String,

    /// Entry kind
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Object hash, informational only
    #[serde(default)]
    pub sha: String,

    /// Reported size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Already fetched content, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl RepoTreeEntry {
    /// Creates a blob entry with no content.
    #[must_use]
    pub fn blob(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
            sha: String::new(),
            size: None,
            content: None,
        }
    }

    /// Creates a directory entry.
    #[must_use]
    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Tree,
            ..Self::blob(path)
        }
    }

    /// Sets the content, and the size to its byte length.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        self.size = Some(content.len() as u64);
        self.content = Some(content);
        self
    }

    /// Sets the reported size.
    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Reported size, falling back to the supplied content length.
    #[must_use]
    pub fn effective_size(&self) -> Option<u64> {
        self.size
            .or_else(|| self.content.as_ref().map(|c| c.len() as u64))
    }
}

/// Content substituted for files above the byte ceiling.
///
/// # Examples
///
/// ```
/// use playground_tree::oversized_placeholder;
///
/// assert_eq!(
///     oversized_placeholder(2048, 1024),
///     "[File content not included: size (2048 bytes) exceeds maximum allowed size (1024 bytes)]"
/// );
/// ```
#[must_use]
pub fn oversized_placeholder(size: u64, max: u64) -> String {
    format!(
        "[File content not included: size ({size} bytes) exceeds maximum allowed size ({max} bytes)]"
    )
}

/// Counters collected while building a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Files created
    pub files: usize,
    /// Folders created, excluding the root
    pub folders: usize,
    /// `tree` and `commit` entries skipped
    pub skipped: usize,
    /// Files whose content was replaced by the placeholder
    pub oversized: Vec<TreePath>,
}

/// Builder turning a flat listing into a sorted [`FolderNode`].
///
/// Building fails fast: the first invalid or conflicting path aborts the
/// build and no partial tree is returned.
#[derive(Debug, Clone)]
pub struct PathTreeBuilder {
    root_name: String,
    max_file_size: Option<u64>,
    entries: Vec<RepoTreeEntry>,
}

struct ArenaFolder {
    name: String,
    folders: Vec<usize>,
    files: Vec<FileNode>,
}

impl ArenaFolder {
    const fn new(name: String) -> Self {
        Self {
            name,
            folders: Vec::new(),
            files: Vec::new(),
        }
    }
}

impl PathTreeBuilder {
    /// Creates a builder for a tree whose root folder is named `root_name`.
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            max_file_size: None,
            entries: Vec::new(),
        }
    }

    /// Sets the byte ceiling above which content becomes a placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_tree::{PathTreeBuilder, RepoTreeEntry, TreePath};
    ///
    /// let (root, stats) = PathTreeBuilder::new("Root")
    ///     .max_file_size(Some(4))
    ///     .add_entry(RepoTreeEntry::blob("big.txt").with_content("too large"))
    ///     .build_with_stats()
    ///     .unwrap();
    ///
    /// let big = root.file(&TreePath::new("big.txt").unwrap()).unwrap();
    /// assert!(big.content.starts_with("[File content not included"));
    /// assert_eq!(stats.oversized.len(), 1);
    /// ```
    #[must_use]
    pub const fn max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }

    /// Adds one listing entry.
    #[must_use]
    pub fn add_entry(mut self, entry: RepoTreeEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Adds many listing entries.
    #[must_use]
    pub fn add_entries(mut self, entries: impl IntoIterator<Item = RepoTreeEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Builds the tree.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPath` for an empty or malformed blob path and
    /// `Error::DuplicateName` if a path repeats or is used both as file and
    /// folder.
    pub fn build(self) -> Result<FolderNode> {
        self.build_with_stats().map(|(root, _)| root)
    }

    /// Builds the tree and returns the build counters.
    ///
    /// # Errors
    ///
    /// Same as [`PathTreeBuilder::build`].
    pub fn build_with_stats(self) -> Result<(FolderNode, BuildStats)> {
        let mut arena = vec![ArenaFolder::new(self.root_name.clone())];
        let mut folder_index: HashMap<String, usize> = HashMap::from([(String::new(), 0)]);
        let mut file_paths: HashSet<String> = HashSet::new();
        let mut stats = BuildStats::default();

        for entry in self.entries {
            if entry.kind != EntryKind::Blob {
                debug!(path = %entry.path, kind = ?entry.kind, "skipping non-blob entry");
                stats.skipped += 1;
                continue;
            }

            if entry.path.is_empty() {
                return Err(Error::InvalidPath {
                    path: String::new(),
                    reason: "path cannot be empty".to_string(),
                });
            }
            let path = TreePath::new(entry.path.as_str())?;
            let full = path.as_str();

            // Walk the folder prefixes, creating each folder once.
            let mut parent = 0;
            let mut start = 0;
            for (sep, _) in full.match_indices('/') {
                let prefix = &full[..sep];
                let name = &full[start..sep];
                if file_paths.contains(prefix) {
                    return Err(duplicate(&full[..start], name));
                }
                parent = if let Some(&idx) = folder_index.get(prefix) {
                    idx
                } else {
                    let idx = arena.len();
                    arena.push(ArenaFolder::new(name.to_string()));
                    arena[parent].folders.push(idx);
                    folder_index.insert(prefix.to_string(), idx);
                    debug!(folder = prefix, "created folder");
                    idx
                };
                start = sep + 1;
            }

            let basename = &full[start..];
            if folder_index.contains_key(full) || !file_paths.insert(full.to_string()) {
                return Err(duplicate(full[..start].trim_end_matches('/'), basename));
            }

            let content = match (self.max_file_size, entry.effective_size()) {
                (Some(max), Some(size)) if size > max => {
                    warn!(path = full, size, max, "file exceeds size limit, using placeholder");
                    stats.oversized.push(path.clone());
                    oversized_placeholder(size, max)
                }
                _ => entry.content.unwrap_or_default(),
            };

            let (filename, extension) = split_file_name(basename);
            arena[parent]
                .files
                .push(FileNode::new(filename, extension, content));
            stats.files += 1;
        }

        stats.folders = arena.len() - 1;
        let mut root = assemble(&mut arena, 0);
        root.sort_recursive();

        info!(
            root = %root.folder_name,
            files = stats.files,
            folders = stats.folders,
            skipped = stats.skipped,
            oversized = stats.oversized.len(),
            "built project tree"
        );
        Ok((root, stats))
    }
}

fn assemble(arena: &mut [ArenaFolder], idx: usize) -> FolderNode {
    let name = mem::take(&mut arena[idx].name);
    let children = mem::take(&mut arena[idx].folders);
    let files = mem::take(&mut arena[idx].files);

    let mut items: Vec<TreeNode> = Vec::with_capacity(children.len() + files.len());
    for child in children {
        items.push(TreeNode::Folder(assemble(arena, child)));
    }
    items.extend(files.into_iter().map(TreeNode::File));

    FolderNode {
        folder_name: name,
        items,
    }
}

fn duplicate(parent: &str, name: &str) -> Error {
    Error::DuplicateName {
        parent: parent.to_string(),
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(paths: &[&str]) -> Result<FolderNode> {
        PathTreeBuilder::new("Root")
            .add_entries(paths.iter().map(|p| RepoTreeEntry::blob(*p)))
            .build()
    }

    fn p(s: &str) -> TreePath {
        TreePath::new(s).unwrap()
    }

    #[test]
    fn test_empty_listing() {
        let root = build(&[]).unwrap();
        assert_eq!(root.folder_name, "Root");
        assert!(root.items.is_empty());
    }

    #[test]
    fn test_intermediate_folders_created_once() {
        let root = build(&["a/b/c.ts", "a/b/d.ts", "a/e.ts"]).unwrap();
        assert_eq!(root.items.len(), 1);
        let a = root.folder(&p("a")).unwrap();
        assert_eq!(a.items.len(), 2);
        assert_eq!(root.folder(&p("a/b")).unwrap().items.len(), 2);
    }

    #[test]
    fn test_every_blob_exactly_once() {
        let paths = ["z.md", "src/index.ts", "src/util/a.ts", "src/util/b.ts", "LICENSE"];
        let root = build(&paths).unwrap();
        let mut found: Vec<String> = root.files().into_iter().map(|(p, _)| p.to_string()).collect();
        found.sort();
        let mut expected: Vec<String> = paths.iter().map(ToString::to_string).collect();
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_result_is_sorted() {
        let root = build(&["b.ts", "a/x.ts", "A.ts", "c/y.ts", "a.ts"]).unwrap();
        assert!(root.is_sorted_recursive());
        let names: Vec<_> = root.items.iter().map(TreeNode::display_name).collect();
        assert_eq!(names, ["a", "c", "a.ts", "A.ts", "b.ts"]);
    }

    #[test]
    fn test_extension_split() {
        let root = build(&[".env", "Dockerfile", "a.test.ts"]).unwrap();
        let env = root.file(&p(".env")).unwrap();
        assert_eq!((env.filename.as_str(), env.file_extension.as_str()), (".env", ""));
        let test = root.file(&p("a.test.ts")).unwrap();
        assert_eq!(test.filename, "a.test");
        assert_eq!(test.file_extension, "ts");
    }

    #[test]
    fn test_non_blob_entries_skipped() {
        let (root, stats) = PathTreeBuilder::new("Root")
            .add_entry(RepoTreeEntry::tree("src"))
            .add_entry(RepoTreeEntry {
                kind: EntryKind::Commit,
                ..RepoTreeEntry::blob("vendor/lib")
            })
            .add_entry(RepoTreeEntry::blob("src/a.ts"))
            .build_with_stats()
            .unwrap();
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.files, 1);
        assert_eq!(stats.folders, 1);
        assert!(root.find(&p("vendor")).is_none());
    }

    #[test]
    fn test_invalid_paths_rejected() {
        for bad in ["", "/a.ts", "a/", "a//b.ts", "a/../b.ts", "./a.ts"] {
            let err = build(&["ok.ts", bad]).unwrap_err();
            assert!(err.is_invalid_path(), "{bad:?} gave {err}");
        }
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let err = build(&["a/b.ts", "a/b.ts"]).unwrap_err();
        assert!(err.is_duplicate_name());
        assert_eq!(err.to_string(), "'b.ts' already exists in 'a'");
    }

    #[test]
    fn test_file_folder_conflict_rejected() {
        assert!(build(&["a", "a/b.ts"]).unwrap_err().is_duplicate_name());
        assert!(build(&["a/b.ts", "a"]).unwrap_err().is_duplicate_name());
    }

    #[test]
    fn test_content_and_ceiling() {
        let (root, stats) = PathTreeBuilder::new("Root")
            .max_file_size(Some(10))
            .add_entry(RepoTreeEntry::blob("small.ts").with_content("ok"))
            .add_entry(RepoTreeEntry::blob("big.bin").with_size(11))
            .build_with_stats()
            .unwrap();

        assert_eq!(root.file(&p("small.ts")).unwrap().content, "ok");
        assert_eq!(
            root.file(&p("big.bin")).unwrap().content,
            oversized_placeholder(11, 10)
        );
        assert_eq!(stats.oversized, vec![p("big.bin")]);
    }

    #[test]
    fn test_no_ceiling_keeps_content() {
        let root = PathTreeBuilder::new("Root")
            .add_entry(RepoTreeEntry::blob("a.txt").with_content("x".repeat(100)))
            .build()
            .unwrap();
        assert_eq!(root.file(&p("a.txt")).unwrap().content.len(), 100);
    }

    #[test]
    fn test_entry_deserialization() {
        let json = r#"[
            {"path": "src", "type": "tree", "sha": "1"},
            {"path": "src/a.ts", "type": "blob", "sha": "2", "size": 12}
        ]"#;
        let entries: Vec<RepoTreeEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].kind, EntryKind::Tree);
        assert_eq!(entries[1].size, Some(12));
        assert_eq!(entries[1].content, None);
    }
}
