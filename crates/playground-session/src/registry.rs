//! Working set of open files.
//!
//! Each open entry carries an edit buffer (`content`) next to the content
//! it was opened or last saved with (`original_content`). Dirtiness is
//! always computed from the two and never stored.
//!
//! # Examples
//!
//! ```
//! use playground_session::OpenFileRegistry;
//! use playground_tree::{PathTreeBuilder, RepoTreeEntry, TreePath};
//!
//! let tree = PathTreeBuilder::new("Root")
//!     .add_entry(RepoTreeEntry::blob("src/index.ts").with_content("a"))
//!     .build()?;
//!
//! let mut registry = OpenFileRegistry::new();
//! let id = registry.open(&tree, &TreePath::new("src/index.ts")?)?;
//! registry.edit(&id, "b")?;
//! assert!(registry.get(&id).unwrap().has_unsaved_changes());
//!
//! registry.mark_saved(&id)?;
//! assert!(!registry.has_unsaved_changes());
//! # Ok::<(), playground_core::Error>(())
//! ```

use playground_core::{Error, FileId, Result};
use playground_tree::{FileNode, FolderNode, NodeKind, TreeChange, TreePath};
use serde::Serialize;
use tracing::debug;

/// One open file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
    id: FileId,
    path: TreePath,
    filename: String,
    file_extension: String,
    content: String,
    original_content: String,
}

impl OpenFile {
    /// Open-file id, derived from the path.
    #[must_use]
    pub const fn id(&self) -> &FileId {
        &self.id
    }

    /// Logical path of the file.
    #[must_use]
    pub const fn path(&self) -> &TreePath {
        &self.path
    }

    /// Basename without extension.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Extension without the separator.
    #[must_use]
    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Current edit buffer.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Content at open time or at the last confirmed save.
    #[must_use]
    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    /// Returns `true` if the buffer differs from the original content.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.content != self.original_content
    }

    /// Serializable view with the computed dirty flag.
    #[must_use]
    pub fn snapshot(&self) -> OpenFileSnapshot {
        OpenFileSnapshot {
            id: self.id.clone(),
            path: self.path.clone(),
            filename: self.filename.clone(),
            file_extension: self.file_extension.clone(),
            content: self.content.clone(),
            original_content: self.original_content.clone(),
            has_unsaved_changes: self.has_unsaved_changes(),
        }
    }

    fn move_to(&mut self, path: TreePath, renamed: Option<&FileNode>) {
        if let Some(node) = renamed {
            self.filename.clone_from(&node.filename);
            self.file_extension.clone_from(&node.file_extension);
        }
        self.id = FileId::for_path(path.as_str());
        self.path = path;
    }
}

/// Serializable view of an open file, as handed to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenFileSnapshot {
    /// Open-file id
    pub id: FileId,
    /// Logical path
    pub path: TreePath,
    /// Basename without extension
    pub filename: String,
    /// Extension without separator
    pub file_extension: String,
    /// Edit buffer
    pub content: String,
    /// Content at open or last save
    pub original_content: String,
    /// `content != original_content`
    pub has_unsaved_changes: bool,
}

/// Tab-ordered set of open files with one optional active entry.
#[derive(Debug, Clone, Default)]
pub struct OpenFileRegistry {
    files: Vec<OpenFile>,
    active: Option<FileId>,
}

impl OpenFileRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the file at `path` and makes it active.
    ///
    /// Reopening an open path only reactivates it; the buffer is kept.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the path is missing, `Error::NotAFile` if it is
    /// a folder.
    pub fn open(&mut self, tree: &FolderNode, path: &TreePath) -> Result<FileId> {
        let id = FileId::for_path(path.as_str());
        if self.index_of(&id).is_some() {
            debug!(path = %path, "reactivating open file");
            self.active = Some(id.clone());
            return Ok(id);
        }

        let node = tree.file(path)?;
        self.files.push(OpenFile {
            id: id.clone(),
            path: path.clone(),
            filename: node.filename.clone(),
            file_extension: node.file_extension.clone(),
            content: node.content.clone(),
            original_content: node.content.clone(),
        });
        self.active = Some(id.clone());
        debug!(path = %path, id = %id, "opened file");
        Ok(id)
    }

    /// Replaces the edit buffer of an open file.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `id` is not open.
    pub fn edit(&mut self, id: &FileId, content: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.content = content.into();
        Ok(())
    }

    /// Records a confirmed save: the buffer becomes the original content.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `id` is not open.
    pub fn mark_saved(&mut self, id: &FileId) -> Result<()> {
        let file = self.get_mut(id)?;
        file.original_content.clone_from(&file.content);
        Ok(())
    }

    /// Closes an open file and returns it.
    ///
    /// Closing the active entry activates its left neighbor, or the new
    /// first tab when it was first; an empty set has no active entry.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `id` is not open.
    pub fn close(&mut self, id: &FileId) -> Result<OpenFile> {
        let idx = self.index_of(id).ok_or_else(|| unknown(id))?;
        let closed = self.files.remove(idx);

        if self.active.as_ref() == Some(id) {
            self.active = if self.files.is_empty() {
                None
            } else {
                Some(self.files[idx.saturating_sub(1)].id.clone())
            };
        }
        debug!(path = %closed.path, "closed file");
        Ok(closed)
    }

    /// Closes every open file.
    pub fn close_all(&mut self) -> Vec<OpenFile> {
        self.active = None;
        std::mem::take(&mut self.files)
    }

    /// Makes an open file active.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `id` is not open.
    pub fn set_active(&mut self, id: &FileId) -> Result<()> {
        if self.index_of(id).is_none() {
            return Err(unknown(id));
        }
        self.active = Some(id.clone());
        Ok(())
    }

    /// Open file by id.
    #[must_use]
    pub fn get(&self, id: &FileId) -> Option<&OpenFile> {
        self.files.iter().find(|f| &f.id == id)
    }

    /// Open file by logical path.
    #[must_use]
    pub fn find_by_path(&self, path: &TreePath) -> Option<&OpenFile> {
        self.files.iter().find(|f| &f.path == path)
    }

    /// Open files in tab order.
    #[must_use]
    pub fn list(&self) -> &[OpenFile] {
        &self.files
    }

    /// The active entry, if any.
    #[must_use]
    pub fn active(&self) -> Option<&OpenFile> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    /// Id of the active entry, if any.
    #[must_use]
    pub const fn active_id(&self) -> Option<&FileId> {
        self.active.as_ref()
    }

    /// Returns `true` if any entry is dirty.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.files.iter().any(OpenFile::has_unsaved_changes)
    }

    /// Ids of dirty entries in tab order.
    #[must_use]
    pub fn dirty_ids(&self) -> Vec<FileId> {
        self.files
            .iter()
            .filter(|f| f.has_unsaved_changes())
            .map(|f| f.id.clone())
            .collect()
    }

    /// Number of open files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Snapshots of every open file in tab order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<OpenFileSnapshot> {
        self.files.iter().map(OpenFile::snapshot).collect()
    }

    /// Keeps entries consistent with an applied tree change.
    ///
    /// Renames rewrite ids, paths and names while buffers, dirty state, tab
    /// order and the active selection are preserved. Deletes close every
    /// entry in the removed subtree. A renamed file takes its name fields
    /// from `tree`, the tree after the change. Returns the closed entries.
    pub fn reconcile(&mut self, tree: &FolderNode, change: &TreeChange) -> Vec<OpenFile> {
        match change {
            TreeChange::Added { .. } => Vec::new(),
            TreeChange::Renamed {
                from, to, kind, ..
            } => {
                if from == to {
                    return Vec::new();
                }
                let active_path = self.active().map(|f| f.path.clone());
                let renamed = match kind {
                    NodeKind::File => tree.file(to).ok(),
                    NodeKind::Folder => None,
                };
                for file in &mut self.files {
                    if let Some(new_path) = file.path.rebase(from, to) {
                        debug!(from = %file.path, to = %new_path, "following rename");
                        file.move_to(new_path, renamed);
                    }
                }
                if let Some(path) = active_path.and_then(|p| p.rebase(from, to)) {
                    self.active = Some(FileId::for_path(path.as_str()));
                }
                Vec::new()
            }
            TreeChange::Removed { path, .. } => {
                let doomed: Vec<FileId> = self
                    .files
                    .iter()
                    .filter(|f| f.path.starts_with(path))
                    .map(|f| f.id.clone())
                    .collect();
                doomed.iter().filter_map(|id| self.close(id).ok()).collect()
            }
        }
    }

    fn index_of(&self, id: &FileId) -> Option<usize> {
        self.files.iter().position(|f| &f.id == id)
    }

    fn get_mut(&mut self, id: &FileId) -> Result<&mut OpenFile> {
        self.files
            .iter_mut()
            .find(|f| &f.id == id)
            .ok_or_else(|| unknown(id))
    }
}

fn unknown(id: &FileId) -> Error {
    Error::NotFound {
        path: format!("open file {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_tree::{PathTreeBuilder, RepoTreeEntry, TreeMutation};

    fn p(s: &str) -> TreePath {
        TreePath::new(s).unwrap()
    }

    fn tree() -> FolderNode {
        PathTreeBuilder::new("Root")
            .add_entries(
                ["src/index.ts", "src/ui/App.tsx", "a/b.ts", "a/c.ts", "d.ts"]
                    .into_iter()
                    .map(|path| RepoTreeEntry::blob(path).with_content(path)),
            )
            .build()
            .unwrap()
    }

    fn open_all(registry: &mut OpenFileRegistry, tree: &FolderNode, paths: &[&str]) -> Vec<FileId> {
        paths
            .iter()
            .map(|path| registry.open(tree, &p(path)).unwrap())
            .collect()
    }

    #[test]
    fn test_open_creates_clean_active_entry() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        let id = registry.open(&tree, &p("d.ts")).unwrap();

        let file = registry.get(&id).unwrap();
        assert_eq!(file.content(), "d.ts");
        assert_eq!(file.original_content(), "d.ts");
        assert_eq!(file.filename(), "d");
        assert_eq!(file.file_extension(), "ts");
        assert!(!file.has_unsaved_changes());
        assert_eq!(registry.active_id(), Some(&id));
    }

    #[test]
    fn test_open_errors() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        assert!(registry.open(&tree, &p("nope.ts")).unwrap_err().is_not_found());
        assert!(registry.open(&tree, &p("src")).unwrap_err().is_kind_mismatch());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reopen_keeps_buffer() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        let ids = open_all(&mut registry, &tree, &["d.ts", "a/b.ts"]);
        registry.edit(&ids[0], "changed").unwrap();

        let again = registry.open(&tree, &p("d.ts")).unwrap();
        assert_eq!(again, ids[0]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&again).unwrap().content(), "changed");
        assert_eq!(registry.active_id(), Some(&ids[0]));
    }

    #[test]
    fn test_dirty_tracks_content() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        let id = registry.open(&tree, &p("d.ts")).unwrap();

        registry.edit(&id, "x").unwrap();
        assert!(registry.has_unsaved_changes());
        registry.edit(&id, "d.ts").unwrap();
        assert!(!registry.has_unsaved_changes());

        registry.edit(&id, "y").unwrap();
        registry.mark_saved(&id).unwrap();
        assert!(!registry.has_unsaved_changes());
        assert_eq!(registry.get(&id).unwrap().original_content(), "y");
        registry.edit(&id, "d.ts").unwrap();
        assert_eq!(registry.dirty_ids(), vec![id]);
    }

    #[test]
    fn test_unknown_id_errors() {
        let mut registry = OpenFileRegistry::new();
        let id = FileId::for_path("x.ts");
        assert!(registry.edit(&id, "").unwrap_err().is_not_found());
        assert!(registry.mark_saved(&id).is_err());
        assert!(registry.close(&id).is_err());
        assert!(registry.set_active(&id).is_err());
    }

    #[test]
    fn test_close_active_selects_left_neighbor() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        let ids = open_all(&mut registry, &tree, &["d.ts", "a/b.ts", "a/c.ts"]);

        registry.set_active(&ids[1]).unwrap();
        registry.close(&ids[1]).unwrap();
        assert_eq!(registry.active_id(), Some(&ids[0]));
    }

    #[test]
    fn test_close_first_selects_new_first() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        let ids = open_all(&mut registry, &tree, &["d.ts", "a/b.ts", "a/c.ts"]);

        registry.set_active(&ids[0]).unwrap();
        registry.close(&ids[0]).unwrap();
        assert_eq!(registry.active_id(), Some(&ids[1]));
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        let ids = open_all(&mut registry, &tree, &["d.ts", "a/b.ts"]);

        registry.close(&ids[0]).unwrap();
        assert_eq!(registry.active_id(), Some(&ids[1]));
    }

    #[test]
    fn test_close_last_unsets_active() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        let id = registry.open(&tree, &p("d.ts")).unwrap();
        registry.close(&id).unwrap();
        assert!(registry.active().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_close_all() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        open_all(&mut registry, &tree, &["d.ts", "a/b.ts"]);
        assert_eq!(registry.close_all().len(), 2);
        assert!(registry.active_id().is_none());
    }

    #[test]
    fn test_reconcile_folder_rename_keeps_buffers() {
        let mut tree = tree();
        let mut registry = OpenFileRegistry::new();
        let ids = open_all(&mut registry, &tree, &["d.ts", "src/index.ts", "src/ui/App.tsx"]);
        registry.edit(&ids[1], "edited").unwrap();
        registry.set_active(&ids[1]).unwrap();

        let change = TreeMutation::RenameFolder {
            path: p("src"),
            name: "lib".to_string(),
        }
        .apply(&mut tree)
        .unwrap();
        assert!(registry.reconcile(&tree, &change).is_empty());

        let paths: Vec<_> = registry.list().iter().map(|f| f.path().to_string()).collect();
        assert_eq!(paths, ["d.ts", "lib/index.ts", "lib/ui/App.tsx"]);

        let moved = registry.find_by_path(&p("lib/index.ts")).unwrap();
        assert_eq!(moved.id(), &FileId::for_path("lib/index.ts"));
        assert_eq!(moved.content(), "edited");
        assert!(moved.has_unsaved_changes());
        assert_eq!(moved.filename(), "index");
        assert_eq!(registry.active().unwrap().path(), &p("lib/index.ts"));
        assert!(registry.get(&ids[1]).is_none());
    }

    #[test]
    fn test_reconcile_file_rename_updates_names() {
        let mut tree = tree();
        let mut registry = OpenFileRegistry::new();
        registry.open(&tree, &p("d.ts")).unwrap();

        let change = TreeMutation::RenameFile {
            path: p("d.ts"),
            filename: "main".to_string(),
            extension: "tsx".to_string(),
        }
        .apply(&mut tree)
        .unwrap();
        registry.reconcile(&tree, &change);

        let file = registry.active().unwrap();
        assert_eq!(file.path(), &p("main.tsx"));
        assert_eq!(file.filename(), "main");
        assert_eq!(file.file_extension(), "tsx");
    }

    #[test]
    fn test_reconcile_file_rename_keeps_dotted_filename() {
        let mut tree = tree();
        let mut registry = OpenFileRegistry::new();
        registry.open(&tree, &p("d.ts")).unwrap();

        let change = TreeMutation::RenameFile {
            path: p("d.ts"),
            filename: "config.local".to_string(),
            extension: String::new(),
        }
        .apply(&mut tree)
        .unwrap();
        registry.reconcile(&tree, &change);

        let node = tree.file(&p("config.local")).unwrap();
        let file = registry.active().unwrap();
        assert_eq!(file.path(), &p("config.local"));
        assert_eq!(file.filename(), node.filename);
        assert_eq!(file.file_extension(), node.file_extension);
        assert_eq!(file.filename(), "config.local");
        assert_eq!(file.file_extension(), "");
    }

    #[test]
    fn test_reconcile_delete_closes_subtree() {
        let mut tree = tree();
        let mut registry = OpenFileRegistry::new();
        let ids = open_all(&mut registry, &tree, &["d.ts", "a/b.ts", "a/c.ts"]);

        let change = TreeMutation::DeleteFolder { path: p("a") }
            .apply(&mut tree)
            .unwrap();
        let closed = registry.reconcile(&tree, &change);

        assert_eq!(closed.len(), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_id(), Some(&ids[0]));
    }

    #[test]
    fn test_reconcile_delete_last_entry_clears_active() {
        let mut tree = tree();
        let mut registry = OpenFileRegistry::new();
        registry.open(&tree, &p("a/b.ts")).unwrap();

        let change = TreeMutation::DeleteFolder { path: p("a") }
            .apply(&mut tree)
            .unwrap();
        registry.reconcile(&tree, &change);
        assert!(registry.active_id().is_none());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let tree = tree();
        let mut registry = OpenFileRegistry::new();
        let id = registry.open(&tree, &p("d.ts")).unwrap();
        registry.edit(&id, "x").unwrap();

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json[0]["hasUnsavedChanges"], true);
        assert_eq!(json[0]["originalContent"], "d.ts");
        assert_eq!(json[0]["fileExtension"], "ts");
    }
}
