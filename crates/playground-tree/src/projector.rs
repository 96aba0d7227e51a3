//! Projection of a tree into the mount image of the sandboxed runtime.
//!
//! The image is a nested map keyed by display name:
//!
//! ```json
//! { "src": { "directory": { "index.ts": { "file": { "contents": "" } } } } }
//! ```
//!
//! An image is always derived from a tree. The only in-place edit is
//! [`MountImage::write_file`], which mirrors an incremental single-file
//! write to the runtime.

use crate::node::{FolderNode, TreeNode};
use crate::path::TreePath;
use playground_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contents of a projected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContents {
    /// File content
    pub contents: String,
}

/// One entry of a mount image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountEntry {
    /// File entry
    File(FileContents),
    /// Nested directory
    Directory(MountImage),
}

/// Nested display name → entry map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MountImage(BTreeMap<String, MountEntry>);

/// Projects a tree into a mount image.
///
/// The root folder's own name is not part of the image.
///
/// # Examples
///
/// ```
/// use playground_tree::{MountEntry, PathTreeBuilder, RepoTreeEntry, project};
///
/// let root = PathTreeBuilder::new("Root")
///     .add_entries(["a/b.ts", "a/c.ts", "d.ts"].map(RepoTreeEntry::blob))
///     .build()
///     .unwrap();
/// let image = project(&root);
///
/// let Some(MountEntry::Directory(a)) = image.entry("a") else { panic!() };
/// assert!(a.entry("b.ts").is_some());
/// assert!(a.entry("c.ts").is_some());
/// assert!(matches!(image.entry("d.ts"), Some(MountEntry::File(_))));
/// ```
#[must_use]
pub fn project(root: &FolderNode) -> MountImage {
    MountImage(
        root.items
            .iter()
            .map(|item| {
                let entry = match item {
                    TreeNode::Folder(folder) => MountEntry::Directory(project(folder)),
                    TreeNode::File(file) => MountEntry::File(FileContents {
                        contents: file.content.clone(),
                    }),
                };
                (item.display_name(), entry)
            })
            .collect(),
    )
}

/// Projects a single file for an incremental write.
///
/// # Errors
///
/// `Error::NotFound` if `path` is missing, `Error::NotAFile` if it is a
/// folder.
pub fn project_file(root: &FolderNode, path: &TreePath) -> Result<(TreePath, String)> {
    let file = root.file(path)?;
    Ok((path.clone(), file.content.clone()))
}

impl MountImage {
    /// Creates an empty image.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct entry with the given name.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&MountEntry> {
        self.0.get(name)
    }

    /// Iterates over direct entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &MountEntry)> {
        self.0.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of direct entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the image has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entry at a logical path.
    #[must_use]
    pub fn get(&self, path: &TreePath) -> Option<&MountEntry> {
        let mut segments = path.segments();
        let mut entry = self.0.get(segments.next()?)?;
        for segment in segments {
            match entry {
                MountEntry::Directory(dir) => entry = dir.0.get(segment)?,
                MountEntry::File(_) => return None,
            }
        }
        Some(entry)
    }

    /// Contents of the file at a logical path.
    #[must_use]
    pub fn contents(&self, path: &TreePath) -> Option<&str> {
        match self.get(path)? {
            MountEntry::File(file) => Some(&file.contents),
            MountEntry::Directory(_) => None,
        }
    }

    /// Writes file contents at `path`, creating missing directories and
    /// replacing whatever entry was there.
    ///
    /// The root path is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_tree::{MountImage, TreePath};
    ///
    /// let mut image = MountImage::new();
    /// let path = TreePath::new("src/index.ts").unwrap();
    /// image.write_file(&path, "export {};");
    /// assert_eq!(image.contents(&path), Some("export {};"));
    /// ```
    pub fn write_file(&mut self, path: &TreePath, contents: impl Into<String>) {
        let Some(name) = path.file_name() else {
            return;
        };
        let parent = path.parent().unwrap_or_default();
        if let Some(dir) = self.dir_mut(&parent) {
            dir.0.insert(
                name.to_string(),
                MountEntry::File(FileContents {
                    contents: contents.into(),
                }),
            );
        }
    }

    /// Creates the directory at `path` and any missing ancestors.
    pub fn create_dir(&mut self, path: &TreePath) {
        self.dir_mut(path);
    }

    /// Removes the entry at `path`, returning it.
    pub fn remove(&mut self, path: &TreePath) -> Option<MountEntry> {
        let name = path.file_name()?;
        let parent = path.parent().unwrap_or_default();
        let mut dir = self;
        for segment in parent.segments() {
            match dir.0.get_mut(segment)? {
                MountEntry::Directory(next) => dir = next,
                MountEntry::File(_) => return None,
            }
        }
        dir.0.remove(name)
    }

    /// Total number of files in the image.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.0
            .values()
            .map(|entry| match entry {
                MountEntry::File(_) => 1,
                MountEntry::Directory(dir) => dir.file_count(),
            })
            .sum()
    }

    /// Directory at `path`, replacing files in the way with directories.
    fn dir_mut(&mut self, path: &TreePath) -> Option<&mut Self> {
        let mut dir = self;
        for segment in path.segments() {
            let entry = dir
                .0
                .entry(segment.to_string())
                .and_modify(|entry| {
                    if let MountEntry::File(_) = entry {
                        *entry = MountEntry::Directory(Self::new());
                    }
                })
                .or_insert_with(|| MountEntry::Directory(Self::new()));
            match entry {
                MountEntry::Directory(next) => dir = next,
                MountEntry::File(_) => return None,
            }
        }
        Some(dir)
    }
}
