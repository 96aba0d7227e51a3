//! Structural edits of a project tree.
//!
//! Every mutation addresses nodes by logical path and is validated in full
//! before anything is written, so a failed mutation leaves the tree exactly
//! as it was. A successful mutation returns a [`TreeChange`] describing the
//! affected file paths, which callers use to reconcile open files and to
//! sync the mounted runtime.
//!
//! # Examples
//!
//! ```
//! use playground_tree::{FileNode, FolderNode, TreeChange, TreeMutation, TreePath};
//!
//! let mut root = FolderNode::new("Root");
//! TreeMutation::AddFolder {
//!     parent: TreePath::root(),
//!     folder: FolderNode::new("src"),
//! }
//! .apply(&mut root)
//! .unwrap();
//!
//! let change = TreeMutation::AddFile {
//!     parent: TreePath::new("src").unwrap(),
//!     file: FileNode::new("index", "ts", ""),
//! }
//! .apply(&mut root)
//! .unwrap();
//! assert_eq!(change.path().as_str(), "src/index.ts");
//!
//! // Adding the same name again fails and leaves the tree untouched.
//! let before = root.clone();
//! let err = TreeMutation::AddFile {
//!     parent: TreePath::new("src").unwrap(),
//!     file: FileNode::new("index", "ts", ""),
//! }
//! .apply(&mut root)
//! .unwrap_err();
//! assert!(err.is_duplicate_name());
//! assert_eq!(root, before);
//! ```

use crate::node::{FileNode, FolderNode, TreeNode, not_a_directory, not_a_file, not_found};
use crate::path::{TreePath, validate_name};
use playground_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Kind of node a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// File leaf
    File,
    /// Folder
    Folder,
}

/// A structural edit of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TreeMutation {
    /// Insert a file into the folder at `parent`.
    AddFile {
        /// Target folder
        parent: TreePath,
        /// New file
        file: FileNode,
    },
    /// Insert a folder, possibly with content, into the folder at `parent`.
    AddFolder {
        /// Target folder
        parent: TreePath,
        /// New folder
        folder: FolderNode,
    },
    /// Remove the file at `path`.
    DeleteFile {
        /// File to remove
        path: TreePath,
    },
    /// Remove the folder at `path` with its subtree.
    DeleteFolder {
        /// Folder to remove
        path: TreePath,
    },
    /// Change the name and extension of the file at `path`.
    RenameFile {
        /// File to rename
        path: TreePath,
        /// New basename without extension
        filename: String,
        /// New extension, empty for none
        #[serde(default)]
        extension: String,
    },
    /// Change the name of the folder at `path`.
    RenameFolder {
        /// Folder to rename
        path: TreePath,
        /// New folder name
        name: String,
    },
}

/// Description of an applied mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum TreeChange {
    /// A node was inserted.
    Added {
        /// Path of the new node
        path: TreePath,
        /// Kind of the new node
        kind: NodeKind,
        /// Every file path created, in tree order
        files: Vec<TreePath>,
    },
    /// A node and its subtree were removed.
    Removed {
        /// Path of the removed node
        path: TreePath,
        /// Kind of the removed node
        kind: NodeKind,
        /// Every file path removed
        files: Vec<TreePath>,
    },
    /// A node was renamed.
    Renamed {
        /// Old path
        from: TreePath,
        /// New path
        to: TreePath,
        /// Kind of the renamed node
        kind: NodeKind,
        /// `old -> new` for every file at or below the node
        files: Vec<(TreePath, TreePath)>,
    },
}

impl TreeChange {
    /// Path of the node the change applies to; the new path for renames.
    #[must_use]
    pub const fn path(&self) -> &TreePath {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } => path,
            Self::Renamed { to, .. } => to,
        }
    }

    /// Kind of the node the change applies to.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Added { kind, .. } | Self::Removed { kind, .. } | Self::Renamed { kind, .. } => {
                *kind
            }
        }
    }

    /// Returns `true` for a rename to the current name.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Renamed { from, to, .. } if from == to)
    }
}

impl TreeMutation {
    /// Applies the mutation in place.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the addressed node or parent is missing
    /// - `Error::NotADirectory` / `Error::NotAFile` on a kind mismatch
    /// - `Error::InvalidPath` for an empty or malformed name, or when
    ///   addressing the root for delete or rename
    /// - `Error::DuplicateName` if a sibling already has the resulting name
    ///
    /// On error the tree is unchanged.
    pub fn apply(self, root: &mut FolderNode) -> Result<TreeChange> {
        let change = match self {
            Self::AddFile { parent, file } => add(root, &parent, TreeNode::File(file)),
            Self::AddFolder { parent, folder } => add(root, &parent, TreeNode::Folder(folder)),
            Self::DeleteFile { path } => delete(root, &path, NodeKind::File),
            Self::DeleteFolder { path } => delete(root, &path, NodeKind::Folder),
            Self::RenameFile {
                path,
                filename,
                extension,
            } => rename_file(root, &path, filename, extension),
            Self::RenameFolder { path, name } => rename_folder(root, &path, name),
        }?;
        debug!(change = ?change, "applied tree mutation");
        Ok(change)
    }

    /// Applies the mutation to a copy and returns it with the change.
    ///
    /// The input tree is never touched.
    ///
    /// # Errors
    ///
    /// Same as [`TreeMutation::apply`].
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_tree::{FileNode, FolderNode, TreeMutation, TreePath};
    ///
    /// let root = FolderNode::new("Root");
    /// let (next, _) = TreeMutation::AddFile {
    ///     parent: TreePath::root(),
    ///     file: FileNode::new("a", "ts", ""),
    /// }
    /// .applied(&root)
    /// .unwrap();
    ///
    /// assert!(root.items.is_empty());
    /// assert_eq!(next.items.len(), 1);
    /// ```
    pub fn applied(self, root: &FolderNode) -> Result<(FolderNode, TreeChange)> {
        let mut next = root.clone();
        let change = self.apply(&mut next)?;
        Ok((next, change))
    }
}

fn add(root: &mut FolderNode, parent: &TreePath, mut node: TreeNode) -> Result<TreeChange> {
    validate_node(&node)?;
    let name = node.display_name();
    let path = parent.join(&name)?;

    let folder = root.folder_mut(parent)?;
    if folder.position(&name).is_some() {
        return Err(duplicate(parent, &name));
    }

    let (kind, files) = match &mut node {
        TreeNode::File(_) => (NodeKind::File, vec![path.clone()]),
        TreeNode::Folder(sub) => {
            sub.sort_recursive();
            (NodeKind::Folder, sub.file_paths(&path))
        }
    };
    folder.items.push(node);
    folder.sort_items();

    Ok(TreeChange::Added { path, kind, files })
}

fn delete(root: &mut FolderNode, path: &TreePath, expected: NodeKind) -> Result<TreeChange> {
    let (folder, idx) = locate(root, path, expected)?;
    let files = match folder.items.remove(idx) {
        TreeNode::File(_) => vec![path.clone()],
        TreeNode::Folder(removed) => removed.file_paths(path),
    };

    Ok(TreeChange::Removed {
        path: path.clone(),
        kind: expected,
        files,
    })
}

fn rename_file(
    root: &mut FolderNode,
    path: &TreePath,
    filename: String,
    extension: String,
) -> Result<TreeChange> {
    let renamed = FileNode::new(filename, extension, String::new());
    validate_file(&renamed)?;
    let new_name = renamed.display_name();

    let parent = path.parent().unwrap_or_default();
    let to = parent.join(&new_name)?;
    let (folder, idx) = locate(root, path, NodeKind::File)?;

    if to != *path {
        if folder.position(&new_name).is_some() {
            return Err(duplicate(&parent, &new_name));
        }
        if let TreeNode::File(file) = &mut folder.items[idx] {
            file.filename = renamed.filename;
            file.file_extension = renamed.file_extension;
        }
        folder.sort_items();
    }

    Ok(TreeChange::Renamed {
        files: vec![(path.clone(), to.clone())],
        from: path.clone(),
        to,
        kind: NodeKind::File,
    })
}

fn rename_folder(root: &mut FolderNode, path: &TreePath, name: String) -> Result<TreeChange> {
    validate_name(&name)?;
    let parent = path.parent().unwrap_or_default();
    let to = parent.join(&name)?;
    let (folder, idx) = locate(root, path, NodeKind::Folder)?;

    if to != *path && folder.position(&name).is_some() {
        return Err(duplicate(&parent, &name));
    }

    let TreeNode::Folder(target) = &mut folder.items[idx] else {
        return Err(not_a_directory(path));
    };
    let files = target
        .file_paths(path)
        .into_iter()
        .filter_map(|old| old.rebase(path, &to).map(|new| (old, new)))
        .collect();

    if to != *path {
        target.folder_name = name;
        folder.sort_items();
    }

    Ok(TreeChange::Renamed {
        from: path.clone(),
        to,
        kind: NodeKind::Folder,
        files,
    })
}

/// Parent folder and index of the node at `path`, checked against `expected`.
fn locate<'a>(
    root: &'a mut FolderNode,
    path: &TreePath,
    expected: NodeKind,
) -> Result<(&'a mut FolderNode, usize)> {
    let Some(name) = path.file_name() else {
        return Err(Error::InvalidPath {
            path: String::new(),
            reason: "the root folder cannot be deleted or renamed".to_string(),
        });
    };
    let parent = path.parent().unwrap_or_default();
    let folder = root.folder_mut(&parent).map_err(|e| match e {
        Error::NotADirectory { .. } => not_found(path),
        other => other,
    })?;
    let idx = folder.position(name).ok_or_else(|| not_found(path))?;

    match (&folder.items[idx], expected) {
        (TreeNode::File(_), NodeKind::Folder) => Err(not_a_directory(path)),
        (TreeNode::Folder(_), NodeKind::File) => Err(not_a_file(path)),
        _ => Ok((folder, idx)),
    }
}

fn validate_file(file: &FileNode) -> Result<()> {
    if file.filename.is_empty() {
        return Err(Error::InvalidPath {
            path: file.display_name(),
            reason: "file name cannot be empty".to_string(),
        });
    }
    validate_name(&file.display_name())
}

/// Checks every name below `root` and sibling uniqueness in every folder.
///
/// The root folder's own name is not a path segment and is not checked.
///
/// # Errors
///
/// `Error::InvalidPath` for an empty, relative or `/`-containing name and
/// `Error::DuplicateName` for two siblings with the same display name.
///
/// # Examples
///
/// ```
/// use playground_tree::{FileNode, FolderNode, TreeNode, validate_tree};
///
/// let mut root = FolderNode::new("Root");
/// root.items.push(TreeNode::File(FileNode::new("a", "ts", "")));
/// assert!(validate_tree(&root).is_ok());
///
/// root.items.push(TreeNode::File(FileNode::new("a", "ts", "")));
/// assert!(validate_tree(&root).unwrap_err().is_duplicate_name());
/// ```
pub fn validate_tree(root: &FolderNode) -> Result<()> {
    validate_items(root)
}

/// Checks names and sibling uniqueness of a node and its whole subtree.
fn validate_node(node: &TreeNode) -> Result<()> {
    match node {
        TreeNode::File(file) => validate_file(file),
        TreeNode::Folder(folder) => {
            validate_name(&folder.folder_name)?;
            validate_items(folder)
        }
    }
}

fn validate_items(folder: &FolderNode) -> Result<()> {
    let mut seen = HashSet::new();
    for item in &folder.items {
        validate_node(item)?;
        let name = item.display_name();
        if !seen.insert(name.clone()) {
            return Err(Error::DuplicateName {
                parent: folder.folder_name.clone(),
                name,
            });
        }
    }
    Ok(())
}

fn duplicate(parent: &TreePath, name: &str) -> Error {
    Error::DuplicateName {
        parent: parent.to_string(),
        name: name.to_string(),
    }
}
