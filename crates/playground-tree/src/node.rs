//! Tree data model: files, folders and their ordering.
//!
//! The serialized form uses camelCase keys and is the persisted project
//! document:
//!
//! ```json
//! { "folderName": "Root", "items": [
//!     { "folderName": "src", "items": [
//!         { "filename": "index", "fileExtension": "ts", "content": "" }
//!     ] }
//! ] }
//! ```
//!
//! # Examples
//!
//! ```
//! use playground_tree::{FileNode, FolderNode, TreeNode};
//!
//! let mut root = FolderNode::new("Root");
//! root.items.push(TreeNode::File(FileNode::new("b", "ts", "")));
//! root.items.push(TreeNode::Folder(FolderNode::new("src")));
//! root.items.push(TreeNode::File(FileNode::new("a", "ts", "")));
//! root.sort_recursive();
//!
//! let names: Vec<_> = root.items.iter().map(TreeNode::display_name).collect();
//! assert_eq!(names, ["src", "a.ts", "b.ts"]);
//! ```

use crate::path::TreePath;
use playground_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A file leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    /// Basename without the extension
    pub filename: String,

    /// Extension without the separator; empty when the file has none
    #[serde(default)]
    pub file_extension: String,

    /// File content
    #[serde(default)]
    pub content: String,
}

impl FileNode {
    /// Creates a file node from its parts.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        file_extension: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            file_extension: file_extension.into(),
            content: content.into(),
        }
    }

    /// Creates a file node from a display name, splitting off the extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_tree::FileNode;
    ///
    /// let file = FileNode::from_display_name("vite.config.ts", "");
    /// assert_eq!(file.filename, "vite.config");
    /// assert_eq!(file.file_extension, "ts");
    ///
    /// let dotfile = FileNode::from_display_name(".gitignore", "");
    /// assert_eq!(dotfile.filename, ".gitignore");
    /// assert_eq!(dotfile.file_extension, "");
    /// ```
    #[must_use]
    pub fn from_display_name(name: &str, content: impl Into<String>) -> Self {
        let (filename, extension) = split_file_name(name);
        Self::new(filename, extension, content)
    }

    /// Returns `filename.extension`, or the bare filename without extension.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name_of(&self.filename, &self.file_extension)
    }
}

/// A folder owning its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    /// Folder display name
    pub folder_name: String,

    /// Child folders and files
    #[serde(default)]
    pub items: Vec<TreeNode>,
}

/// A node of the project tree.
///
/// Deserialization tries `Folder` first; a folder object is recognized by
/// its `folderName` key, a file by its `filename` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Nested folder
    Folder(FolderNode),
    /// File leaf
    File(FileNode),
}

/// Splits a basename on its last `.`.
///
/// A basename without a dot, with only a leading dot, or ending in a dot
/// has no extension.
///
/// # Examples
///
/// ```
/// use playground_tree::split_file_name;
///
/// assert_eq!(split_file_name("index.ts"), ("index", "ts"));
/// assert_eq!(split_file_name("Makefile"), ("Makefile", ""));
/// assert_eq!(split_file_name(".env"), (".env", ""));
/// ```
#[must_use]
pub fn split_file_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], &name[idx + 1..]),
        _ => (name, ""),
    }
}

fn display_name_of(filename: &str, extension: &str) -> String {
    if extension.is_empty() {
        filename.to_string()
    } else {
        format!("{filename}.{extension}")
    }
}

/// Case-insensitive comparison; ties put lowercase before uppercase.
fn compare_names(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| b.cmp(a))
}

/// Total order of siblings: folders first, then files, each by name.
#[must_use]
pub fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    match (a, b) {
        (TreeNode::Folder(_), TreeNode::File(_)) => Ordering::Less,
        (TreeNode::File(_), TreeNode::Folder(_)) => Ordering::Greater,
        (TreeNode::Folder(x), TreeNode::Folder(y)) => compare_names(&x.folder_name, &y.folder_name),
        (TreeNode::File(x), TreeNode::File(y)) => compare_names(&x.filename, &y.filename)
            .then_with(|| compare_names(&x.file_extension, &y.file_extension)),
    }
}

impl TreeNode {
    /// Returns the sibling-unique display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Folder(folder) => folder.folder_name.clone(),
            Self::File(file) => file.display_name(),
        }
    }

    /// Returns `true` if the display name equals `name`.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        match self {
            Self::Folder(folder) => folder.folder_name == name,
            Self::File(file) => file.display_name() == name,
        }
    }

    /// Returns `true` for file nodes.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns the file, if this is one.
    #[must_use]
    pub const fn as_file(&self) -> Option<&FileNode> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    /// Returns the folder, if this is one.
    #[must_use]
    pub const fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }
}

impl From<FileNode> for TreeNode {
    fn from(file: FileNode) -> Self {
        Self::File(file)
    }
}

impl From<FolderNode> for TreeNode {
    fn from(folder: FolderNode) -> Self {
        Self::Folder(folder)
    }
}

impl FolderNode {
    /// Creates an empty folder.
    #[must_use]
    pub fn new(folder_name: impl Into<String>) -> Self {
        Self {
            folder_name: folder_name.into(),
            items: Vec::new(),
        }
    }

    /// Creates a folder with the given items, sorted recursively.
    #[must_use]
    pub fn with_items(folder_name: impl Into<String>, items: Vec<TreeNode>) -> Self {
        let mut folder = Self {
            folder_name: folder_name.into(),
            items,
        };
        folder.sort_recursive();
        folder
    }

    /// Index of the direct child with the given display name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.has_name(name))
    }

    /// Direct child with the given display name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.items.iter().find(|item| item.has_name(name))
    }

    /// Node at `path`, or `None` if missing. The root path yields `None`
    /// since the root is not a `TreeNode`.
    #[must_use]
    pub fn find(&self, path: &TreePath) -> Option<&TreeNode> {
        let mut segments = path.segments();
        let mut node = self.child(segments.next()?)?;
        for segment in segments {
            node = node.as_folder()?.child(segment)?;
        }
        Some(node)
    }

    /// Folder at `path`; the root path yields `self`.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if a segment is missing, `Error::NotADirectory` if
    /// a segment names a file.
    pub fn folder(&self, path: &TreePath) -> Result<&Self> {
        let mut current = self;
        for segment in path.segments() {
            current = match current.child(segment) {
                Some(TreeNode::Folder(folder)) => folder,
                Some(TreeNode::File(_)) => return Err(not_a_directory(path)),
                None => return Err(not_found(path)),
            };
        }
        Ok(current)
    }

    /// Mutable folder at `path`; the root path yields `self`.
    ///
    /// # Errors
    ///
    /// Same as [`FolderNode::folder`].
    pub fn folder_mut(&mut self, path: &TreePath) -> Result<&mut Self> {
        let mut current = self;
        for segment in path.segments() {
            let idx = current.position(segment).ok_or_else(|| not_found(path))?;
            current = match &mut current.items[idx] {
                TreeNode::Folder(folder) => folder,
                TreeNode::File(_) => return Err(not_a_directory(path)),
            };
        }
        Ok(current)
    }

    /// File at `path`.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if missing, `Error::NotAFile` if `path` is a folder
    /// (including the root).
    pub fn file(&self, path: &TreePath) -> Result<&FileNode> {
        if path.is_root() {
            return Err(not_a_file(path));
        }
        match self.find(path) {
            Some(TreeNode::File(file)) => Ok(file),
            Some(TreeNode::Folder(_)) => Err(not_a_file(path)),
            None => Err(not_found(path)),
        }
    }

    /// Mutable file at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`FolderNode::file`].
    pub fn file_mut(&mut self, path: &TreePath) -> Result<&mut FileNode> {
        let name = path.file_name().ok_or_else(|| not_a_file(path))?;
        let parent = path.parent().unwrap_or_default();
        let folder = self.folder_mut(&parent).map_err(|e| match e {
            Error::NotADirectory { .. } => not_found(path),
            other => other,
        })?;
        let idx = folder.position(name).ok_or_else(|| not_found(path))?;
        match &mut folder.items[idx] {
            TreeNode::File(file) => Ok(file),
            TreeNode::Folder(_) => Err(not_a_file(path)),
        }
    }

    /// Every file below this folder with its path relative to it, in tree
    /// order (depth first, folders before files).
    #[must_use]
    pub fn files(&self) -> Vec<(TreePath, &FileNode)> {
        let mut out = Vec::new();
        self.collect_files(&TreePath::root(), &mut out);
        out
    }

    fn collect_files<'a>(&'a self, base: &TreePath, out: &mut Vec<(TreePath, &'a FileNode)>) {
        for item in &self.items {
            let Ok(path) = base.join(&item.display_name()) else {
                continue;
            };
            match item {
                TreeNode::Folder(folder) => folder.collect_files(&path, out),
                TreeNode::File(file) => out.push((path, file)),
            }
        }
    }

    /// Paths of every file below this folder, prefixed with `base`.
    #[must_use]
    pub fn file_paths(&self, base: &TreePath) -> Vec<TreePath> {
        self.files()
            .into_iter()
            .filter_map(|(path, _)| path.rebase(&TreePath::root(), base))
            .collect()
    }

    /// Number of files below this folder.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| match item {
                TreeNode::Folder(folder) => folder.file_count(),
                TreeNode::File(_) => 1,
            })
            .sum()
    }

    /// Number of folders below this folder, excluding itself.
    #[must_use]
    pub fn folder_count(&self) -> usize {
        self.items
            .iter()
            .filter_map(TreeNode::as_folder)
            .map(|folder| 1 + folder.folder_count())
            .sum()
    }

    /// Sorts the direct items only.
    pub fn sort_items(&mut self) {
        self.items.sort_by(compare_nodes);
    }

    /// Sorts every folder in the subtree.
    pub fn sort_recursive(&mut self) {
        for item in &mut self.items {
            if let TreeNode::Folder(folder) = item {
                folder.sort_recursive();
            }
        }
        self.sort_items();
    }

    /// Returns `true` if every folder in the subtree is in sibling order.
    #[must_use]
    pub fn is_sorted_recursive(&self) -> bool {
        self.items
            .windows(2)
            .all(|pair| compare_nodes(&pair[0], &pair[1]) != Ordering::Greater)
            && self
                .items
                .iter()
                .filter_map(TreeNode::as_folder)
                .all(Self::is_sorted_recursive)
    }
}

pub(crate) fn not_found(path: &TreePath) -> Error {
    Error::NotFound {
        path: path.to_string(),
    }
}

pub(crate) fn not_a_directory(path: &TreePath) -> Error {
    Error::NotADirectory {
        path: path.to_string(),
    }
}

pub(crate) fn not_a_file(path: &TreePath) -> Error {
    Error::NotAFile {
        path: path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> TreeNode {
        TreeNode::File(FileNode::from_display_name(name, ""))
    }

    fn folder(name: &str, items: Vec<TreeNode>) -> TreeNode {
        TreeNode::Folder(FolderNode::with_items(name, items))
    }

    fn names(folder: &FolderNode) -> Vec<String> {
        folder.items.iter().map(TreeNode::display_name).collect()
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("a.b.c"), ("a.b", "c"));
        assert_eq!(split_file_name("README"), ("README", ""));
        assert_eq!(split_file_name(".eslintrc"), (".eslintrc", ""));
        assert_eq!(split_file_name(".eslintrc.json"), (".eslintrc", "json"));
        assert_eq!(split_file_name("odd."), ("odd.", ""));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(FileNode::new("index", "ts", "").display_name(), "index.ts");
        assert_eq!(FileNode::new("Makefile", "", "").display_name(), "Makefile");
    }

    #[test]
    fn test_folders_before_files() {
        let root = FolderNode::with_items(
            "Root",
            vec![file("a.ts"), folder("z", vec![]), file("B.ts"), folder("b", vec![])],
        );
        assert_eq!(names(&root), ["b", "z", "a.ts", "B.ts"]);
    }

    #[test]
    fn test_case_tiebreak_is_stable() {
        let forward = FolderNode::with_items("Root", vec![file("A.ts"), file("a.ts")]);
        let backward = FolderNode::with_items("Root", vec![file("a.ts"), file("A.ts")]);
        assert_eq!(names(&forward), ["a.ts", "A.ts"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_extension_tiebreak() {
        let root = FolderNode::with_items("Root", vec![file("index.ts"), file("index.css")]);
        assert_eq!(names(&root), ["index.css", "index.ts"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut root = FolderNode::with_items(
            "Root",
            vec![folder("src", vec![file("b.ts"), file("a.ts")]), file("x")],
        );
        let once = root.clone();
        root.sort_recursive();
        assert_eq!(root, once);
        assert!(root.is_sorted_recursive());
    }

    #[test]
    fn test_find_and_kind_errors() {
        let root = FolderNode::with_items(
            "Root",
            vec![folder("src", vec![file("index.ts")]), file("README.md")],
        );
        let index = TreePath::new("src/index.ts").unwrap();
        assert_eq!(root.file(&index).unwrap().filename, "index");

        let src = TreePath::new("src").unwrap();
        assert!(root.file(&src).unwrap_err().is_kind_mismatch());
        assert!(root.file(&TreePath::root()).is_err());

        let readme = TreePath::new("README.md/x").unwrap();
        assert!(matches!(root.folder(&readme), Err(Error::NotADirectory { .. })));

        let missing = TreePath::new("lib/a.ts").unwrap();
        assert!(root.file(&missing).unwrap_err().is_not_found());
    }

    #[test]
    fn test_file_mut_updates_content() {
        let mut root = FolderNode::with_items("Root", vec![folder("src", vec![file("a.ts")])]);
        let path = TreePath::new("src/a.ts").unwrap();
        root.file_mut(&path).unwrap().content = "x".to_string();
        assert_eq!(root.file(&path).unwrap().content, "x");
    }

    #[test]
    fn test_extensionless_file_name_lookup() {
        let root = FolderNode::with_items("Root", vec![file("Makefile"), file("odd.")]);
        assert!(root.child("Makefile").is_some());
        assert!(root.child("odd.").is_some());
        assert!(root.child("Makefile.txt").is_none());
    }

    #[test]
    fn test_files_and_counts() {
        let root = FolderNode::with_items(
            "Root",
            vec![
                folder("a", vec![file("c.ts"), file("b.ts")]),
                file("d.ts"),
                folder("empty", vec![]),
            ],
        );
        let paths: Vec<_> = root.files().into_iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(paths, ["a/b.ts", "a/c.ts", "d.ts"]);
        assert_eq!(root.file_count(), 3);
        assert_eq!(root.folder_count(), 2);

        let base = TreePath::new("x").unwrap();
        let under: Vec<_> = root.file_paths(&base).iter().map(ToString::to_string).collect();
        assert_eq!(under, ["x/a/b.ts", "x/a/c.ts", "x/d.ts"]);
    }

    #[test]
    fn test_serde_camel_case() {
        let root = FolderNode::with_items(
            "Root",
            vec![TreeNode::File(FileNode::new("index", "ts", "let a;"))],
        );
        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["folderName"], "Root");
        assert_eq!(json["items"][0]["fileExtension"], "ts");

        let back: FolderNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, root);
    }

    #[test]
    fn test_deserialize_distinguishes_kinds() {
        let json = r#"[{"folderName":"src","items":[]},{"filename":"a","fileExtension":"ts","content":""}]"#;
        let items: Vec<TreeNode> = serde_json::from_str(json).unwrap();
        assert!(!items[0].is_file());
        assert!(items[1].is_file());
    }
}
