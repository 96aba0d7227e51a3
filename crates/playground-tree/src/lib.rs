//! Project tree for the code playground.
//!
//! A project is a single root [`FolderNode`] whose items are nested folders
//! and files. This crate builds trees from flat repository listings and
//! local template directories, edits them structurally, and projects them
//! into the mount image consumed by the sandboxed runtime.
//!
//! # Architecture
//!
//! - [`PathTreeBuilder`]: flat `{ path, type }` listing → sorted tree
//! - [`TreeMutation`]: add, delete and rename by logical path
//! - [`project`] / [`project_file`]: tree → [`MountImage`]
//! - [`TemplateScanner`]: local directory → sorted tree
//!
//! All operations are synchronous and never perform network I/O.
//!
//! # Examples
//!
//! ```
//! use playground_tree::{PathTreeBuilder, RepoTreeEntry, TreeMutation, TreePath, project};
//!
//! let mut root = PathTreeBuilder::new("demo")
//!     .add_entry(RepoTreeEntry::blob("src/index.ts").with_content("export {};"))
//!     .build()?;
//!
//! TreeMutation::RenameFolder {
//!     path: TreePath::new("src")?,
//!     name: "lib".to_string(),
//! }
//! .apply(&mut root)?;
//!
//! let image = project(&root);
//! assert_eq!(image.contents(&TreePath::new("lib/index.ts")?), Some("export {};"));
//! # Ok::<(), playground_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod builder;
mod mutator;
mod node;
mod path;
mod projector;
mod scanner;

pub use builder::{BuildStats, EntryKind, PathTreeBuilder, RepoTreeEntry, oversized_placeholder};
pub use mutator::{NodeKind, TreeChange, TreeMutation, validate_tree};
pub use node::{FileNode, FolderNode, TreeNode, compare_nodes, split_file_name};
pub use path::{SEPARATOR, TreePath, validate_name};
pub use projector::{FileContents, MountEntry, MountImage, project, project_file};
pub use scanner::{
    DEFAULT_IGNORE_FILES, DEFAULT_IGNORE_FOLDERS, DEFAULT_IGNORE_PATTERNS, ScanOptions, ScanStats,
    TemplateScanner,
};
