//! Editing sessions for playground projects.
//!
//! A [`PlaygroundSession`] owns one project tree and coordinates every
//! change to it: structural mutations, the working set of open files, the
//! persisted document and the mounted runtime filesystem.
//!
//! # Architecture
//!
//! ```text
//! UI action ─► PlaygroundSession ─► TreeMutation::apply ─► FolderNode
//!                    │                                          │
//!                    ├─► OpenFileRegistry::reconcile            │
//!                    ├─► MountGateway (incremental writes) ◄────┤
//!                    └─► PersistenceGateway (whole document) ◄──┘
//! ```
//!
//! The gateways are traits; [`MemoryStore`]/[`MemoryMount`] keep everything
//! in memory and [`JsonFileStore`]/[`DirectoryMount`] use the local disk.
//!
//! # Examples
//!
//! ```
//! use playground_core::ProjectId;
//! use playground_session::{MemoryMount, MemoryStore, PlaygroundSession};
//! use playground_tree::{TreeMutation, TreePath};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> playground_core::Result<()> {
//! let store = MemoryStore::new();
//! let mut session =
//!     PlaygroundSession::open(ProjectId::new("demo"), store.clone(), MemoryMount::new()).await?;
//!
//! session
//!     .apply(TreeMutation::AddFolder {
//!         parent: TreePath::root(),
//!         folder: playground_tree::FolderNode::new("src"),
//!     })
//!     .await?;
//!
//! assert!(store.document(&ProjectId::new("demo")).await.is_some());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod gateway;
mod persisted;
mod registry;
mod session;

pub use gateway::{
    DirectoryMount, JsonFileStore, MemoryMount, MemoryStore, MountGateway, PersistenceGateway,
};
pub use persisted::{DEFAULT_ROOT_NAME, decode_document, encode_document};
pub use registry::{OpenFile, OpenFileRegistry, OpenFileSnapshot};
pub use session::PlaygroundSession;
