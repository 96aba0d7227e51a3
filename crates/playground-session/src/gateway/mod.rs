//! External collaborators of a session.
//!
//! [`PersistenceGateway`] stores one opaque JSON document per project;
//! [`MountGateway`] is the sandboxed runtime that receives the projected
//! mount image and incremental writes. Both are async and must be
//! `Send + Sync`. Implementations report their own failures as
//! `Error::PersistenceFailure` and `Error::MountWriteFailure`; retries are
//! their business.

mod disk;
mod memory;

pub use disk::{DirectoryMount, JsonFileStore};
pub use memory::{MemoryMount, MemoryStore};

use async_trait::async_trait;
use playground_core::{ProjectId, Result};
use playground_tree::{MountImage, TreePath};
use serde_json::Value;

/// Opaque JSON document store keyed by project id.
///
/// # Examples
///
/// ```
/// use playground_core::{ProjectId, Result};
/// use playground_session::PersistenceGateway;
/// use async_trait::async_trait;
/// use serde_json::Value;
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct MapStore(Mutex<HashMap<ProjectId, Value>>);
///
/// #[async_trait]
/// impl PersistenceGateway for MapStore {
///     async fn load(&self, project: &ProjectId) -> Result<Option<Value>> {
///         Ok(self.0.lock().unwrap().get(project).cloned())
///     }
///
///     async fn save(&self, project: &ProjectId, document: Value) -> Result<()> {
///         self.0.lock().unwrap().insert(project.clone(), document);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Loads the stored document, or `None` if the project has none.
    ///
    /// # Errors
    ///
    /// Returns `Error::PersistenceFailure` if the store cannot be read.
    async fn load(&self, project: &ProjectId) -> Result<Option<Value>>;

    /// Replaces the stored document.
    ///
    /// # Errors
    ///
    /// Returns `Error::PersistenceFailure` if the store rejects the write.
    async fn save(&self, project: &ProjectId, document: Value) -> Result<()>;
}

/// Sandboxed runtime filesystem.
#[async_trait]
pub trait MountGateway: Send + Sync {
    /// Mounts a whole image at the runtime root.
    ///
    /// # Errors
    ///
    /// Returns `Error::MountWriteFailure` if the runtime rejects the mount.
    async fn mount(&self, image: &MountImage) -> Result<()>;

    /// Writes one file, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns `Error::MountWriteFailure` if the runtime rejects the write.
    async fn write_file(&self, path: &TreePath, contents: &str) -> Result<()>;

    /// Creates a directory and missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns `Error::MountWriteFailure` if the runtime rejects the call.
    async fn create_dir(&self, path: &TreePath) -> Result<()>;

    /// Removes a file or a directory with its content. Missing paths are
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::MountWriteFailure` if the runtime rejects the call.
    async fn remove(&self, path: &TreePath) -> Result<()>;
}
