//! In-memory gateways.
//!
//! Clones share storage, so a test or an embedding application can keep a
//! handle to inspect what a session stored and mounted.

use super::{MountGateway, PersistenceGateway};
use async_trait::async_trait;
use playground_core::{Error, ProjectId, Result};
use playground_tree::{MountImage, TreePath};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory document store.
///
/// # Examples
///
/// ```
/// use playground_core::ProjectId;
/// use playground_session::{MemoryStore, PersistenceGateway};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MemoryStore::new();
/// let project = ProjectId::new("demo");
/// store.save(&project, json!({"folderName": "Root", "items": []})).await.unwrap();
///
/// let handle = store.clone();
/// assert!(handle.load(&project).await.unwrap().is_some());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<ProjectId, Value>>>,
    unavailable: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw document, in whatever shape a legacy store held it.
    pub async fn insert(&self, project: ProjectId, document: Value) {
        self.documents.write().await.insert(project, document);
    }

    /// Returns the stored document without going through the gateway.
    pub async fn document(&self, project: &ProjectId) -> Option<Value> {
        self.documents.read().await.get(project).cloned()
    }

    /// Makes every following call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check(&self, project: &ProjectId) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::PersistenceFailure {
                project: project.to_string(),
                source: "store unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for MemoryStore {
    async fn load(&self, project: &ProjectId) -> Result<Option<Value>> {
        self.check(project)?;
        Ok(self.documents.read().await.get(project).cloned())
    }

    async fn save(&self, project: &ProjectId, document: Value) -> Result<()> {
        self.check(project)?;
        self.documents
            .write()
            .await
            .insert(project.clone(), document);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory runtime filesystem mirroring the mount image.
#[derive(Debug, Clone, Default)]
pub struct MemoryMount {
    image: Arc<RwLock<MountImage>>,
    unavailable: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryMount {
    /// Creates an empty mount.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mounted image.
    pub async fn snapshot(&self) -> MountImage {
        self.image.read().await.clone()
    }

    /// Makes every following call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful single-file writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, path: &TreePath) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::MountWriteFailure {
                path: path.to_string(),
                source: "runtime unavailable".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MountGateway for MemoryMount {
    async fn mount(&self, image: &MountImage) -> Result<()> {
        self.check(&TreePath::root())?;
        *self.image.write().await = image.clone();
        Ok(())
    }

    async fn write_file(&self, path: &TreePath, contents: &str) -> Result<()> {
        self.check(path)?;
        self.image.write().await.write_file(path, contents);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_dir(&self, path: &TreePath) -> Result<()> {
        self.check(path)?;
        self.image.write().await.create_dir(path);
        Ok(())
    }

    async fn remove(&self, path: &TreePath) -> Result<()> {
        self.check(path)?;
        self.image.write().await.remove(path);
        Ok(())
    }
}
