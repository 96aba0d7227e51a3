//! Playground session: one project tree, its working set and its gateways.
//!
//! The session is the only writer of its tree. Every UI action goes through
//! it, and gateway calls are issued right after the in-memory change they
//! describe, in mutation order. Gateway failures are returned to the caller
//! while the in-memory tree and working set keep the applied change.

use crate::gateway::{MountGateway, PersistenceGateway};
use crate::persisted::{decode_document, encode_document};
use crate::registry::{OpenFile, OpenFileRegistry};
use playground_core::{Error, FileId, ProjectId, Result, Revision};
use playground_tree::{FolderNode, TreeChange, TreeMutation, TreeNode, TreePath};
use tracing::{debug, info, warn};

/// An open playground project.
///
/// # Examples
///
/// ```
/// use playground_core::ProjectId;
/// use playground_session::{MemoryMount, MemoryStore, PlaygroundSession};
/// use playground_tree::{FileNode, TreeMutation, TreePath};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> playground_core::Result<()> {
/// let mount = MemoryMount::new();
/// let mut session =
///     PlaygroundSession::open(ProjectId::new("demo"), MemoryStore::new(), mount.clone()).await?;
///
/// session
///     .apply(TreeMutation::AddFile {
///         parent: TreePath::root(),
///         file: FileNode::new("index", "ts", ""),
///     })
///     .await?;
///
/// let id = session.open_file(&TreePath::new("index.ts")?)?;
/// session.edit(&id, "console.log(1);").await?;
/// session.save_file(&id).await?;
///
/// assert!(session.is_persisted());
/// assert_eq!(
///     mount.snapshot().await.contents(&TreePath::new("index.ts")?),
///     Some("console.log(1);")
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PlaygroundSession<P, M> {
    project: ProjectId,
    tree: FolderNode,
    registry: OpenFileRegistry,
    persistence: P,
    mount: M,
    revision: Revision,
    persisted_revision: Option<Revision>,
}

impl<P, M> PlaygroundSession<P, M>
where
    P: PersistenceGateway,
    M: MountGateway,
{
    /// Loads a project and mounts its projection.
    ///
    /// A project with no stored document starts as an empty `Root` folder.
    ///
    /// # Errors
    ///
    /// Returns the load error, a decoding error, or the mount error.
    pub async fn open(project: ProjectId, persistence: P, mount: M) -> Result<Self> {
        let stored = persistence.load(&project).await?;
        let exists = stored.is_some();
        let tree = decode_document(stored)?;

        let session = Self {
            project,
            tree,
            registry: OpenFileRegistry::new(),
            persistence,
            mount,
            revision: Revision::INITIAL,
            persisted_revision: exists.then_some(Revision::INITIAL),
        };
        session
            .mount
            .mount(&playground_tree::project(&session.tree))
            .await?;

        info!(
            project = %session.project,
            files = session.tree.file_count(),
            stored = exists,
            "opened project"
        );
        Ok(session)
    }

    /// Starts a session on a freshly imported tree: persists it, then mounts it.
    ///
    /// # Errors
    ///
    /// Returns the persistence or mount error.
    pub async fn create(
        project: ProjectId,
        tree: FolderNode,
        persistence: P,
        mount: M,
    ) -> Result<Self> {
        let mut session = Self {
            project,
            tree,
            registry: OpenFileRegistry::new(),
            persistence,
            mount,
            revision: Revision::INITIAL,
            persisted_revision: None,
        };
        session.tree.sort_recursive();
        session.persist().await?;
        session
            .mount
            .mount(&playground_tree::project(&session.tree))
            .await?;

        info!(project = %session.project, files = session.tree.file_count(), "created project");
        Ok(session)
    }

    /// Project id.
    #[must_use]
    pub const fn project(&self) -> &ProjectId {
        &self.project
    }

    /// The saved tree, without unsaved buffers.
    #[must_use]
    pub const fn tree(&self) -> &FolderNode {
        &self.tree
    }

    /// The working set.
    #[must_use]
    pub const fn registry(&self) -> &OpenFileRegistry {
        &self.registry
    }

    /// Persistence gateway.
    #[must_use]
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Mount gateway.
    #[must_use]
    pub const fn mount(&self) -> &M {
        &self.mount
    }

    /// Revision of the latest mutation or save.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Revision that last reached storage, if any.
    #[must_use]
    pub const fn persisted_revision(&self) -> Option<Revision> {
        self.persisted_revision
    }

    /// Returns `true` if storage holds the latest revision.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.persisted_revision == Some(self.revision)
    }

    /// Applies a structural mutation.
    ///
    /// On success the working set is reconciled, the mount is synced and
    /// the post-mutation tree is persisted. A rename to the current name
    /// changes nothing and issues no gateway calls.
    ///
    /// # Errors
    ///
    /// Mutation errors leave everything untouched. Gateway errors are
    /// returned after both gateways were attempted; the in-memory change is
    /// kept. A mount error takes precedence over a persistence error.
    pub async fn apply(&mut self, mutation: TreeMutation) -> Result<TreeChange> {
        let change = mutation.apply(&mut self.tree)?;
        if change.is_noop() {
            return Ok(change);
        }

        let closed = self.registry.reconcile(&self.tree, &change);
        self.revision = self.revision.next();
        debug!(
            project = %self.project,
            revision = %self.revision,
            closed = closed.len(),
            "applied mutation"
        );

        let mount_result = self.sync_mount(&change).await;
        let persist_result = self.persist().await;
        mount_result?;
        persist_result?;
        Ok(change)
    }

    /// Opens a file in the working set and makes it active.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` or `Error::NotAFile` for a bad path.
    pub fn open_file(&mut self, path: &TreePath) -> Result<FileId> {
        self.registry.open(&self.tree, path)
    }

    /// Closes an open file.
    ///
    /// Unsaved edits are discarded, so the mount gets the saved content
    /// back.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `id` is not open, or the mount error.
    pub async fn close_file(&mut self, id: &FileId) -> Result<OpenFile> {
        let closed = self.registry.close(id)?;
        if closed.has_unsaved_changes() {
            warn!(path = %closed.path(), "discarding unsaved changes");
            self.mount
                .write_file(closed.path(), closed.original_content())
                .await?;
        }
        Ok(closed)
    }

    /// Closes every open file, discarding unsaved edits.
    ///
    /// # Errors
    ///
    /// Returns the first mount error; every entry is closed regardless.
    pub async fn close_all(&mut self) -> Result<Vec<OpenFile>> {
        let closed = self.registry.close_all();
        let mut first_error = None;
        for file in closed.iter().filter(|f| f.has_unsaved_changes()) {
            if let Err(e) = self
                .mount
                .write_file(file.path(), file.original_content())
                .await
            {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(closed), Err)
    }

    /// Makes an open file active.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `id` is not open.
    pub fn set_active(&mut self, id: &FileId) -> Result<()> {
        self.registry.set_active(id)
    }

    /// Replaces the buffer of an open file and writes it to the mount.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `id` is not open, or the mount error; the
    /// buffer keeps the edit either way.
    pub async fn edit(&mut self, id: &FileId, content: impl Into<String>) -> Result<()> {
        let content = content.into();
        self.registry.edit(id, content.as_str())?;
        let path = self.entry(id)?.path().clone();
        self.mount.write_file(&path, &content).await
    }

    /// Saves one open file: its buffer becomes the tree content and the
    /// latest tree is persisted. Only a confirmed persist marks the entry
    /// saved.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `id` is not open, or the persistence error.
    pub async fn save_file(&mut self, id: &FileId) -> Result<()> {
        let (path, content) = {
            let file = self.entry(id)?;
            (file.path().clone(), file.content().to_string())
        };
        self.tree.file_mut(&path)?.content = content;
        self.revision = self.revision.next();

        self.persist().await?;
        self.registry.mark_saved(id)?;
        info!(project = %self.project, path = %path, "saved file");
        Ok(())
    }

    /// Saves every dirty open file with a single persist.
    ///
    /// Returns the number of files saved; nothing is persisted when no
    /// file is dirty.
    ///
    /// # Errors
    ///
    /// Returns the persistence error; no entry is marked saved then.
    pub async fn save_all(&mut self) -> Result<usize> {
        let dirty = self.registry.dirty_ids();
        if dirty.is_empty() {
            return Ok(0);
        }

        for id in &dirty {
            let file = self.entry(id)?;
            let (path, content) = (file.path().clone(), file.content().to_string());
            self.tree.file_mut(&path)?.content = content;
        }
        self.revision = self.revision.next();

        self.persist().await?;
        for id in &dirty {
            self.registry.mark_saved(id)?;
        }
        info!(project = %self.project, files = dirty.len(), "saved all files");
        Ok(dirty.len())
    }

    /// The tree with every open buffer overlaid; what the mount mirrors.
    #[must_use]
    pub fn working_tree(&self) -> FolderNode {
        let mut tree = self.tree.clone();
        for file in self.registry.list() {
            if let Ok(node) = tree.file_mut(file.path()) {
                node.content = file.content().to_string();
            }
        }
        tree
    }

    fn entry(&self, id: &FileId) -> Result<&OpenFile> {
        self.registry.get(id).ok_or_else(|| Error::NotFound {
            path: format!("open file {id}"),
        })
    }

    /// Content the mount should hold for a file: the open buffer if any.
    fn working_content(&self, path: &TreePath, saved: &str) -> String {
        self.registry
            .find_by_path(path)
            .map_or_else(|| saved.to_string(), |f| f.content().to_string())
    }

    async fn persist(&mut self) -> Result<()> {
        let document = encode_document(&self.tree)?;
        self.persistence.save(&self.project, document).await?;
        self.persisted_revision = Some(self.revision);
        debug!(project = %self.project, revision = %self.revision, "persisted project");
        Ok(())
    }

    async fn sync_mount(&self, change: &TreeChange) -> Result<()> {
        match change {
            TreeChange::Added { path, .. } => self.mount_subtree(path).await,
            TreeChange::Removed { path, .. } => self.mount.remove(path).await,
            TreeChange::Renamed { from, to, .. } => {
                self.mount.remove(from).await?;
                self.mount_subtree(to).await
            }
        }
    }

    /// Writes the node at `path` and everything below it to the mount.
    async fn mount_subtree(&self, path: &TreePath) -> Result<()> {
        let Some(node) = self.tree.find(path) else {
            return Err(Error::NotFound {
                path: path.to_string(),
            });
        };

        let mut pending = vec![(path.clone(), node)];
        while let Some((path, node)) = pending.pop() {
            match node {
                TreeNode::File(file) => {
                    let content = self.working_content(&path, &file.content);
                    self.mount.write_file(&path, &content).await?;
                }
                TreeNode::Folder(folder) => {
                    self.mount.create_dir(&path).await?;
                    for item in &folder.items {
                        pending.push((path.join(&item.display_name())?, item));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{MemoryMount, MemoryStore};
    use playground_tree::{FileNode, PathTreeBuilder, RepoTreeEntry};

    fn p(s: &str) -> TreePath {
        TreePath::new(s).unwrap()
    }

    fn sample() -> FolderNode {
        PathTreeBuilder::new("Root")
            .add_entry(RepoTreeEntry::blob("src/index.ts").with_content("export {};"))
            .add_entry(RepoTreeEntry::blob("src/util.ts").with_content("util"))
            .add_entry(RepoTreeEntry::blob("README.md").with_content("# demo"))
            .build()
            .unwrap()
    }

    async fn session() -> (PlaygroundSession<MemoryStore, MemoryMount>, MemoryStore, MemoryMount) {
        let store = MemoryStore::new();
        let mount = MemoryMount::new();
        let session =
            PlaygroundSession::create(ProjectId::new("demo"), sample(), store.clone(), mount.clone())
                .await
                .unwrap();
        (session, store, mount)
    }

    #[tokio::test]
    async fn test_open_missing_project_starts_empty() {
        let session =
            PlaygroundSession::open(ProjectId::new("new"), MemoryStore::new(), MemoryMount::new())
                .await
                .unwrap();

        assert_eq!(session.tree(), &FolderNode::new("Root"));
        assert_eq!(session.persisted_revision(), None);
        assert!(!session.is_persisted());
    }

    #[tokio::test]
    async fn test_create_persists_and_mounts() {
        let (session, store, mount) = session().await;

        assert!(session.is_persisted());
        assert_eq!(store.save_count(), 1);
        assert_eq!(mount.snapshot().await, playground_tree::project(&sample()));
    }

    #[tokio::test]
    async fn test_open_mounts_stored_tree() {
        let (_, store, _) = session().await;
        let mount = MemoryMount::new();
        let session = PlaygroundSession::open(ProjectId::new("demo"), store, mount.clone())
            .await
            .unwrap();

        assert_eq!(session.tree(), &sample());
        assert_eq!(session.persisted_revision(), Some(Revision::INITIAL));
        assert_eq!(mount.snapshot().await.contents(&p("README.md")), Some("# demo"));
    }

    #[tokio::test]
    async fn test_apply_bumps_revision_and_persists() {
        let (mut session, store, mount) = session().await;
        session
            .apply(TreeMutation::AddFile {
                parent: p("src"),
                file: FileNode::new("app", "ts", "app"),
            })
            .await
            .unwrap();

        assert_eq!(session.revision(), Revision::INITIAL.next());
        assert!(session.is_persisted());
        assert_eq!(store.save_count(), 2);
        assert_eq!(mount.snapshot().await.contents(&p("src/app.ts")), Some("app"));
    }

    #[tokio::test]
    async fn test_invalid_mutation_touches_nothing() {
        let (mut session, store, mount) = session().await;
        let err = session
            .apply(TreeMutation::AddFile {
                parent: TreePath::root(),
                file: FileNode::new("README", "md", ""),
            })
            .await
            .unwrap_err();

        assert!(err.is_duplicate_name());
        assert_eq!(session.revision(), Revision::INITIAL);
        assert_eq!(store.save_count(), 1);
        assert_eq!(mount.write_count(), 0);
    }

    #[tokio::test]
    async fn test_rename_to_same_name_is_noop() {
        let (mut session, store, _) = session().await;
        let change = session
            .apply(TreeMutation::RenameFolder {
                path: p("src"),
                name: "src".to_string(),
            })
            .await
            .unwrap();

        assert!(change.is_noop());
        assert_eq!(session.revision(), Revision::INITIAL);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_edit_reaches_mount_not_tree() {
        let (mut session, store, mount) = session().await;
        let id = session.open_file(&p("src/index.ts")).unwrap();
        session.edit(&id, "export const x = 1;").await.unwrap();

        assert_eq!(
            session.tree().file(&p("src/index.ts")).unwrap().content,
            "export {};"
        );
        assert_eq!(
            mount.snapshot().await.contents(&p("src/index.ts")),
            Some("export const x = 1;")
        );
        assert_eq!(store.save_count(), 1);
        assert!(session.registry().has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_save_file() {
        let (mut session, store, _) = session().await;
        let id = session.open_file(&p("src/index.ts")).unwrap();
        session.edit(&id, "saved").await.unwrap();
        session.save_file(&id).await.unwrap();

        assert_eq!(session.tree().file(&p("src/index.ts")).unwrap().content, "saved");
        assert!(!session.registry().has_unsaved_changes());
        let stored = decode_document(store.document(&ProjectId::new("demo")).await).unwrap();
        assert_eq!(stored.file(&p("src/index.ts")).unwrap().content, "saved");
    }

    #[tokio::test]
    async fn test_save_failure_keeps_entry_dirty() {
        let (mut session, store, _) = session().await;
        let id = session.open_file(&p("README.md")).unwrap();
        session.edit(&id, "changed").await.unwrap();

        store.set_unavailable(true);
        let err = session.save_file(&id).await.unwrap_err();
        assert!(err.is_boundary_error());
        assert!(session.registry().get(&id).unwrap().has_unsaved_changes());
        assert!(!session.is_persisted());

        store.set_unavailable(false);
        session.save_file(&id).await.unwrap();
        assert!(session.is_persisted());
        assert!(!session.registry().has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_save_all_single_persist() {
        let (mut session, store, _) = session().await;
        assert_eq!(session.save_all().await.unwrap(), 0);
        assert_eq!(store.save_count(), 1);

        let a = session.open_file(&p("src/index.ts")).unwrap();
        let b = session.open_file(&p("src/util.ts")).unwrap();
        session.open_file(&p("README.md")).unwrap();
        session.edit(&a, "a").await.unwrap();
        session.edit(&b, "b").await.unwrap();

        assert_eq!(session.save_all().await.unwrap(), 2);
        assert_eq!(store.save_count(), 2);
        assert_eq!(session.tree().file(&p("src/util.ts")).unwrap().content, "b");
    }

    #[tokio::test]
    async fn test_close_dirty_file_restores_mount() {
        let (mut session, _, mount) = session().await;
        let id = session.open_file(&p("README.md")).unwrap();
        session.edit(&id, "draft").await.unwrap();

        let closed = session.close_file(&id).await.unwrap();
        assert_eq!(closed.content(), "draft");
        assert!(session.registry().is_empty());
        assert_eq!(mount.snapshot().await.contents(&p("README.md")), Some("# demo"));
    }

    #[tokio::test]
    async fn test_working_tree_overlays_buffers() {
        let (mut session, _, _) = session().await;
        let id = session.open_file(&p("src/util.ts")).unwrap();
        session.edit(&id, "draft").await.unwrap();

        let working = session.working_tree();
        assert_eq!(working.file(&p("src/util.ts")).unwrap().content, "draft");
        assert_eq!(session.tree().file(&p("src/util.ts")).unwrap().content, "util");
    }
}
