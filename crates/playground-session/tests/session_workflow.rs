//! Integration tests for editing sessions against both gateway families.

use playground_core::{ProjectId, Revision};
use playground_session::{
    DirectoryMount, JsonFileStore, MemoryMount, MemoryStore, PersistenceGateway, PlaygroundSession,
    decode_document,
};
use playground_tree::{
    FileNode, FolderNode, PathTreeBuilder, RepoTreeEntry, TreeChange, TreeMutation, TreePath,
    project,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn p(s: &str) -> TreePath {
    TreePath::new(s).unwrap()
}

fn template() -> FolderNode {
    PathTreeBuilder::new("Root")
        .add_entry(RepoTreeEntry::blob("package.json").with_content("{}"))
        .add_entry(RepoTreeEntry::blob("src/main.ts").with_content("main"))
        .add_entry(RepoTreeEntry::blob("src/lib/math.ts").with_content("math"))
        .add_entry(RepoTreeEntry::blob("src/lib/io.ts").with_content("io"))
        .build()
        .unwrap()
}

async fn memory_session() -> (
    PlaygroundSession<MemoryStore, MemoryMount>,
    MemoryStore,
    MemoryMount,
) {
    let store = MemoryStore::new();
    let mount = MemoryMount::new();
    let session = PlaygroundSession::create(
        ProjectId::new("workflow"),
        template(),
        store.clone(),
        mount.clone(),
    )
    .await
    .unwrap();
    (session, store, mount)
}

#[tokio::test]
async fn test_folder_rename_keeps_open_buffers() {
    let (mut session, _, mount) = memory_session().await;
    let math = session.open_file(&p("src/lib/math.ts")).unwrap();
    session.edit(&math, "draft").await.unwrap();
    let main = session.open_file(&p("src/main.ts")).unwrap();

    let change = session
        .apply(TreeMutation::RenameFolder {
            path: p("src/lib"),
            name: "core".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(change, TreeChange::Renamed { ref to, .. } if *to == p("src/core")));

    let registry = session.registry();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.active_id(), Some(&main));

    let moved = registry.find_by_path(&p("src/core/math.ts")).unwrap();
    assert_eq!(moved.content(), "draft");
    assert!(moved.has_unsaved_changes());
    assert!(registry.get(&math).is_none());

    let image = mount.snapshot().await;
    assert!(image.get(&p("src/lib")).is_none());
    assert_eq!(image.contents(&p("src/core/math.ts")), Some("draft"));
    assert_eq!(image.contents(&p("src/core/io.ts")), Some("io"));
}

#[tokio::test]
async fn test_file_rename_updates_tab() {
    let (mut session, _, mount) = memory_session().await;
    let id = session.open_file(&p("src/main.ts")).unwrap();
    session.edit(&id, "edited").await.unwrap();

    session
        .apply(TreeMutation::RenameFile {
            path: p("src/main.ts"),
            filename: "index".to_string(),
            extension: "tsx".to_string(),
        })
        .await
        .unwrap();

    let active = session.registry().active().unwrap();
    assert_eq!(active.path(), &p("src/index.tsx"));
    assert_eq!(active.filename(), "index");
    assert_eq!(active.file_extension(), "tsx");
    assert_eq!(active.content(), "edited");

    let image = mount.snapshot().await;
    assert!(image.get(&p("src/main.ts")).is_none());
    assert_eq!(image.contents(&p("src/index.tsx")), Some("edited"));
}

#[tokio::test]
async fn test_delete_folder_closes_descendants() {
    let (mut session, store, mount) = memory_session().await;
    session.open_file(&p("package.json")).unwrap();
    session.open_file(&p("src/lib/io.ts")).unwrap();
    session.open_file(&p("src/lib/math.ts")).unwrap();

    let change = session
        .apply(TreeMutation::DeleteFolder { path: p("src/lib") })
        .await
        .unwrap();
    assert!(matches!(change, TreeChange::Removed { ref files, .. } if files.len() == 2));

    let registry = session.registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.active().unwrap().path(), &p("package.json"));
    assert!(mount.snapshot().await.get(&p("src/lib")).is_none());

    let stored = decode_document(store.document(&ProjectId::new("workflow")).await).unwrap();
    assert!(stored.find(&p("src/lib")).is_none());
}

#[tokio::test]
async fn test_mount_mirrors_working_tree() {
    let (mut session, _, mount) = memory_session().await;
    let main = session.open_file(&p("src/main.ts")).unwrap();
    session.edit(&main, "v2").await.unwrap();

    let mut assets = FolderNode::new("assets");
    assets.items.push(FileNode::new("logo", "svg", "<svg/>").into());
    let mutations = vec![
        TreeMutation::AddFolder {
            parent: p("src"),
            folder: assets,
        },
        TreeMutation::AddFile {
            parent: TreePath::root(),
            file: FileNode::from_display_name(".gitignore", "node_modules"),
        },
        TreeMutation::RenameFolder {
            path: p("src"),
            name: "app".to_string(),
        },
        TreeMutation::DeleteFile {
            path: p("app/lib/io.ts"),
        },
        TreeMutation::AddFolder {
            parent: TreePath::root(),
            folder: FolderNode::new("empty"),
        },
    ];

    for mutation in mutations {
        session.apply(mutation).await.unwrap();
        assert_eq!(mount.snapshot().await, project(&session.working_tree()));
    }
    assert_eq!(session.revision(), Revision::INITIAL.next().next().next().next().next());
}

#[tokio::test]
async fn test_boundary_failures_keep_state() {
    let (mut session, store, mount) = memory_session().await;
    mount.set_unavailable(true);
    store.set_unavailable(true);

    let err = session
        .apply(TreeMutation::AddFile {
            parent: p("src"),
            file: FileNode::new("new", "ts", ""),
        })
        .await
        .unwrap_err();
    assert!(err.is_boundary_error());
    assert!(matches!(err, playground_core::Error::MountWriteFailure { .. }));
    assert!(session.tree().find(&p("src/new.ts")).is_some());
    assert!(!session.is_persisted());

    mount.set_unavailable(false);
    let err = session
        .apply(TreeMutation::DeleteFile { path: p("package.json") })
        .await
        .unwrap_err();
    assert!(matches!(err, playground_core::Error::PersistenceFailure { .. }));
    assert!(mount.snapshot().await.get(&p("package.json")).is_none());

    store.set_unavailable(false);
    let id = session.open_file(&p("src/new.ts")).unwrap();
    session.edit(&id, "recovered").await.unwrap();
    session.save_file(&id).await.unwrap();
    assert!(session.is_persisted());

    let stored = decode_document(store.document(&ProjectId::new("workflow")).await).unwrap();
    assert_eq!(stored.file(&p("src/new.ts")).unwrap().content, "recovered");
    assert!(stored.find(&p("package.json")).is_none());
}

#[tokio::test]
async fn test_legacy_document_shapes() {
    let documents = [
        json!(r#"{"folderName":"Root","items":[{"filename":"a","fileExtension":"ts","content":"a"}]}"#),
        json!([{"filename": "a", "fileExtension": "ts", "content": "a"}]),
        json!({"folderName": "Root", "items": [{"filename": "a", "fileExtension": "ts", "content": "a"}]}),
    ];

    for (i, document) in documents.into_iter().enumerate() {
        let store = MemoryStore::new();
        let project_id = ProjectId::new(format!("legacy-{i}"));
        store.insert(project_id.clone(), document).await;

        let mount = MemoryMount::new();
        let mut session = PlaygroundSession::open(project_id.clone(), store.clone(), mount.clone())
            .await
            .unwrap();
        assert_eq!(mount.snapshot().await.contents(&p("a.ts")), Some("a"));

        session
            .apply(TreeMutation::AddFolder {
                parent: TreePath::root(),
                folder: FolderNode::new("src"),
            })
            .await
            .unwrap();
        let stored = store.document(&project_id).await.unwrap();
        assert_eq!(stored["folderName"], "Root");
        assert!(stored["items"].is_array());
    }
}

#[tokio::test]
async fn test_unsafe_documents_are_rejected_before_mounting() {
    let dir = TempDir::new().unwrap();
    let documents = [
        json!({"folderName": "Root", "items": [
            {"folderName": "..", "items": [
                {"filename": "escaped", "fileExtension": "txt", "content": "x"}
            ]}
        ]}),
        json!({"folderName": "Root", "items": [
            {"filename": "a", "fileExtension": "ts", "content": "1"},
            {"filename": "a", "fileExtension": "ts", "content": "2"}
        ]}),
    ];

    for (i, document) in documents.into_iter().enumerate() {
        let store = MemoryStore::new();
        let project_id = ProjectId::new(format!("unsafe-{i}"));
        store.insert(project_id.clone(), document).await;

        let base = dir.path().join(format!("mount-{i}"));
        let result =
            PlaygroundSession::open(project_id, store, DirectoryMount::new(&base)).await;
        assert!(result.is_err());
        assert!(!base.exists());
    }
    assert!(!dir.path().join("escaped.txt").exists());
}

#[tokio::test]
async fn test_disk_gateways_end_to_end() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("projects"));
    let mount_dir = dir.path().join("runtime");
    let project_id = ProjectId::new("disk");

    {
        let mut session = PlaygroundSession::create(
            project_id.clone(),
            template(),
            store.clone(),
            DirectoryMount::new(&mount_dir),
        )
        .await
        .unwrap();

        assert_eq!(fs::read_to_string(mount_dir.join("src/lib/math.ts")).unwrap(), "math");

        session
            .apply(TreeMutation::RenameFolder {
                path: p("src/lib"),
                name: "util".to_string(),
            })
            .await
            .unwrap();
        let id = session.open_file(&p("src/util/io.ts")).unwrap();
        session.edit(&id, "io v2").await.unwrap();
        session.save_all().await.unwrap();

        assert!(!mount_dir.join("src/lib").exists());
        assert_eq!(fs::read_to_string(mount_dir.join("src/util/io.ts")).unwrap(), "io v2");
    }

    assert_eq!(store.list().await.unwrap(), vec![project_id.clone()]);
    let reopened_dir = dir.path().join("runtime-2");
    let session = PlaygroundSession::open(
        project_id.clone(),
        store.clone(),
        DirectoryMount::new(&reopened_dir),
    )
    .await
    .unwrap();

    assert_eq!(session.tree().file(&p("src/util/io.ts")).unwrap().content, "io v2");
    assert_eq!(fs::read_to_string(reopened_dir.join("package.json")).unwrap(), "{}");
    assert!(store.load(&project_id).await.unwrap().is_some());
}
