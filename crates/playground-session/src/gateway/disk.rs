//! On-disk gateways.
//!
//! [`JsonFileStore`] keeps one `<project-id>.json` document per project in
//! a base directory. [`DirectoryMount`] materializes the mount image under
//! a base directory so a local toolchain can run the project.
//!
//! Files are written atomically: content goes to a sibling temp file which
//! is then renamed over the target.
//!
//! # Directory Structure
//!
//! ```text
//! projects_dir/
//! ├── 3f1c...e2.json
//! └── my-app.json
//! ```

use super::{MountGateway, PersistenceGateway};
use async_trait::async_trait;
use playground_core::{Error, ProjectId, Result};
use playground_tree::{MountEntry, MountImage, TreePath};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const DOCUMENT_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".tmp";

/// Writes `content` to `path` through a temp file and a rename.
async fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(TEMP_SUFFIX);
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content).await?;
    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }
    Ok(())
}

/// Project document store backed by a directory of JSON files.
///
/// # Examples
///
/// ```
/// use playground_core::ProjectId;
/// use playground_session::JsonFileStore;
///
/// let store = JsonFileStore::new("/var/lib/playground/projects");
/// assert!(store.document_path(&ProjectId::new("my-app")).is_ok());
/// assert!(store.document_path(&ProjectId::new("../etc/passwd")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `base_dir`. The directory is created on
    /// first save.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Base directory of the store.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the document for `project`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the id is empty, contains a path
    /// separator or a NUL byte, or is `.`/`..`.
    pub fn document_path(&self, project: &ProjectId) -> Result<PathBuf> {
        let id = project.as_str();
        if id.is_empty()
            || id == "."
            || id == ".."
            || id.contains(['/', '\\', '\0'])
        {
            return Err(Error::InvalidArgument(format!(
                "invalid project id '{id}': must be a plain file name"
            )));
        }
        Ok(self.base_dir.join(format!("{id}.{DOCUMENT_EXTENSION}")))
    }

    /// Ids of every stored project, sorted.
    ///
    /// # Errors
    ///
    /// Returns `Error::PersistenceFailure` if the directory cannot be read.
    /// A missing directory yields an empty list.
    pub async fn list(&self) -> Result<Vec<ProjectId>> {
        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(store_failure("*", e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| store_failure("*", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(ProjectId::new(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Deletes a stored project. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` for a bad id and
    /// `Error::PersistenceFailure` if the file cannot be removed.
    pub async fn remove(&self, project: &ProjectId) -> Result<bool> {
        let path = self.document_path(project)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!(project = %project, "removed project document");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(store_failure(project.as_str(), e)),
        }
    }
}

#[async_trait]
impl PersistenceGateway for JsonFileStore {
    async fn load(&self, project: &ProjectId) -> Result<Option<Value>> {
        let path = self.document_path(project)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(project = %project, "no stored document");
                return Ok(None);
            }
            Err(e) => return Err(store_failure(project.as_str(), e)),
        };

        let document = serde_json::from_slice(&bytes)
            .map_err(|e| store_failure(project.as_str(), e))?;
        debug!(project = %project, bytes = bytes.len(), "loaded project document");
        Ok(Some(document))
    }

    async fn save(&self, project: &ProjectId, document: Value) -> Result<()> {
        let path = self.document_path(project)?;
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| Error::serialization("failed to encode project document", e))?;

        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| store_failure(project.as_str(), e))?;
        write_atomic(&path, &bytes)
            .await
            .map_err(|e| store_failure(project.as_str(), e))?;

        info!(project = %project, path = %path.display(), "saved project document");
        Ok(())
    }
}

fn store_failure(
    project: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> Error {
    Error::PersistenceFailure {
        project: project.to_string(),
        source: Box::new(source),
    }
}

/// Mount gateway that materializes the image in a local directory.
///
/// Mounting overlays the image: entries already on disk but absent from
/// the image are left in place.
#[derive(Debug, Clone)]
pub struct DirectoryMount {
    base_dir: PathBuf,
}

impl DirectoryMount {
    /// Creates a mount rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Base directory of the mount.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Disk location of a logical path. Segments are validated, so the
    /// result never escapes the base directory.
    fn disk_path(&self, path: &TreePath) -> PathBuf {
        path.segments()
            .fold(self.base_dir.clone(), |acc, segment| acc.join(segment))
    }

    /// Collects directories and files of an image, parents before children.
    ///
    /// Every key is checked as a path segment before it is joined.
    fn flatten(
        &self,
        image: &MountImage,
        parent: &TreePath,
        dirs: &mut Vec<PathBuf>,
        files: &mut Vec<(PathBuf, String)>,
    ) -> Result<()> {
        for (name, entry) in image.entries() {
            let logical = parent.join(name)?;
            let path = self.disk_path(&logical);
            match entry {
                MountEntry::Directory(dir) => {
                    dirs.push(path);
                    self.flatten(dir, &logical, dirs, files)?;
                }
                MountEntry::File(file) => files.push((path, file.contents.clone())),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MountGateway for DirectoryMount {
    async fn mount(&self, image: &MountImage) -> Result<()> {
        let mut dirs = vec![self.base_dir.clone()];
        let mut files = Vec::new();
        self.flatten(image, &TreePath::root(), &mut dirs, &mut files)?;

        for dir in &dirs {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| mount_failure(&TreePath::root(), e))?;
        }
        for (path, contents) in &files {
            write_atomic(path, contents.as_bytes())
                .await
                .map_err(|e| mount_failure(&TreePath::root(), e))?;
        }

        info!(
            base = %self.base_dir.display(),
            dirs = dirs.len() - 1,
            files = files.len(),
            "mounted image"
        );
        Ok(())
    }

    async fn write_file(&self, path: &TreePath, contents: &str) -> Result<()> {
        let disk_path = self.disk_path(path);
        if let Some(parent) = disk_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| mount_failure(path, e))?;
        }
        write_atomic(&disk_path, contents.as_bytes())
            .await
            .map_err(|e| mount_failure(path, e))?;
        debug!(path = %path, bytes = contents.len(), "wrote mounted file");
        Ok(())
    }

    async fn create_dir(&self, path: &TreePath) -> Result<()> {
        fs::create_dir_all(self.disk_path(path))
            .await
            .map_err(|e| mount_failure(path, e))
    }

    async fn remove(&self, path: &TreePath) -> Result<()> {
        if path.is_root() {
            return Err(Error::InvalidArgument(
                "refusing to remove the mount root".to_string(),
            ));
        }
        let disk_path = self.disk_path(path);
        let metadata = match fs::symlink_metadata(&disk_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(mount_failure(path, e)),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(&disk_path).await
        } else {
            fs::remove_file(&disk_path).await
        };
        result.map_err(|e| mount_failure(path, e))?;
        debug!(path = %path, "removed mounted entry");
        Ok(())
    }
}

fn mount_failure(path: &TreePath, source: std::io::Error) -> Error {
    Error::MountWriteFailure {
        path: path.to_string(),
        source: Box::new(source),
    }
}
