//! Template directory scanner.
//!
//! Walks a local directory and produces a sorted tree rooted at the
//! directory's basename. Dependency folders, lock files, editor swap files
//! and environment files are skipped by default; user options extend the
//! defaults.
//!
//! # Examples
//!
//! ```no_run
//! use playground_tree::{ScanOptions, TemplateScanner};
//!
//! let scanner = TemplateScanner::new(ScanOptions::default().ignore_folder("tmp"));
//! let root = scanner.scan("templates/react-ts")?;
//! println!("{} files", root.file_count());
//! # Ok::<(), playground_core::Error>(())
//! ```

use crate::builder::oversized_placeholder;
use crate::node::{FileNode, FolderNode, TreeNode};
use crate::path::TreePath;
use playground_core::{DEFAULT_MAX_FILE_SIZE, Error, Result, ScanConfig};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File names skipped by default.
pub const DEFAULT_IGNORE_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    ".DS_Store",
    "thumbs.db",
    ".gitignore",
    ".npmrc",
    ".yarnrc",
    ".env",
    ".env.local",
    ".env.development",
    ".env.production",
];

/// Folder names skipped by default.
pub const DEFAULT_IGNORE_FOLDERS: &[&str] = &[
    "node_modules",
    ".git",
    ".vscode",
    ".idea",
    "dist",
    "build",
    "coverage",
];

/// File name patterns skipped by default: vim swap files, emacs lock files
/// and backup files.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[r"^\..+\.swp$", r"^\.#", r"~$"];

/// Root name used when the scanned path has no basename.
const FALLBACK_ROOT_NAME: &str = "Root";

/// Ignore lists and the byte ceiling of a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    ignore_files: HashSet<String>,
    ignore_folders: HashSet<String>,
    ignore_patterns: Vec<Regex>,
    max_file_size: Option<u64>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_files: DEFAULT_IGNORE_FILES.iter().map(ToString::to_string).collect(),
            ignore_folders: DEFAULT_IGNORE_FOLDERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }
}

impl ScanOptions {
    /// Builds options from the `[scan]` configuration section, on top of
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if an ignore pattern does not compile.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let mut options = Self::default().max_file_size(config.max_file_size);
        for name in &config.ignore_files {
            options = options.ignore_file(name);
        }
        for name in &config.ignore_folders {
            options = options.ignore_folder(name);
        }
        for pattern in &config.ignore_patterns {
            options = options.ignore_pattern(pattern)?;
        }
        Ok(options)
    }

    /// Adds a file name to skip.
    #[must_use]
    pub fn ignore_file(mut self, name: impl Into<String>) -> Self {
        self.ignore_files.insert(name.into());
        self
    }

    /// Adds a folder name to skip.
    #[must_use]
    pub fn ignore_folder(mut self, name: impl Into<String>) -> Self {
        self.ignore_folders.insert(name.into());
        self
    }

    /// Adds a regular expression matched against file names.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the pattern does not compile.
    pub fn ignore_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::ConfigError {
            message: format!("invalid ignore pattern '{pattern}': {e}"),
        })?;
        self.ignore_patterns.push(regex);
        Ok(self)
    }

    /// Sets the byte ceiling; `None` disables it.
    #[must_use]
    pub const fn max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }

    /// Returns `true` if a file with this name is skipped.
    #[must_use]
    pub fn is_ignored_file(&self, name: &str) -> bool {
        self.ignore_files.contains(name) || self.ignore_patterns.iter().any(|re| re.is_match(name))
    }

    /// Returns `true` if a folder with this name is skipped.
    #[must_use]
    pub fn is_ignored_folder(&self, name: &str) -> bool {
        self.ignore_folders.contains(name)
    }
}

/// Counters collected during a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Files included
    pub files: usize,
    /// Folders included, excluding the root
    pub folders: usize,
    /// Entries skipped by ignore rules or because they are special files
    pub ignored: usize,
    /// Files whose content was replaced by the size placeholder
    pub oversized: Vec<TreePath>,
    /// Files whose content is a read error message
    pub unreadable: Vec<TreePath>,
}

/// Scans local template directories into project trees.
#[derive(Debug, Clone, Default)]
pub struct TemplateScanner {
    options: ScanOptions,
}

impl TemplateScanner {
    /// Creates a scanner with the given options.
    #[must_use]
    pub const fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scans `root` into a tree.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `root` does not exist, `Error::NotADirectory` if
    /// it is not a directory, `Error::Io` if it cannot be listed.
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<FolderNode> {
        self.scan_with_stats(root).map(|(tree, _)| tree)
    }

    /// Scans `root` into a tree and returns the scan counters.
    ///
    /// # Errors
    ///
    /// Same as [`TemplateScanner::scan`].
    pub fn scan_with_stats(&self, root: impl AsRef<Path>) -> Result<(FolderNode, ScanStats)> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound {
                    path: root.display().to_string(),
                }
            } else {
                Error::io(root, e)
            }
        })?;
        if !metadata.is_dir() {
            return Err(Error::NotADirectory {
                path: root.display().to_string(),
            });
        }
        fs::read_dir(root).map_err(|e| Error::io(root, e))?;

        let root_name = root
            .file_name()
            .map_or_else(|| FALLBACK_ROOT_NAME.to_string(), |n| n.to_string_lossy().into_owned());
        let mut tree = FolderNode::new(root_name);
        let mut stats = ScanStats::default();

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir()
                    && self
                        .options
                        .is_ignored_folder(&entry.file_name().to_string_lossy()))
            });

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    stats.ignored += 1;
                    continue;
                }
            };

            let Some(path) = relative_tree_path(root, entry.path()) else {
                warn!(path = %entry.path().display(), "skipping entry with unusable name");
                stats.ignored += 1;
                continue;
            };
            let name = entry.file_name().to_string_lossy();
            let file_type = entry.file_type();

            if has_sibling(&tree, &path)? {
                warn!(path = %path, "skipping entry whose name collides with a sibling");
                stats.ignored += 1;
                if file_type.is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }

            if file_type.is_dir() {
                insert(&mut tree, &path, TreeNode::Folder(FolderNode::new(name)))?;
                stats.folders += 1;
                continue;
            }
            if !file_type.is_file() {
                debug!(path = %path, "skipping special entry");
                stats.ignored += 1;
                continue;
            }
            if self.options.is_ignored_file(&name) {
                debug!(path = %path, "ignoring file");
                stats.ignored += 1;
                continue;
            }

            let content = self.read_content(entry.path(), &path, &mut stats);
            insert(&mut tree, &path, TreeNode::File(FileNode::from_display_name(&name, content)))?;
            stats.files += 1;
        }

        tree.sort_recursive();
        info!(
            root = %root.display(),
            files = stats.files,
            folders = stats.folders,
            ignored = stats.ignored,
            "scanned template directory"
        );
        Ok((tree, stats))
    }

    fn read_content(&self, fs_path: &Path, path: &TreePath, stats: &mut ScanStats) -> String {
        let size = match fs::metadata(fs_path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!(path = %path, error = %e, "failed to stat file");
                stats.unreadable.push(path.clone());
                return format!("Error reading file: {e}");
            }
        };

        if let Some(max) = self.options.max_file_size
            && size > max
        {
            warn!(path = %path, size, max, "file exceeds size limit, using placeholder");
            stats.oversized.push(path.clone());
            return oversized_placeholder(size, max);
        }

        fs::read_to_string(fs_path).unwrap_or_else(|e| {
            warn!(path = %path, error = %e, "failed to read file");
            stats.unreadable.push(path.clone());
            format!("Error reading file: {e}")
        })
    }
}

fn relative_tree_path(root: &Path, path: &Path) -> Option<TreePath> {
    let relative = path.strip_prefix(root).ok()?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    TreePath::new(joined).ok().filter(|p| !p.is_root())
}

/// Lossy name conversion can map distinct directory entries to one name.
fn has_sibling(tree: &FolderNode, path: &TreePath) -> Result<bool> {
    let parent = path.parent().unwrap_or_default();
    let name = path.file_name().unwrap_or_default();
    Ok(tree.folder(&parent)?.position(name).is_some())
}

/// Walk order is pre-order, so the parent folder always exists.
fn insert(tree: &mut FolderNode, path: &TreePath, node: TreeNode) -> Result<()> {
    let parent = path.parent().unwrap_or_default();
    tree.folder_mut(&parent)?.items.push(node);
    Ok(())
}
