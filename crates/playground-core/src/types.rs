//! Strong identifier types.
//!
//! `ProjectId` keys persisted documents; `FileId` keys open-file entries.
//! The two are never interchangeable: a `FileId` is derived from a logical
//! path inside one project and has no meaning to the storage layer.
//!
//! # Examples
//!
//! ```
//! use playground_core::{FileId, ProjectId};
//!
//! let project = ProjectId::new("my-app");
//! let file = FileId::for_path("src/index.ts");
//!
//! assert_eq!(project.as_str(), "my-app");
//! assert_eq!(file, FileId::for_path("src/index.ts"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Project identifier (newtype over String).
///
/// Identifies one persisted playground document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Creates a project identifier from any string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random project identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_core::ProjectId;
    ///
    /// let a = ProjectId::generate();
    /// let b = ProjectId::generate();
    /// assert_ne!(a, b);
    /// ```
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProjectId` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Open-file identifier derived from a logical path.
///
/// The id is a short blake3 digest of the path, so reopening the same path
/// always yields the same id while the id itself carries no path syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    const DIGEST_LEN: usize = 16;

    /// Derives the id for a logical path.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_core::FileId;
    ///
    /// let id = FileId::for_path("lib/index.ts");
    /// assert_eq!(id.as_str().len(), 16);
    /// assert_ne!(id, FileId::for_path("src/index.ts"));
    /// ```
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        let digest = blake3::hash(path.as_bytes()).to_hex();
        Self(digest[..Self::DIGEST_LEN].to_string())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic counter of applied session changes.
///
/// Every structural mutation or save bumps the revision; the persisted
/// revision tells whether the latest state reached storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// The revision of a freshly loaded project.
    pub const INITIAL: Self = Self(0);

    /// Returns the following revision.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}
