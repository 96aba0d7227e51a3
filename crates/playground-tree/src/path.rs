//! Logical paths inside a project tree.
//!
//! A logical path is the `/`-joined sequence of display names from the root
//! to a node, excluding the root's own name. The root itself has the empty
//! path.
//!
//! # Examples
//!
//! ```
//! use playground_tree::TreePath;
//!
//! let path = TreePath::new("src/components/Button.tsx").unwrap();
//! assert_eq!(path.file_name(), Some("Button.tsx"));
//! assert_eq!(path.parent().unwrap().as_str(), "src/components");
//!
//! assert!(TreePath::new("src//index.ts").is_err());
//! assert!(TreePath::new("../escape").is_err());
//! ```

use playground_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between segments of a logical path.
pub const SEPARATOR: char = '/';

/// A validated logical path.
///
/// Segments are never empty and never `.` or `..`; paths carry no leading
/// or trailing separator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TreePath(String);

impl TreePath {
    /// Returns the root path (empty).
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Validates and wraps a logical path.
    ///
    /// The empty string is the root path.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPath` on a leading or trailing separator, an
    /// empty segment, or a `.`/`..` segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_tree::TreePath;
    ///
    /// assert!(TreePath::new("").unwrap().is_root());
    /// assert!(TreePath::new("/src").unwrap_err().is_invalid_path());
    /// assert!(TreePath::new("src/").is_err());
    /// assert!(TreePath::new("src/./a.ts").is_err());
    /// ```
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Ok(Self::root());
        }
        if path.starts_with(SEPARATOR) {
            return Err(invalid(&path, "leading separator"));
        }
        if path.ends_with(SEPARATOR) {
            return Err(invalid(&path, "trailing separator"));
        }
        for segment in path.split(SEPARATOR) {
            check_segment(&path, segment)?;
        }
        Ok(Self(path))
    }

    /// Returns the path as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the root path.
    #[inline]
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the segments; the root has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Returns the parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(
            self.0
                .rfind(SEPARATOR)
                .map_or_else(Self::root, |idx| Self(self.0[..idx].to_string())),
        )
    }

    /// Returns the last segment, or `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit(SEPARATOR).next()
    }

    /// Appends a single display name.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPath` if `name` is empty, `.`, `..` or
    /// contains a separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_tree::TreePath;
    ///
    /// let src = TreePath::root().join("src").unwrap();
    /// assert_eq!(src.join("main.rs").unwrap().as_str(), "src/main.rs");
    /// assert!(src.join("a/b").is_err());
    /// ```
    pub fn join(&self, name: &str) -> Result<Self> {
        validate_name(name)?;
        if self.is_root() {
            Ok(Self(name.to_string()))
        } else {
            Ok(Self(format!("{}{SEPARATOR}{name}", self.0)))
        }
    }

    /// Segment-wise prefix test; every path starts with the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_tree::TreePath;
    ///
    /// let file = TreePath::new("src/index.ts").unwrap();
    /// assert!(file.starts_with(&TreePath::new("src").unwrap()));
    /// assert!(!file.starts_with(&TreePath::new("sr").unwrap()));
    /// ```
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        if prefix.is_root() || self == prefix {
            return true;
        }
        self.0.len() > prefix.0.len()
            && self.0.starts_with(&prefix.0)
            && self.0[prefix.0.len()..].starts_with(SEPARATOR)
    }

    /// Replaces the prefix `from` with `to`.
    ///
    /// Returns `None` if this path does not start with `from`.
    ///
    /// # Examples
    ///
    /// ```
    /// use playground_tree::TreePath;
    ///
    /// let file = TreePath::new("src/ui/App.tsx").unwrap();
    /// let from = TreePath::new("src").unwrap();
    /// let to = TreePath::new("lib").unwrap();
    /// assert_eq!(file.rebase(&from, &to).unwrap().as_str(), "lib/ui/App.tsx");
    /// ```
    #[must_use]
    pub fn rebase(&self, from: &Self, to: &Self) -> Option<Self> {
        if !self.starts_with(from) {
            return None;
        }
        let rest = self.0[from.0.len()..].trim_start_matches(SEPARATOR);
        Some(match (to.is_root(), rest.is_empty()) {
            (_, true) => to.clone(),
            (true, false) => Self(rest.to_string()),
            (false, false) => Self(format!("{}{SEPARATOR}{rest}", to.0)),
        })
    }
}

/// Checks that `name` can be a single display name.
///
/// # Errors
///
/// Returns `Error::InvalidPath` if `name` is empty, `.`, `..` or contains a
/// separator.
pub fn validate_name(name: &str) -> Result<()> {
    if name.contains(SEPARATOR) {
        return Err(invalid(name, "name cannot contain '/'"));
    }
    check_segment(name, name)
}

fn check_segment(path: &str, segment: &str) -> Result<()> {
    match segment {
        "" => Err(invalid(path, "empty segment")),
        "." | ".." => Err(invalid(path, "relative segment")),
        _ => Ok(()),
    }
}

fn invalid(path: &str, reason: &str) -> Error {
    Error::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TreePath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TreePath {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TreePath> for String {
    fn from(path: TreePath) -> Self {
        path.0
    }
}

impl AsRef<str> for TreePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
