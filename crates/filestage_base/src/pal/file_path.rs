use relative_path::{RelativePath, RelativePathBuf};
use std::path::{Path, PathBuf};

/* 📖 # Why use RelativePathBuf for FilePath?

FilePath wraps RelativePathBuf to enforce that all paths are relative to the PAL's
base directory, not absolute system paths. This provides several benefits:

1. **Type Safety**: The compiler prevents accidentally using absolute paths
2. **Intent Clarity**: Code explicitly shows these are base-relative paths
3. **Security**: Relative paths can't escape the base directory via ".."
4. **Consistency**: All PAL paths follow the same relative-to-base semantics
*/

/// Type-safe wrapper for file paths relative to the PAL base directory.
///
/// A FilePath is an immutable identifier for a filesystem location. It has
/// an optional [`parent`](FilePath::parent) and a
/// [`file_name`](FilePath::file_name); whether the location currently
/// exists is a question for the PAL, never for the path value itself.
///
/// # Examples
///
/// ```
/// use filestage_base::FilePath;
///
/// let target = FilePath::from("staging/hi1.txt");
/// assert_eq!(target.file_name(), Some("hi1.txt"));
/// assert_eq!(target.parent(), Some(FilePath::from("staging")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath(RelativePathBuf);

impl FilePath {
    /// Returns the underlying RelativePathBuf as a reference.
    pub fn as_relative(&self) -> &RelativePath {
        &self.0
    }

    /// Returns the parent directory, if any.
    ///
    /// The root of the PAL base directory has no parent; a single-component
    /// path like `staging` has the empty path as parent, which is treated as
    /// the base directory itself.
    pub fn parent(&self) -> Option<FilePath> {
        self.0.parent().map(FilePath::from)
    }

    /// Returns the final component of the path, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name()
    }

    /// Appends a component, yielding the path of a child entry.
    pub fn join(&self, component: impl AsRef<str>) -> FilePath {
        FilePath(self.0.join(component.as_ref()))
    }

    /// Converts to a regular Path for use with std::fs operations.
    /// This returns the relative path portion without a base directory.
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_relative().as_str())
    }

    /// Consumes the FilePath and returns a PathBuf.
    pub fn into_path_buf(self) -> PathBuf {
        PathBuf::from(self.0.as_str())
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<RelativePathBuf> for FilePath {
    fn from(p: RelativePathBuf) -> Self {
        Self(p)
    }
}

impl From<&RelativePath> for FilePath {
    fn from(p: &RelativePath) -> Self {
        Self(p.to_relative_path_buf())
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<RelativePath> for FilePath {
    fn as_ref(&self) -> &RelativePath {
        &self.0
    }
}
