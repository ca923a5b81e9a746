use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use crate::FilestageResult;

use super::file_path::FilePath;

/* 📖 # What is the Platform Abstraction Layer (PAL)?

The PAL provides a trait-based abstraction over filesystem operations, enabling:
- Testable code: MockPal allows deterministic unit tests without filesystem access
- Flexibility: Switch between real filesystem and in-memory implementations
- Consistency: All filesystem operations use the same error handling

This follows the Dependency Inversion Principle—code depends on abstractions (Pal trait),
not concrete implementations (RealPal or MockPal).
*/

/// Observed attributes of an on-disk entry.
///
/// Returned by [`Pal::metadata`]; existence must be established before
/// asking for metadata, absent paths produce a `NotFound` error rather
/// than a partially filled struct.
#[derive(Debug, Clone)]
pub struct EntryMetadata {
    /// True when the entry is a regular file.
    pub is_file: bool,
    /// True when the entry is a directory.
    pub is_directory: bool,
    /// Byte length; zero for directories.
    pub len: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Hidden flag, using the dotfile convention.
    pub hidden: bool,
}

/// Platform Abstraction Layer (PAL) trait providing filesystem operations.
///
/// This is the capability set the staging lifecycle consumes: existence
/// checks, directory and file creation, flat directory listing, deletion
/// of files and (empty) directories, metadata queries, and raw byte
/// streams for the copy strategies. Two implementations are provided:
/// - `RealPal`: Uses the real filesystem via `std::fs`
/// - `MockPal`: In-memory implementation for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check whether an entry exists at the given path.
    fn exists(&self, path: &FilePath) -> FilestageResult<bool>;

    /// Query metadata for an existing entry.
    ///
    /// Fails with a `NotFound` classification when the path is absent.
    fn metadata(&self, path: &FilePath) -> FilestageResult<EntryMetadata>;

    /// Create a directory and all missing parent directories.
    fn create_directory_all(&self, path: &FilePath) -> FilestageResult<()>;

    /// Create a new, zero-length file.
    ///
    /// Create-new semantics: fails when the file already exists or the
    /// parent directory is missing.
    fn create_file(&self, path: &FilePath) -> FilestageResult<()>;

    /// List the entries directly inside a directory.
    ///
    /// The returned iterator owns the underlying directory handle; the
    /// handle is released when the iterator is dropped, on every exit
    /// path, including an abandoned iteration after a failed deletion.
    fn list_entries(
        &self,
        path: &FilePath,
    ) -> FilestageResult<Box<dyn Iterator<Item = FilestageResult<FilePath>> + '_>>;

    /// Delete a single file.
    fn remove_file(&self, path: &FilePath) -> FilestageResult<()>;

    /// Delete a directory, non-recursively.
    ///
    /// The error is classified: `NotFound` for an absent path, `NotEmpty`
    /// for a directory that still has entries, `Io` otherwise. Callers
    /// rely on this three-way distinction.
    fn remove_directory(&self, path: &FilePath) -> FilestageResult<()>;

    /// Resolve a base-relative path to an absolute path for reporting.
    fn absolutize(&self, path: &FilePath) -> PathBuf;

    /// Open a file for reading as a raw byte stream.
    fn open_read(&self, path: &FilePath) -> FilestageResult<Box<dyn Read + 'static>>;

    /// Open a file for writing, truncating if it exists.
    fn open_write(&self, path: &FilePath) -> FilestageResult<Box<dyn Write + 'static>>;

    /// Read entire file contents into memory.
    ///
    /// Convenience with a default implementation in terms of
    /// [`Pal::open_read`]; used by the whole-file copy strategy.
    fn read_file(&self, path: &FilePath) -> FilestageResult<Vec<u8>> {
        let mut reader = self.open_read(path)?;
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).map_err(|e| {
            Box::new(crate::FilestageError::from_io(
                path.as_path().to_path_buf(),
                e,
            ))
        })?;
        Ok(contents)
    }
}

/* 📖 # Why use Arc<dyn Pal> with PalHandle?

Arc enables cheap cloning of the entire PAL implementation, allowing it to be
shared across multiple parts of the application (thread-safe via dyn Pal bounds).
PalHandle wraps this for ergonomic Deref access and Clone support.
This pattern avoids lifetime parameters and enables flexible PAL passing through
the codebase.
*/

/// Handle to a PAL implementation, enabling shared ownership.
///
/// Internally wraps `Arc<dyn Pal>` for cheap cloning and thread-safe sharing.
///
/// # Examples
///
/// ```no_run
/// use filestage_base::{PalHandle, RealPal};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
