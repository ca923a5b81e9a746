use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;

use crate::{FilestageError, FilestageResult};
use crate::error::ErrorKind;

use super::FilePath;
use super::traits::{EntryMetadata, Pal};

/* 📖 # Why use HashMap for MockPal storage?

MockPal uses in-memory storage with Arc<Mutex<T>> for several reasons:
1. **Speed**: No filesystem I/O, deterministic and fast for unit tests
2. **Isolation**: No side effects on the real filesystem
3. **Control**: Easy to inject errors or specific test scenarios
4. **Thread-safe**: Mutex allows concurrent test execution

Directory semantics mirror the real filesystem closely enough for the
staging lifecycle: files need an existing parent directory, directories
can only be removed when empty, and both failures classify the same way
RealPal classifies them.
*/

/// In-memory file entry.
#[derive(Debug, Clone)]
struct MockEntry {
    content: Vec<u8>,
    modified: SystemTime,
}

/// In-memory PAL implementation for testing.
///
/// Stores file contents and directories in maps and supports all Pal
/// operations without touching the real filesystem. Failures can be
/// injected per path via [`MockPal::fail_on`] to exercise error paths.
///
/// # Examples
///
/// ```
/// use filestage_base::{FilePath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("staging/hi0.txt"), vec![]);
/// assert!(mock.exists(&FilePath::from("staging/hi0.txt")).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FilePath, MockEntry>>>,
    directories: Arc<Mutex<HashMap<FilePath, SystemTime>>>,
    fail_on: Arc<Mutex<HashMap<FilePath, std::io::ErrorKind>>>,
}

impl MockPal {
    /// Create a new empty MockPal.
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            directories: Arc::new(Mutex::new(HashMap::new())),
            fail_on: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a file to the mock storage, registering its ancestor directories.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        if let Some(parent) = path.parent() {
            self.register_directories(&parent);
        }
        self.files.lock().unwrap().insert(
            path,
            MockEntry {
                content,
                modified: SystemTime::now(),
            },
        );
    }

    /// Add a directory (and its ancestors) to the mock storage.
    pub fn add_directory(&self, path: FilePath) {
        self.register_directories(&path);
    }

    /// Inject a failure for the given path.
    ///
    /// The next mutating or opening operation touching the path fails with
    /// an error of the given `std::io::ErrorKind`, classified through the
    /// usual taxonomy.
    pub fn fail_on(&self, path: FilePath, kind: std::io::ErrorKind) {
        self.fail_on.lock().unwrap().insert(path, kind);
    }

    /// Number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    fn register_directories(&self, path: &FilePath) {
        let mut directories = self.directories.lock().unwrap();
        let mut current = Some(path.clone());
        while let Some(dir) = current {
            if dir.as_relative().as_str().is_empty() {
                break;
            }
            directories
                .entry(dir.clone())
                .or_insert_with(SystemTime::now);
            current = dir.parent();
        }
    }

    /// The base directory itself always exists.
    fn directory_exists(&self, path: &FilePath) -> bool {
        path.as_relative().as_str().is_empty()
            || self.directories.lock().unwrap().contains_key(path)
    }

    fn check_fail(&self, path: &FilePath) -> FilestageResult<()> {
        if let Some(kind) = self.fail_on.lock().unwrap().get(path) {
            return Err(Box::new(FilestageError::from_io(
                path.as_path().to_path_buf(),
                std::io::Error::new(*kind, "injected failure"),
            )));
        }
        Ok(())
    }

    fn children_of(&self, path: &FilePath) -> Vec<FilePath> {
        let files = self.files.lock().unwrap();
        let directories = self.directories.lock().unwrap();
        let mut children: Vec<FilePath> = files
            .keys()
            .chain(directories.keys())
            .filter(|candidate| candidate.parent().as_ref() == Some(path))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.as_relative().as_str().cmp(b.as_relative().as_str()));
        children
    }

    fn not_found(path: &FilePath) -> Box<FilestageError> {
        Box::new(FilestageError::new(ErrorKind::NotFound {
            path: path.as_path().to_path_buf(),
        }))
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

/// Hidden flag per the dotfile convention.
fn is_hidden(path: &FilePath) -> bool {
    path.file_name()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

impl Pal for MockPal {
    fn exists(&self, path: &FilePath) -> FilestageResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(path) || self.directory_exists(path))
    }

    fn metadata(&self, path: &FilePath) -> FilestageResult<EntryMetadata> {
        if let Some(entry) = self.files.lock().unwrap().get(path) {
            return Ok(EntryMetadata {
                is_file: true,
                is_directory: false,
                len: entry.content.len() as u64,
                modified: entry.modified,
                hidden: is_hidden(path),
            });
        }
        if let Some(modified) = self.directories.lock().unwrap().get(path) {
            return Ok(EntryMetadata {
                is_file: false,
                is_directory: true,
                len: 0,
                modified: *modified,
                hidden: is_hidden(path),
            });
        }
        Err(Self::not_found(path))
    }

    fn create_directory_all(&self, path: &FilePath) -> FilestageResult<()> {
        self.check_fail(path)?;
        self.register_directories(path);
        Ok(())
    }

    fn create_file(&self, path: &FilePath) -> FilestageResult<()> {
        self.check_fail(path)?;
        let parent = path.parent().unwrap_or_else(|| FilePath::from(""));
        if !self.directory_exists(&parent) {
            return Err(Self::not_found(&parent));
        }
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(Box::new(FilestageError::from_io(
                path.as_path().to_path_buf(),
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "file already exists"),
            )));
        }
        files.insert(
            path.clone(),
            MockEntry {
                content: Vec::new(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn list_entries(
        &self,
        path: &FilePath,
    ) -> FilestageResult<Box<dyn Iterator<Item = FilestageResult<FilePath>> + '_>> {
        self.check_fail(path)?;
        if !self.directory_exists(path) {
            return Err(Self::not_found(path));
        }
        let children = self.children_of(path);
        Ok(Box::new(children.into_iter().map(Ok)))
    }

    fn remove_file(&self, path: &FilePath) -> FilestageResult<()> {
        self.check_fail(path)?;
        match self.files.lock().unwrap().remove(path) {
            Some(_) => Ok(()),
            None => Err(Self::not_found(path)),
        }
    }

    fn remove_directory(&self, path: &FilePath) -> FilestageResult<()> {
        self.check_fail(path)?;
        if !self.directory_exists(path) {
            return Err(Self::not_found(path));
        }
        if !self.children_of(path).is_empty() {
            return Err(Box::new(FilestageError::new(ErrorKind::NotEmpty {
                path: path.as_path().to_path_buf(),
            })));
        }
        self.directories.lock().unwrap().remove(path);
        Ok(())
    }

    fn absolutize(&self, path: &FilePath) -> PathBuf {
        PathBuf::from("/mock").join(path.as_path())
    }

    fn open_read(&self, path: &FilePath) -> FilestageResult<Box<dyn Read + 'static>> {
        self.check_fail(path)?;
        let files = self.files.lock().unwrap();
        let entry = files.get(path).ok_or_else(|| Self::not_found(path))?;
        Ok(Box::new(Cursor::new(entry.content.clone())))
    }

    fn open_write(&self, path: &FilePath) -> FilestageResult<Box<dyn Write + 'static>> {
        self.check_fail(path)?;
        // Return a writer that stores into the mock storage when dropped
        Ok(Box::new(MockFileWriter {
            path: path.clone(),
            files: Arc::clone(&self.files),
            buffer: Vec::new(),
        }))
    }
}

/// Helper struct for writing files to MockPal.
struct MockFileWriter {
    path: FilePath,
    files: Arc<Mutex<HashMap<FilePath, MockEntry>>>,
    buffer: Vec<u8>,
}

impl Write for MockFileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for MockFileWriter {
    fn drop(&mut self) {
        self.files.lock().unwrap().insert(
            self.path.clone(),
            MockEntry {
                content: self.buffer.clone(),
                modified: SystemTime::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exists_after_add_file() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("staging/hi0.txt"), b"x".to_vec());

        assert!(pal.exists(&FilePath::from("staging/hi0.txt")).unwrap());
        // Ancestor directories are registered implicitly.
        assert!(pal.exists(&FilePath::from("staging")).unwrap());
    }

    #[test]
    fn test_exists_false() {
        let pal = MockPal::new();
        assert!(!pal.exists(&FilePath::from("missing.txt")).unwrap());
    }

    #[test]
    fn test_create_file_requires_parent_directory() {
        let pal = MockPal::new();

        let err = pal.create_file(&FilePath::from("staging/hi0.txt")).unwrap_err();
        assert!(err.is_not_found());

        pal.create_directory_all(&FilePath::from("staging")).unwrap();
        pal.create_file(&FilePath::from("staging/hi0.txt")).unwrap();
        assert!(pal.exists(&FilePath::from("staging/hi0.txt")).unwrap());
    }

    #[test]
    fn test_create_file_is_zero_length() {
        let pal = MockPal::new();
        pal.create_directory_all(&FilePath::from("staging")).unwrap();
        pal.create_file(&FilePath::from("staging/hi0.txt")).unwrap();

        let meta = pal.metadata(&FilePath::from("staging/hi0.txt")).unwrap();
        assert!(meta.is_file);
        assert_eq!(meta.len, 0);
    }

    #[test]
    fn test_create_file_fails_when_already_present() {
        let pal = MockPal::new();
        pal.create_directory_all(&FilePath::from("staging")).unwrap();
        pal.create_file(&FilePath::from("staging/hi0.txt")).unwrap();

        let result = pal.create_file(&FilePath::from("staging/hi0.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_metadata_missing_is_not_found() {
        let pal = MockPal::new();
        let err = pal.metadata(&FilePath::from("missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_metadata_of_directory_has_no_file_bit() {
        let pal = MockPal::new();
        pal.add_directory(FilePath::from("staging"));

        let meta = pal.metadata(&FilePath::from("staging")).unwrap();
        assert!(meta.is_directory);
        assert!(!meta.is_file);
        assert_eq!(meta.len, 0);
    }

    #[test]
    fn test_hidden_dotfile() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from(".hidden"), vec![]);

        assert!(pal.metadata(&FilePath::from(".hidden")).unwrap().hidden);
    }

    #[test]
    fn test_list_entries_flat() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("staging/hi0.txt"), vec![]);
        pal.add_file(FilePath::from("staging/hi1.txt"), vec![]);
        pal.add_file(FilePath::from("other/hi9.txt"), vec![]);

        let entries: Vec<_> = pal
            .list_entries(&FilePath::from("staging"))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(
            entries,
            vec![
                FilePath::from("staging/hi0.txt"),
                FilePath::from("staging/hi1.txt"),
            ]
        );
    }

    #[test]
    fn test_list_entries_missing_directory() {
        let pal = MockPal::new();
        let err = pal.list_entries(&FilePath::from("missing")).err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_file_then_not_found() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("hi0.txt"), vec![]);

        pal.remove_file(&FilePath::from("hi0.txt")).unwrap();
        let err = pal.remove_file(&FilePath::from("hi0.txt")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_directory_classification() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("staging/hi0.txt"), vec![]);

        // Populated: NotEmpty
        let err = pal.remove_directory(&FilePath::from("staging")).unwrap_err();
        assert!(err.is_not_empty());

        // Cleared: success
        pal.remove_file(&FilePath::from("staging/hi0.txt")).unwrap();
        pal.remove_directory(&FilePath::from("staging")).unwrap();

        // Absent: NotFound
        let err = pal.remove_directory(&FilePath::from("staging")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_injected_failure_is_classified() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("staging/hi0.txt"), vec![]);
        pal.fail_on(
            FilePath::from("staging/hi0.txt"),
            std::io::ErrorKind::PermissionDenied,
        );

        let err = pal.remove_file(&FilePath::from("staging/hi0.txt")).unwrap_err();
        assert!(!err.is_not_found());
        assert!(!err.is_not_empty());
    }

    #[test]
    fn test_open_read_round_trip() {
        let pal = MockPal::new();
        pal.add_file(FilePath::from("video.mov"), b"frames".to_vec());

        let mut reader = pal.open_read(&FilePath::from("video.mov")).unwrap();
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"frames");
    }

    #[test]
    fn test_open_write_stores_on_drop() {
        let pal = MockPal::new();

        let mut writer = pal.open_write(&FilePath::from("video_cloned.mov")).unwrap();
        writer.write_all(b"frames").unwrap();
        drop(writer);

        assert_eq!(pal.read_file(&FilePath::from("video_cloned.mov")).unwrap(), b"frames");
    }

    #[test]
    fn test_absolutize_is_stable() {
        let pal = MockPal::new();
        assert_eq!(
            pal.absolutize(&FilePath::from("staging/hi1.txt")),
            PathBuf::from("/mock/staging/hi1.txt")
        );
    }
}
