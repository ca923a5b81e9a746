use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{FilestageError, FilestageResult};

use super::FilePath;
use super::traits::{EntryMetadata, Pal};

/* 📖 # Why use std::fs instead of async or other crates?

The staging lifecycle is single-threaded, synchronous and blocking by
design. std::fs is:
- Sufficient for synchronous file operations
- Requires no external dependencies beyond what we already use
- Easy to understand and maintain
- Well-tested and reliable

This keeps the codebase simple and maintainable.
*/

/// Concrete PAL implementation using the real filesystem via std::fs.
///
/// All file paths are resolved relative to a configured base directory,
/// ensuring operations stay within intended boundaries.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    ///
    /// # Arguments
    /// * `base_dir` - All paths will be resolved relative to this directory
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve a FilePath to an absolute filesystem path.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        self.base_dir.join(path.as_path())
    }
}

/// Hidden flag per the dotfile convention.
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn exists(&self, path: &FilePath) -> FilestageResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.exists();
        debug!(exists, resolved = %resolved.display(), "checked existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn metadata(&self, path: &FilePath) -> FilestageResult<EntryMetadata> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "querying metadata");
        let meta = fs::metadata(&resolved).map_err(|e| {
            debug!(error = %e, "failed to query metadata");
            Box::new(FilestageError::from_io(resolved.clone(), e))
        })?;
        let modified = meta
            .modified()
            .map_err(|e| Box::new(FilestageError::from_io(resolved.clone(), e)))?;
        Ok(EntryMetadata {
            is_file: meta.is_file(),
            is_directory: meta.is_dir(),
            len: meta.len(),
            modified,
            hidden: is_hidden(&resolved),
        })
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_directory_all(&self, path: &FilePath) -> FilestageResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating directory and parents");
        fs::create_dir_all(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create directory");
            Box::new(FilestageError::from_io(resolved, e))
        })?;
        debug!("directory created successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_file(&self, path: &FilePath) -> FilestageResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating placeholder file");
        // create_new: fail if the file already exists, like the rest of
        // the lifecycle this never overwrites silently.
        fs::File::create_new(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create file");
            Box::new(FilestageError::from_io(resolved, e))
        })?;
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn list_entries(
        &self,
        path: &FilePath,
    ) -> FilestageResult<Box<dyn Iterator<Item = FilestageResult<FilePath>> + '_>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening directory for listing");
        let read_dir = fs::read_dir(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open directory");
            Box::new(FilestageError::from_io(resolved.clone(), e))
        })?;

        // The ReadDir handle lives inside the returned iterator and is
        // released when the iterator is dropped, even if the caller bails
        // out mid-iteration.
        let base = path.clone();
        let iter = read_dir.map(move |entry| match entry {
            Ok(e) => Ok(base.join(e.file_name().to_string_lossy().as_ref())),
            Err(e) => Err(Box::new(FilestageError::from_io(resolved.clone(), e))),
        });
        Ok(Box::new(iter))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn remove_file(&self, path: &FilePath) -> FilestageResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "removing file");
        fs::remove_file(&resolved).map_err(|e| {
            debug!(error = %e, "failed to remove file");
            Box::new(FilestageError::from_io(resolved, e))
        })?;
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn remove_directory(&self, path: &FilePath) -> FilestageResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "removing directory (non-recursive)");
        fs::remove_dir(&resolved).map_err(|e| {
            debug!(error = %e, "failed to remove directory");
            Box::new(FilestageError::from_io(resolved, e))
        })?;
        debug!("directory removed successfully");
        Ok(())
    }

    fn absolutize(&self, path: &FilePath) -> PathBuf {
        self.resolve_path(path)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn open_read(&self, path: &FilePath) -> FilestageResult<Box<dyn Read + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Box::new(FilestageError::from_io(resolved, e))
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn open_write(&self, path: &FilePath) -> FilestageResult<Box<dyn Write + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for writing");
        let file = fs::File::create(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create file");
            Box::new(FilestageError::from_io(resolved, e))
        })?;
        Ok(Box::new(file))
    }
}
