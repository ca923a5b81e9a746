use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

/* 📖 # Why a custom error type and not use anyhow/eyre/thiserror etc?

- Better control over error handling
- No dependencies to compile and integrate
- More transparency into error handling logic
 */

/// Error variants that can occur in filestage operations.
///
/// The staging teardown flow depends on telling three deletion failures
/// apart: the directory does not exist, the directory still has entries,
/// or the operation failed for some other I/O reason. Each of those is a
/// distinct variant so callers can match on the outcome instead of
/// string-matching an OS message.
#[derive(Debug)]
pub enum ErrorKind {
    /// Generic filesystem operation failure (permission denied, disk
    /// full, broken handle, ...).
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Deletion was attempted on a directory that still contains entries.
    NotEmpty { path: PathBuf },

    /// The path does not exist on disk.
    NotFound { path: PathBuf },

    /// Catch-all for other errors with a message
    Message { message: String },
}

/* 📖 # Why separate ErrorKind and FilestageError?
This two-layer design provides a clear separation of concerns:
- ErrorKind: structural variants with specific contexts (paths, sources)
- FilestageError: wraps ErrorKind with additional runtime context strings

Benefits:
- Users can pattern match on ErrorKind for specific handling
- FilestageError provides ergonomic context attachment for propagation
- Avoids nested context strings (which get expensive with many layers)
*/

/// Error type wrapping ErrorKind with optional context.
#[derive(Debug)]
pub struct FilestageError {
    kind: ErrorKind,
    context: Vec<String>,
}

impl FilestageError {
    /// Creates a new error from an ErrorKind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
        }
    }

    /// Creates a message-only error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Classifies a raw `std::io::Error` for the given path.
    ///
    /// `NotFound` and `DirectoryNotEmpty` are promoted to their dedicated
    /// variants; everything else stays a generic `Io`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::new(ErrorKind::NotFound { path }),
            std::io::ErrorKind::DirectoryNotEmpty => Self::new(ErrorKind::NotEmpty { path }),
            _ => Self::new(ErrorKind::Io { path, source }),
        }
    }

    /// Attaches context to an error.
    /// Context is displayed before the error message.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    /// Useful to avoid expensive string construction for successful paths.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Returns a reference to the underlying ErrorKind.
    /// Allows pattern matching on specific error variants.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// True when the error classifies as "path does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    /// True when the error classifies as "directory still has entries".
    pub fn is_not_empty(&self) -> bool {
        matches!(self.kind, ErrorKind::NotEmpty { .. })
    }

    /// Returns the innermost error in the chain.
    /// Traverses the error source chain to find the root cause.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}

impl From<ErrorKind> for FilestageError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for FilestageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::Io { source, .. } => Some(source),
            ErrorKind::NotEmpty { .. } => None,
            ErrorKind::NotFound { .. } => None,
            ErrorKind::Message { .. } => None,
        }
    }
}

impl fmt::Display for FilestageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display context first if present
        for (i, ctx) in self.context.iter().enumerate() {
            if i == 0 {
                write!(f, "{}", ctx)?;
            } else {
                write!(f, ": {}", ctx)?;
            }
        }

        // Add a separator if we have context
        if !self.context.is_empty() {
            write!(f, ": ")?;
        }

        // Display the underlying error kind
        match &self.kind {
            ErrorKind::Io { path, source } => {
                write!(f, "I/O error at {}: {}", path.display(), source)
            }
            ErrorKind::NotEmpty { path } => {
                write!(f, "directory not empty: {}", path.display())
            }
            ErrorKind::NotFound { path } => {
                write!(f, "no such path: {}", path.display())
            }
            ErrorKind::Message { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

/* 📖 # Why use Box<FilestageError> in the result type?

Boxing the error reduces the size of the result type, making it more efficient to return in the common case.

*/

/// Standard result type for filestage operations.
pub type FilestageResult<T> = std::result::Result<T, Box<FilestageError>>;

/// Constructs a boxed message error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::error::FilestageError::message(format!($($arg)*)))
    };
}

/// Extension trait for attaching context to Results.
/// Provides ergonomic error context attachment during error propagation.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    /// Eager evaluation: context is evaluated immediately.
    fn context(self, context: impl Into<String>) -> FilestageResult<T>;

    /// Attaches context using lazy evaluation.
    /// Context is only evaluated if the result is an error.
    /// Prefer this to avoid expensive string formatting in the success path.
    fn with_context<F>(self, f: F) -> FilestageResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for FilestageResult<T> {
    fn context(self, context: impl Into<String>) -> FilestageResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> FilestageResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}
