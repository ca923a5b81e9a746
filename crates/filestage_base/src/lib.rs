/* 📖 # Why have filestage_base as a core library?
filestage_base provides the foundational error handling, the tracing setup
and the platform abstraction layer used across all crates. This ensures
consistency in error handling and prevents circular dependencies between
crates.
*/

pub mod error;
pub mod pal;
mod pal_tests;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, FilestageError, FilestageResult, ResultExt};
pub use pal::{EntryMetadata, FilePath, MockPal, Pal, PalHandle, RealPal};
