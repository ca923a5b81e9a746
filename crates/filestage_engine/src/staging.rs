/* 📖 # Why is the lifecycle split into three operations?

The staging lifecycle is a straight-line walk: ensure the staging
directory exists and is populated, inspect the target entry, then tear
the directory down again. Each step is an independent operation over the
PAL so it can be tested in isolation, and so the CLI can report each
step's outcome separately.

The operations return plain report structs rather than printing; the
caller decides how outcomes become user-visible lines. Deletion outcomes
in particular preserve the three-way distinction (not found / not empty /
other I/O failure) instead of collapsing into one generic failure.
*/

use std::path::PathBuf;
use std::time::SystemTime;

use tracing::{debug, instrument, warn};

use filestage_base::{FilePath, FilestageResult, Pal, PalHandle, ResultExt};

/// Outcome of [`ensure_staging`].
#[derive(Debug, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The target already existed; nothing was created.
    AlreadyPresent,
    /// The staging directory was created and populated.
    Created {
        /// The staging directory that was created.
        directory: FilePath,
        /// Number of placeholder files created.
        files: usize,
    },
}

/// File-only metadata reported by [`inspect`].
///
/// Present only when the target is a regular file; a directory report
/// never carries these fields.
#[derive(Debug, Clone)]
pub struct FileDetails {
    /// Last modification time.
    pub modified: SystemTime,
    /// Byte length.
    pub len: u64,
    /// Hidden flag (dotfile convention).
    pub hidden: bool,
}

/// Metadata report for an existing target entry.
#[derive(Debug, Clone)]
pub struct InspectReport {
    /// Final path component.
    pub name: String,
    /// Path resolved against the PAL base directory.
    pub absolute_path: PathBuf,
    /// True when the target is a regular file.
    pub is_file: bool,
    /// True when the target is a directory.
    pub is_directory: bool,
    /// File-only details, `None` for directories.
    pub details: Option<FileDetails>,
}

/// Classified outcome of a single directory deletion attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The directory was deleted.
    Deleted,
    /// The directory still contains entries.
    NotEmpty,
    /// The directory does not exist.
    NotFound,
    /// Any other I/O failure, with its rendered message.
    Failed(String),
}

impl DeleteOutcome {
    /// Classify a deletion result into its user-visible outcome.
    fn classify(result: FilestageResult<()>) -> Self {
        match result {
            Ok(()) => DeleteOutcome::Deleted,
            Err(e) if e.is_not_empty() => DeleteOutcome::NotEmpty,
            Err(e) if e.is_not_found() => DeleteOutcome::NotFound,
            Err(e) => DeleteOutcome::Failed(e.to_string()),
        }
    }
}

/// Report of a full [`teardown`] pass.
#[derive(Debug)]
pub struct TeardownReport {
    /// First deletion attempt on the populated directory; expected
    /// [`DeleteOutcome::NotEmpty`].
    pub first_attempt: DeleteOutcome,
    /// Number of child entries removed while clearing.
    pub cleared: usize,
    /// Deletion attempt after clearing; expected
    /// [`DeleteOutcome::Deleted`].
    pub second_attempt: DeleteOutcome,
}

/// Report of one [`run_lifecycle`] traversal.
#[derive(Debug)]
pub struct LifecycleReport {
    pub ensure: EnsureOutcome,
    pub inspect: Option<InspectReport>,
    /// Present only when the target was a regular file.
    pub teardown: Option<TeardownReport>,
}

/// Ensure the staging directory for `target` exists and is populated.
///
/// When the target does not exist: derive its parent directory, create
/// all missing intermediate directories, then create `count` placeholder
/// files named `hi{i}.txt` inside it. A creation failure aborts the loop
/// and propagates; files created before the failure remain on disk (no
/// rollback).
#[instrument(skip(pal), fields(target = %target, count))]
pub fn ensure_staging(
    pal: &PalHandle,
    target: &FilePath,
    count: usize,
) -> FilestageResult<EnsureOutcome> {
    if pal.exists(target)? {
        debug!("target already present, skipping population");
        return Ok(EnsureOutcome::AlreadyPresent);
    }

    let parent = target
        .parent()
        .ok_or_else(|| filestage_base::err!("target path '{}' has no parent directory", target))?;

    debug!(directory = %parent, "creating staging directory");
    pal.create_directory_all(&parent)
        .with_context(|| format!("creating staging directory '{}'", parent))?;

    for i in 0..count {
        let child = parent.join(format!("hi{i}.txt"));
        // Abort on the first failure; earlier placeholders stay behind.
        pal.create_file(&child)
            .with_context(|| format!("creating placeholder file '{}'", child))?;
    }
    debug!(files = count, "staging directory populated");

    Ok(EnsureOutcome::Created {
        directory: parent,
        files: count,
    })
}

/// Inspect the target entry, reporting metadata when it exists.
///
/// Returns `Ok(None)` when the target is absent. File-only details
/// (modification time, byte length, hidden flag) are reported only for
/// regular files, never for directories.
#[instrument(skip(pal), fields(target = %target))]
pub fn inspect(pal: &PalHandle, target: &FilePath) -> FilestageResult<Option<InspectReport>> {
    if !pal.exists(target)? {
        debug!("target absent, nothing to inspect");
        return Ok(None);
    }

    let meta = pal.metadata(target)?;
    let details = if meta.is_file {
        Some(FileDetails {
            modified: meta.modified,
            len: meta.len,
            hidden: meta.hidden,
        })
    } else {
        None
    };

    Ok(Some(InspectReport {
        name: target.file_name().unwrap_or_default().to_string(),
        absolute_path: pal.absolutize(target),
        is_file: meta.is_file,
        is_directory: meta.is_directory,
        details,
    }))
}

/// Tear down the staging directory.
///
/// Three steps, in order:
/// 1. Delete the directory as-is. On a populated directory this is
///    expected to fail with [`DeleteOutcome::NotEmpty`]; the outcome is
///    recorded, not fatal.
/// 2. Enumerate the direct children through the scoped listing iterator
///    and delete each one. The directory handle is released when the
///    iterator is dropped, also when a deletion fails mid-iteration and
///    the error propagates.
/// 3. Delete the now-empty directory again; expected to succeed.
#[instrument(skip(pal), fields(directory = %directory))]
pub fn teardown(pal: &PalHandle, directory: &FilePath) -> FilestageResult<TeardownReport> {
    let first_attempt = DeleteOutcome::classify(pal.remove_directory(directory));
    if first_attempt != DeleteOutcome::NotEmpty {
        warn!(outcome = ?first_attempt, "first deletion attempt did not report a populated directory");
    }

    let mut cleared = 0usize;
    for entry in pal.list_entries(directory)? {
        let entry = entry?;
        let meta = pal.metadata(&entry)?;
        if meta.is_directory {
            pal.remove_directory(&entry)
        } else {
            pal.remove_file(&entry)
        }
        .with_context(|| format!("clearing staging entry '{}'", entry))?;
        cleared += 1;
    }
    debug!(cleared, "staging directory cleared");

    let second_attempt = DeleteOutcome::classify(pal.remove_directory(directory));

    Ok(TeardownReport {
        first_attempt,
        cleared,
        second_attempt,
    })
}

/// Run the full staging lifecycle against one target path.
///
/// A straight-line traversal with no branching back: ensure, inspect,
/// then tear down. Teardown runs only when the inspected target is a
/// regular file, matching the demo's original flow.
#[instrument(skip(pal), fields(target = %target, count))]
pub fn run_lifecycle(
    pal: &PalHandle,
    target: &FilePath,
    count: usize,
) -> FilestageResult<LifecycleReport> {
    let ensure = ensure_staging(pal, target, count)?;
    let inspect = inspect(pal, target)?;

    let teardown = match &inspect {
        Some(report) if report.is_file => {
            let parent = target.parent().ok_or_else(|| {
                filestage_base::err!("target path '{}' has no parent directory", target)
            })?;
            Some(self::teardown(pal, &parent)?)
        }
        _ => None,
    };

    Ok(LifecycleReport {
        ensure,
        inspect,
        teardown,
    })
}
