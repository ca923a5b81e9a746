/* 📖 # Why four copy strategies?

The copy module demonstrates the classic byte-stream progression: a
per-byte loop, a fixed-size batch loop, the same loop behind buffered
readers/writers, and a whole-file read-then-write. All four produce
identical output; they differ only in how many syscalls and allocations
they cost. They share the PAL's raw stream handles and the common error
taxonomy, and add no decision logic of their own.
*/

use std::io::{BufReader, BufWriter, Read, Write};

use tracing::{debug, instrument};

use filestage_base::{FilePath, FilestageError, FilestageResult, Pal, PalHandle};

/// Batch size used by the batched and buffered strategies.
pub const BATCH_SIZE: usize = 1024;

/// How bytes are moved from source to destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStrategy {
    /// One byte per read/write call, over the raw handles.
    PerByte,
    /// Fixed-size batches over the raw handles.
    Batched,
    /// Fixed-size batches behind BufReader/BufWriter.
    Buffered,
    /// Read the whole source into memory, write it in one call.
    WholeFile,
}

fn stream_failed(path: &FilePath, e: std::io::Error) -> Box<FilestageError> {
    Box::new(FilestageError::from_io(path.as_path().to_path_buf(), e))
}

/// Pump `reader` into `writer` in `batch`-sized chunks, returning the
/// number of bytes copied.
fn pump(
    mut reader: impl Read,
    mut writer: impl Write,
    batch: usize,
    from: &FilePath,
    to: &FilePath,
) -> FilestageResult<u64> {
    let mut buffer = vec![0u8; batch];
    let mut copied = 0u64;
    loop {
        let length = reader.read(&mut buffer).map_err(|e| stream_failed(from, e))?;
        if length == 0 {
            break;
        }
        writer
            .write_all(&buffer[..length])
            .map_err(|e| stream_failed(to, e))?;
        copied += length as u64;
    }
    writer.flush().map_err(|e| stream_failed(to, e))?;
    Ok(copied)
}

/// Copy `from` to `to` with the given strategy, returning bytes copied.
///
/// A missing source classifies as `NotFound`; any other failure as `Io`.
/// The destination is truncated if it already exists.
#[instrument(skip(pal), fields(from = %from, to = %to, strategy = ?strategy))]
pub fn copy_file(
    pal: &PalHandle,
    from: &FilePath,
    to: &FilePath,
    strategy: CopyStrategy,
) -> FilestageResult<u64> {
    debug!("starting copy");
    let copied = match strategy {
        CopyStrategy::PerByte => {
            let reader = pal.open_read(from)?;
            let writer = pal.open_write(to)?;
            pump(reader, writer, 1, from, to)?
        }
        CopyStrategy::Batched => {
            let reader = pal.open_read(from)?;
            let writer = pal.open_write(to)?;
            pump(reader, writer, BATCH_SIZE, from, to)?
        }
        CopyStrategy::Buffered => {
            let reader = BufReader::new(pal.open_read(from)?);
            let writer = BufWriter::new(pal.open_write(to)?);
            pump(reader, writer, BATCH_SIZE, from, to)?
        }
        CopyStrategy::WholeFile => {
            let bytes = pal.read_file(from)?;
            let mut writer = pal.open_write(to)?;
            writer.write_all(&bytes).map_err(|e| stream_failed(to, e))?;
            writer.flush().map_err(|e| stream_failed(to, e))?;
            bytes.len() as u64
        }
    };
    debug!(copied, "copy finished");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filestage_base::MockPal;

    const STRATEGIES: [CopyStrategy; 4] = [
        CopyStrategy::PerByte,
        CopyStrategy::Batched,
        CopyStrategy::Buffered,
        CopyStrategy::WholeFile,
    ];

    fn pal_with_source(content: &[u8]) -> PalHandle {
        let mock = MockPal::new();
        mock.add_file(FilePath::from("video.mov"), content.to_vec());
        PalHandle::new(mock)
    }

    #[test]
    fn test_all_strategies_copy_identically() {
        // Larger than one batch so the loop actually iterates.
        let content: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();

        for strategy in STRATEGIES {
            let pal = pal_with_source(&content);
            let copied = copy_file(
                &pal,
                &FilePath::from("video.mov"),
                &FilePath::from("video_cloned.mov"),
                strategy,
            )
            .unwrap();

            assert_eq!(copied, content.len() as u64, "strategy {strategy:?}");
            assert_eq!(
                pal.read_file(&FilePath::from("video_cloned.mov")).unwrap(),
                content,
                "strategy {strategy:?}"
            );
        }
    }

    #[test]
    fn test_copy_empty_source() {
        for strategy in STRATEGIES {
            let pal = pal_with_source(b"");
            let copied = copy_file(
                &pal,
                &FilePath::from("video.mov"),
                &FilePath::from("video_cloned.mov"),
                strategy,
            )
            .unwrap();
            assert_eq!(copied, 0);
        }
    }

    #[test]
    fn test_copy_missing_source_is_not_found() {
        for strategy in STRATEGIES {
            let pal = PalHandle::new(MockPal::new());
            let err = copy_file(
                &pal,
                &FilePath::from("missing.mov"),
                &FilePath::from("video_cloned.mov"),
                strategy,
            )
            .unwrap_err();
            assert!(err.is_not_found(), "strategy {strategy:?}");
        }
    }

    #[test]
    fn test_copy_real_filesystem() {
        use filestage_base::RealPal;
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("video.mov"), b"frames").unwrap();
        let pal = PalHandle::new(RealPal::new(temp_dir.path().to_path_buf()));

        let copied = copy_file(
            &pal,
            &FilePath::from("video.mov"),
            &FilePath::from("video_cloned.mov"),
            CopyStrategy::Buffered,
        )
        .unwrap();

        assert_eq!(copied, 6);
        assert_eq!(
            std::fs::read(temp_dir.path().join("video_cloned.mov")).unwrap(),
            b"frames"
        );
    }
}
