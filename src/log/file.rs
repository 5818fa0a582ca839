//! Log File
//!
//! Owns the log file handle and the write cursor.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::config::SyncStrategy;
use crate::error::{CaskError, Result};

use super::{LogReplay, ReplayResult, ReplayedEntry, MAX_LOG_SIZE, RECORD_SEPARATOR};

/// Append-only log file
///
/// The file is exclusively owned from open to close. Dropping a `LogFile`
/// without calling [`LogFile::close`] still syncs pending writes.
pub struct LogFile {
    path: PathBuf,
    file: File,
    /// Offset where the next record will be written
    cursor: u64,
    sync_strategy: SyncStrategy,
    /// Records appended since the last sync
    unsynced: usize,
}

impl LogFile {
    /// Create a log file, truncating any existing content
    pub fn create(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|source| CaskError::Initialization {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), "created empty log");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            cursor: 0,
            sync_strategy,
            unsynced: 0,
        })
    }

    /// Open (or create) a log file and replay its records
    ///
    /// `apply` is called once per complete record, in log order.
    ///
    /// Bytes after the last complete record are an error unless
    /// `repair_torn_tail` is set, in which case they are cut off the file.
    /// A non-empty file without a single complete record is never cut.
    pub fn open<F>(
        path: &Path,
        sync_strategy: SyncStrategy,
        repair_torn_tail: bool,
        mut apply: F,
    ) -> Result<(Self, ReplayResult)>
    where
        F: FnMut(ReplayedEntry) -> Result<()>,
    {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|source| CaskError::Initialization {
                path: path.to_path_buf(),
                source,
            })?;

        let result = {
            let mut replay = LogReplay::new(&file)?;
            while let Some(entry) = replay.next_entry()? {
                apply(entry)?;
            }
            replay.finish()
        };

        if result.was_truncated() {
            if !repair_torn_tail || result.records_replayed == 0 {
                return Err(CaskError::Encoding(format!(
                    "{}: {} unreadable bytes at offset {} after {} complete records",
                    path.display(),
                    result.truncated_bytes,
                    result.end_offset,
                    result.records_replayed
                )));
            }
            warn!(
                path = %path.display(),
                offset = result.end_offset,
                bytes = result.truncated_bytes,
                "discarding incomplete record at end of log"
            );
            file.set_len(result.end_offset)?;
            file.sync_all()?;
        }

        Ok((
            Self {
                path: path.to_path_buf(),
                file,
                cursor: result.end_offset,
                sync_strategy,
                unsynced: 0,
            },
            result,
        ))
    }

    /// Append an encoded record
    ///
    /// Writes the record followed by the separator byte and returns the
    /// position of the record's first byte.
    pub fn append(&mut self, bytes: &[u8]) -> Result<u32> {
        let position = self.cursor;
        let next = position + bytes.len() as u64 + 1;
        if next > MAX_LOG_SIZE {
            return Err(CaskError::Encoding(format!(
                "Log would grow to {} bytes, past the 32-bit position range",
                next
            )));
        }

        let mut frame = Vec::with_capacity(bytes.len() + 1);
        frame.extend_from_slice(bytes);
        frame.push(RECORD_SEPARATOR);

        if let Err(e) = self.write_frame(position, &frame) {
            // Drop any partial write so the cursor still matches the file
            if let Err(trunc) = self.file.set_len(position) {
                error!(error = %trunc, "failed to roll back partial write");
            }
            return Err(e.into());
        }

        self.cursor = next;
        self.unsynced += 1;
        self.maybe_sync()?;

        // `next <= MAX_LOG_SIZE` so the start always fits
        Ok(position as u32)
    }

    /// Read `length` bytes starting at `position`
    pub fn read_at(&self, position: u32, length: u32) -> Result<Vec<u8>> {
        let end = position as u64 + length as u64;
        if end > self.cursor {
            return Err(CaskError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "read of {} bytes at {} runs past end of log ({})",
                    length, position, self.cursor
                ),
            )));
        }

        let mut handle = &self.file;
        handle.seek(SeekFrom::Start(position as u64))?;

        let mut buf = vec![0u8; length as usize];
        handle.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Force pending writes to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Sync and release the file
    pub fn close(mut self) -> Result<()> {
        self.file.sync_all()?;
        self.unsynced = 0;
        debug!(path = %self.path.display(), size = self.cursor, "closed log");
        Ok(())
    }

    /// Current write cursor (also the log length)
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn write_frame(&mut self, position: u64, frame: &[u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(position))?;
        self.file.write_all(frame)?;
        self.file.flush()
    }

    fn maybe_sync(&mut self) -> Result<()> {
        let due = match self.sync_strategy {
            SyncStrategy::EveryWrite => true,
            SyncStrategy::EveryNEntries { count } => self.unsynced >= count,
        };
        if due {
            self.sync()?;
        }
        Ok(())
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        if self.unsynced > 0 {
            if let Err(e) = self.file.sync_all() {
                error!(path = %self.path.display(), error = %e, "failed to sync log on drop");
            }
        }
    }
}
