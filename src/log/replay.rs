//! Log Replay
//!
//! Scans an existing log from the start so the key directory can be rebuilt.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};

use crate::error::{CaskError, Result};
use crate::record::{decode_header, HEADER_SIZE};

use super::RECORD_SEPARATOR;

/// Location of one record found during replay
///
/// Values are skipped, not read: only what the key directory needs is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayedEntry {
    pub key: Vec<u8>,
    pub timestamp: u32,
    pub position: u32,
    pub total_size: u32,
}

/// Result of a replay pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayResult {
    /// Number of complete records found
    pub records_replayed: u64,

    /// Offset just past the last complete record (the new write cursor)
    pub end_offset: u64,

    /// Bytes of an incomplete trailing record (torn write)
    pub truncated_bytes: u64,
}

impl ReplayResult {
    /// Whether an incomplete tail was found after the last complete record
    pub fn was_truncated(&self) -> bool {
        self.truncated_bytes > 0
    }
}

/// Sequential reader over the records of a log file
pub struct LogReplay<'a> {
    reader: BufReader<&'a File>,
    /// Start of the next unread record
    offset: u64,
    file_len: u64,
    records: u64,
    done: bool,
}

impl<'a> LogReplay<'a> {
    /// Start a replay at the beginning of `file`
    pub fn new(file: &'a File) -> Result<Self> {
        let file_len = file.metadata()?.len();
        let mut handle = file;
        handle.seek(SeekFrom::Start(0))?;

        Ok(Self {
            reader: BufReader::new(file),
            offset: 0,
            file_len,
            records: 0,
            done: false,
        })
    }

    /// Read the next complete record
    ///
    /// Returns `Ok(None)` at the end of the log, including when the remaining
    /// bytes only hold part of a record.
    pub fn next_entry(&mut self) -> Result<Option<ReplayedEntry>> {
        if self.done {
            return Ok(None);
        }

        let remaining = self.file_len - self.offset;
        if remaining < HEADER_SIZE as u64 {
            self.done = true;
            return Ok(None);
        }

        let mut header_buf = [0u8; HEADER_SIZE];
        self.reader.read_exact(&mut header_buf)?;
        let header = decode_header(&header_buf)?;

        // Record plus its separator must fit in what is left of the file
        let total = header.total_size();
        if total + 1 > remaining {
            self.done = true;
            return Ok(None);
        }

        let mut key = vec![0u8; header.key_len as usize];
        self.reader.read_exact(&mut key)?;
        self.reader.seek_relative(i64::from(header.value_len))?;

        let mut separator = [0u8; 1];
        self.reader.read_exact(&mut separator)?;
        if separator[0] != RECORD_SEPARATOR {
            return Err(CaskError::Encoding(format!(
                "Missing record separator at offset {}: found 0x{:02x}",
                self.offset + total,
                separator[0]
            )));
        }

        let position = u32::try_from(self.offset).map_err(|_| {
            CaskError::Encoding(format!(
                "Record offset {} exceeds 32-bit range",
                self.offset
            ))
        })?;
        let total_size = u32::try_from(total).map_err(|_| {
            CaskError::Encoding(format!("Record size {} exceeds u32 range", total))
        })?;

        self.offset += total + 1;
        self.records += 1;

        Ok(Some(ReplayedEntry {
            key,
            timestamp: header.timestamp,
            position,
            total_size,
        }))
    }

    /// Offset just past the last complete record read so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Summarize the pass
    pub fn finish(self) -> ReplayResult {
        ReplayResult {
            records_replayed: self.records,
            end_offset: self.offset,
            truncated_bytes: self.file_len - self.offset,
        }
    }
}
