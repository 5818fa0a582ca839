//! Key Directory Module
//!
//! In-memory index from key to the location of its latest record.
//!
//! ## Responsibilities
//! - Point every live key at its most recent record in the log
//! - Last write wins: an upsert replaces the entry wholesale
//! - Report absence explicitly (`None`), never as an empty value
//!
//! The directory holds locations only, never values. It is rebuilt from the
//! log on open and discarded on close.

mod table;

pub use table::KeyDir;

/// Location and metadata of one record in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    /// Write time (seconds since the Unix epoch)
    pub timestamp: u32,

    /// Offset of the record's first byte in the log
    pub position: u32,

    /// Length of the full encoded record
    pub total_size: u32,
}

impl KeyEntry {
    pub fn new(timestamp: u32, position: u32, total_size: u32) -> Self {
        Self {
            timestamp,
            position,
            total_size,
        }
    }

    /// Offset just past the record
    pub fn end(&self) -> u64 {
        self.position as u64 + self.total_size as u64
    }
}
