//! Log Module
//!
//! The append-only log file backing a store.
//!
//! ## Responsibilities
//! - Own the file handle from open to close
//! - Track the write cursor and hand out record positions
//! - Positioned reads of whole records
//! - Replay existing records on open
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Record 1 (header + key + value)    │ 0x0A    │
//! ├──────────────────────────────────────────────┤
//! │ Record 2 (header + key + value)    │ 0x0A    │
//! ├──────────────────────────────────────────────┤
//! │ ...                                          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Each record is followed by a single separator byte which is not part of
//! the record itself. Positions handed out by the log are 32-bit, so a log
//! never grows past `u32::MAX` bytes.

mod file;
mod replay;

pub use file::LogFile;
pub use replay::{LogReplay, ReplayResult, ReplayedEntry};

/// Byte written after every record
pub const RECORD_SEPARATOR: u8 = b'\n';

/// Largest log size addressable by 32-bit record positions
pub const MAX_LOG_SIZE: u64 = u32::MAX as u64;
