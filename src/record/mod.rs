//! Record Module
//!
//! Binary layout of a single key-value write.
//!
//! ## Record Format
//! ```text
//! ┌───────────────┬─────────────┬─────────────┬───────────┬─────────────┐
//! │ Timestamp (4) │ KeyLen (4)  │ ValLen (4)  │    Key    │    Value    │
//! └───────────────┴─────────────┴─────────────┴───────────┴─────────────┘
//! ```
//!
//! All header fields are little-endian `u32`. The record carries no magic
//! number and no checksum; its size is fully determined by the header.

mod header;
mod codec;

pub use header::{RecordHeader, HEADER_SIZE};
pub use codec::{decode_header, decode_record, encode_record};

/// A decoded record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Write time (seconds since the Unix epoch)
    pub timestamp: u32,

    /// Raw key bytes
    pub key: Vec<u8>,

    /// Raw value bytes
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(timestamp: u32, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            timestamp,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Size of this record once encoded (header + key + value)
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.key.len() + self.value.len()
    }
}
