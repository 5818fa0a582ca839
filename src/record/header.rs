//! Record header
//!
//! The fixed-size prefix of every record.

/// Header size: timestamp (4) + key length (4) + value length (4)
pub const HEADER_SIZE: usize = 12;

/// Parsed record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub timestamp: u32,
    pub key_len: u32,
    pub value_len: u32,
}

impl RecordHeader {
    /// Bytes following the header (key + value)
    pub fn body_len(&self) -> u64 {
        self.key_len as u64 + self.value_len as u64
    }

    /// Full record size including the header
    ///
    /// Computed in `u64`; never overflows for any header.
    pub fn total_size(&self) -> u64 {
        HEADER_SIZE as u64 + self.body_len()
    }
}
