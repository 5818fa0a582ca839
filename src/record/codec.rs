//! Record codec
//!
//! Encoding and decoding functions for the on-disk record layout.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{CaskError, Result};
use super::{Record, RecordHeader, HEADER_SIZE};

// =============================================================================
// Encoding
// =============================================================================

/// Encode a record to bytes
///
/// Format: timestamp (4) + key_len (4) + value_len (4) + key + value
///
/// Returns the total encoded size alongside the bytes. Fails rather than
/// truncating when a length does not fit the 32-bit header fields.
pub fn encode_record(timestamp: u32, key: &[u8], value: &[u8]) -> Result<(u32, Bytes)> {
    let key_len = u32::try_from(key.len()).map_err(|_| {
        CaskError::Encoding(format!(
            "key length {} exceeds u32 header field",
            key.len()
        ))
    })?;
    let value_len = u32::try_from(value.len()).map_err(|_| {
        CaskError::Encoding(format!(
            "value length {} exceeds u32 header field",
            value.len()
        ))
    })?;

    let total = HEADER_SIZE as u64 + key_len as u64 + value_len as u64;
    let total_size = u32::try_from(total).map_err(|_| {
        CaskError::Encoding(format!("record size {} exceeds u32 range", total))
    })?;

    let mut buf = BytesMut::with_capacity(total_size as usize);
    buf.put_u32_le(timestamp);
    buf.put_u32_le(key_len);
    buf.put_u32_le(value_len);
    buf.put_slice(key);
    buf.put_slice(value);

    Ok((total_size, buf.freeze()))
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode only the header from the front of `bytes`
pub fn decode_header(bytes: &[u8]) -> Result<RecordHeader> {
    if bytes.len() < HEADER_SIZE {
        return Err(CaskError::Encoding(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut buf = &bytes[..HEADER_SIZE];
    Ok(RecordHeader {
        timestamp: buf.get_u32_le(),
        key_len: buf.get_u32_le(),
        value_len: buf.get_u32_le(),
    })
}

/// Decode a full record
///
/// `bytes` must hold exactly one record: its length has to match the size
/// declared by the header.
pub fn decode_record(bytes: &[u8]) -> Result<Record> {
    let header = decode_header(bytes)?;

    let total = header.total_size();
    if bytes.len() as u64 != total {
        return Err(CaskError::Encoding(format!(
            "Record length mismatch: header declares {} bytes, got {}",
            total,
            bytes.len()
        )));
    }

    let key_end = HEADER_SIZE + header.key_len as usize;
    let key = bytes[HEADER_SIZE..key_end].to_vec();
    let value = bytes[key_end..].to_vec();

    Ok(Record {
        timestamp: header.timestamp,
        key,
        value,
    })
}
