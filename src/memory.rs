//! In-memory store
//!
//! A bare key → [`KeyEntry`] mapping with no encoding and no file I/O.

use crate::error::Result;
use crate::keydir::{KeyDir, KeyEntry};

/// Store that keeps record locations in memory only
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: KeyDir,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the entry for `key`
    pub fn get(&self, key: &str) -> Option<KeyEntry> {
        self.data.get(key)
    }

    /// Insert or replace the entry for `key`
    pub fn set(&mut self, key: impl Into<String>, value: KeyEntry) {
        self.data.set(key, value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Nothing to release; always succeeds
    pub fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
