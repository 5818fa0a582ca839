//! Key directory implementation
//!
//! HashMap-based; no ordering is needed since the log is never scanned by key.

use std::collections::HashMap;

use super::KeyEntry;

/// In-memory key → record location map
#[derive(Debug, Default)]
pub struct KeyDir {
    entries: HashMap<String, KeyEntry>,
}

impl KeyDir {
    /// Create an empty key directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `key`, returning the replaced one
    pub fn set(&mut self, key: impl Into<String>, entry: KeyEntry) -> Option<KeyEntry> {
        self.entries.insert(key.into(), entry)
    }

    /// Look up the entry for `key`
    pub fn get(&self, key: &str) -> Option<KeyEntry> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all keys (arbitrary order)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over all entries (arbitrary order)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
