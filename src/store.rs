//! Store Module
//!
//! The disk-backed store that ties the codec, log and key directory together.
//!
//! ## Responsibilities
//! - Rebuild the key directory from the log on open
//! - Append every write and point the key directory at it
//! - Serve reads with one positioned read per lookup
//! - Refuse all work once closed

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::config::{Config, OpenMode};
use crate::error::{CaskError, Result};
use crate::keydir::{KeyDir, KeyEntry};
use crate::log::LogFile;
use crate::record::{decode_record, encode_record};

/// Point-in-time figures about an open store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of live keys
    pub key_count: usize,

    /// Log length in bytes
    pub log_size: u64,

    /// Bytes held by superseded records (and their separators)
    pub reclaimable_bytes: u64,
}

/// Log-structured hash table backed by a single file
///
/// ## Lifecycle
///
/// `open` → Open → `close` → Closed. Every operation on a closed store
/// returns [`CaskError::Closed`]. The log file and key directory are owned
/// together and released together.
///
/// ## Access Model
///
/// Single caller. Writes take `&mut self`; reads take `&self` and do a
/// positioned read through the shared file handle.
pub struct DiskStore {
    /// Store configuration
    config: Config,

    /// Log file; `None` once closed
    log: Option<LogFile>,

    /// Key → latest record location
    keydir: KeyDir,

    /// Bytes made unreachable by overwrites
    reclaimable_bytes: u64,
}

impl DiskStore {
    /// Open a store at `path` with default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(Config::for_path(path.as_ref()))
    }

    /// Open a store with the given config
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Open the log (replaying or truncating, per `open_mode`); replay
    ///    fails on unreadable trailing bytes unless `repair_torn_tail` is set
    /// 3. Rebuild the key directory from replayed records
    pub fn open_with(config: Config) -> Result<Self> {
        // Step 1: Validate
        config.validate()?;

        let mut keydir = KeyDir::new();
        let mut reclaimable_bytes = 0u64;

        // Step 2 + 3: Open the log and rebuild the key directory
        let log = match config.open_mode {
            OpenMode::Truncate => LogFile::create(&config.path, config.sync_strategy)?,
            OpenMode::Replay => {
                let (log, result) = LogFile::open(
                    &config.path,
                    config.sync_strategy,
                    config.repair_torn_tail,
                    |entry| {
                        let key = String::from_utf8(entry.key).map_err(|e| {
                            CaskError::Encoding(format!(
                                "Key of record at offset {} is not valid UTF-8: {}",
                                entry.position, e
                            ))
                        })?;

                        let location =
                            KeyEntry::new(entry.timestamp, entry.position, entry.total_size);
                        if let Some(old) = keydir.set(key, location) {
                            reclaimable_bytes += old.total_size as u64 + 1;
                        }
                        Ok(())
                    },
                )?;

                info!(
                    path = %config.path.display(),
                    records = result.records_replayed,
                    keys = keydir.len(),
                    log_size = result.end_offset,
                    "replayed log"
                );
                log
            }
        };

        Ok(Self {
            config,
            log: Some(log),
            keydir,
            reclaimable_bytes,
        })
    }

    /// Get the value stored for `key`
    ///
    /// Returns [`CaskError::KeyNotFound`] when the key was never set, which is
    /// distinct from a stored empty string.
    pub fn get(&self, key: &str) -> Result<String> {
        let log = self.log.as_ref().ok_or(CaskError::Closed)?;

        // Step 1: Find the record location
        let entry = self
            .keydir
            .get(key)
            .ok_or_else(|| CaskError::KeyNotFound(key.to_string()))?;

        // Step 2: Read and decode the whole record
        let bytes = log.read_at(entry.position, entry.total_size)?;
        let record = decode_record(&bytes)?;

        if record.key != key.as_bytes() {
            return Err(CaskError::Encoding(format!(
                "Record at offset {} belongs to a different key",
                entry.position
            )));
        }

        debug!(key, position = entry.position, size = entry.total_size, "get");

        String::from_utf8(record.value).map_err(|e| {
            CaskError::Encoding(format!("Value for key {:?} is not valid UTF-8: {}", key, e))
        })
    }

    /// Set `key` to `value`
    ///
    /// Steps:
    /// 1. Check size limits
    /// 2. Encode with the current wall-clock time
    /// 3. Append to the log
    /// 4. Point the key directory at the new record
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let log = self.log.as_mut().ok_or(CaskError::Closed)?;

        // Step 1: Limits
        if key.len() > self.config.max_key_size {
            return Err(CaskError::Encoding(format!(
                "Key size {} exceeds the maximum allowed {}",
                key.len(),
                self.config.max_key_size
            )));
        }
        if value.len() > self.config.max_value_size {
            return Err(CaskError::Encoding(format!(
                "Value size {} exceeds the maximum allowed {}",
                value.len(),
                self.config.max_value_size
            )));
        }

        // Step 2: Encode
        let timestamp = current_timestamp();
        let (total_size, bytes) = encode_record(timestamp, key.as_bytes(), value.as_bytes())?;

        // Step 3: Append
        let position = log.append(&bytes)?;

        // Step 4: Upsert
        let entry = KeyEntry::new(timestamp, position, total_size);
        if let Some(old) = self.keydir.set(key, entry) {
            self.reclaimable_bytes += old.total_size as u64 + 1;
        }

        debug!(key, position, size = total_size, "set");
        Ok(())
    }

    /// Close the store
    ///
    /// Syncs and releases the log and drops the key directory. Closing twice
    /// returns [`CaskError::Closed`].
    pub fn close(&mut self) -> Result<()> {
        let log = self.log.take().ok_or(CaskError::Closed)?;

        self.keydir.clear();
        self.reclaimable_bytes = 0;

        log.close()?;
        info!(path = %self.config.path.display(), "closed store");
        Ok(())
    }

    /// Force pending writes to disk
    pub fn sync(&mut self) -> Result<()> {
        self.log.as_mut().ok_or(CaskError::Closed)?.sync()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Whether `key` has a value
    pub fn contains_key(&self, key: &str) -> bool {
        self.keydir.contains_key(key)
    }

    /// Location of the latest record for `key`
    pub fn entry(&self, key: &str) -> Option<KeyEntry> {
        self.keydir.get(key)
    }

    /// All live keys, in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keydir.keys()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.keydir.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keydir.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.log.is_none()
    }

    /// Current figures for this store
    pub fn stats(&self) -> Result<StoreStats> {
        let log = self.log.as_ref().ok_or(CaskError::Closed)?;
        Ok(StoreStats {
            key_count: self.keydir.len(),
            log_size: log.cursor(),
            reclaimable_bytes: self.reclaimable_bytes,
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Seconds since the Unix epoch, saturating at `u32::MAX`
pub(crate) fn current_timestamp() -> u32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}
