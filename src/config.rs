//! Configuration for caskdb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{CaskError, Result};

/// Main configuration for a caskdb store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single log file backing the store
    pub path: PathBuf,

    /// What to do with an existing log file on open
    pub open_mode: OpenMode,

    /// Cut an incomplete trailing record off the log during replay instead
    /// of failing the open
    pub repair_torn_tail: bool,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync the log
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Record Limits
    // -------------------------------------------------------------------------
    /// Largest accepted key, in bytes
    pub max_key_size: usize,

    /// Largest accepted value, in bytes
    pub max_value_size: usize,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N unsynced records (balanced durability/performance)
    EveryNEntries { count: usize },
}

/// How an existing log file is treated when the store opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Replay every record to rebuild the key directory
    #[default]
    Replay,

    /// Truncate the file to empty and start fresh
    Truncate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./caskdb.db"),
            open_mode: OpenMode::Replay,
            repair_torn_tail: false,
            sync_strategy: SyncStrategy::EveryNEntries { count: 100 },
            max_key_size: 1024,          // 1 KB
            max_value_size: 1024 * 1024, // 1 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default config for the given log file path
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self::builder().path(path).build()
    }

    /// Reject settings the store cannot honor
    pub fn validate(&self) -> Result<()> {
        if let SyncStrategy::EveryNEntries { count: 0 } = self.sync_strategy {
            return Err(CaskError::Config(
                "sync strategy EveryNEntries needs a count of at least 1".to_string(),
            ));
        }
        if self.max_key_size == 0 {
            return Err(CaskError::Config("max_key_size must be non-zero".to_string()));
        }
        if self.max_value_size == 0 {
            return Err(CaskError::Config(
                "max_value_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the open mode
    pub fn open_mode(mut self, mode: OpenMode) -> Self {
        self.config.open_mode = mode;
        self
    }

    /// Allow replay to drop an incomplete trailing record
    pub fn repair_torn_tail(mut self, repair: bool) -> Self {
        self.config.repair_torn_tail = repair;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the maximum key size (in bytes)
    pub fn max_key_size(mut self, size: usize) -> Self {
        self.config.max_key_size = size;
        self
    }

    /// Set the maximum value size (in bytes)
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
