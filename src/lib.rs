//! # caskdb
//!
//! An embeddable, single-file key-value store built as a log-structured
//! hash table (the Bitcask model):
//! - Every write is appended to one log file, never updated in place
//! - An in-memory key directory points each key at its latest record
//! - Reads cost one positioned read, guided by the key directory
//! - The key directory is rebuilt by replaying the log on open
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        DiskStore                             │
//! │                  (get / set / close)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────┐
//!          │            │                 │
//!          ▼            ▼                 ▼
//!   ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
//!   │   Record    │ │   LogFile   │ │   KeyDir    │
//!   │   (Codec)   │ │  (Append)   │ │ (HashMap)   │
//!   └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use caskdb::DiskStore;
//!
//! let mut store = DiskStore::open("books.db").unwrap();
//! store.set("othello", "shakespeare").unwrap();
//! assert_eq!(store.get("othello").unwrap(), "shakespeare");
//! store.close().unwrap();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod log;
pub mod keydir;
pub mod memory;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CaskError, Result};
pub use config::{Config, OpenMode, SyncStrategy};
pub use keydir::KeyEntry;
pub use memory::MemoryStore;
pub use store::{DiskStore, StoreStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of caskdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
