//! Tests for the log file
//!
//! These tests verify:
//! - Append positions and the separator byte
//! - Positioned reads
//! - Replay of existing logs, including torn tails and foreign files
//! - Truncating create

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use caskdb::config::SyncStrategy;
use caskdb::log::{LogFile, LogReplay, ReplayResult, ReplayedEntry, RECORD_SEPARATOR};
use caskdb::record::encode_record;
use caskdb::CaskError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("test.log");
    (temp_dir, log_path)
}

fn record(key: &str, value: &str) -> Vec<u8> {
    encode_record(1, key.as_bytes(), value.as_bytes()).unwrap().1.to_vec()
}

fn replay_all(path: &PathBuf) -> (LogFile, Vec<ReplayedEntry>, ReplayResult) {
    replay_with(path, false).unwrap()
}

fn replay_with(
    path: &PathBuf,
    repair_torn_tail: bool,
) -> Result<(LogFile, Vec<ReplayedEntry>, ReplayResult), CaskError> {
    let mut entries = Vec::new();
    let (log, result) = LogFile::open(path, SyncStrategy::EveryWrite, repair_torn_tail, |e| {
        entries.push(e);
        Ok(())
    })?;
    Ok((log, entries, result))
}

/// A complete record followed by the first half of another
fn write_torn_log(path: &PathBuf) -> (Vec<u8>, Vec<u8>) {
    let a = record("complete", "record");
    {
        let mut log = LogFile::create(path, SyncStrategy::EveryWrite).unwrap();
        log.append(&a).unwrap();
        log.close().unwrap();
    }

    let b = record("partial", "record");
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(&b[..b.len() / 2]).unwrap();
    (a, b)
}

// =============================================================================
// Append Tests
// =============================================================================

#[test]
fn test_append_returns_start_positions() {
    let (_temp, path) = setup_temp_log();
    let mut log = LogFile::create(&path, SyncStrategy::EveryWrite).unwrap();

    let a = record("a", "1");
    let b = record("bb", "22");

    let pos_a = log.append(&a).unwrap();
    let pos_b = log.append(&b).unwrap();

    assert_eq!(pos_a, 0);
    assert_eq!(pos_b as usize, a.len() + 1);
    assert_eq!(log.cursor() as usize, a.len() + b.len() + 2);
}

#[test]
fn test_separator_is_written() {
    let (_temp, path) = setup_temp_log();
    let mut log = LogFile::create(&path, SyncStrategy::EveryWrite).unwrap();

    let a = record("key", "value");
    log.append(&a).unwrap();
    log.close().unwrap();

    let contents = fs::read(&path).unwrap();
    assert_eq!(contents.len(), a.len() + 1);
    assert_eq!(&contents[..a.len()], a.as_slice());
    assert_eq!(contents[a.len()], RECORD_SEPARATOR);
}

#[test]
fn test_read_at_returns_exact_bytes() {
    let (_temp, path) = setup_temp_log();
    let mut log = LogFile::create(&path, SyncStrategy::EveryWrite).unwrap();

    let a = record("first", "one");
    let b = record("second", "two");
    log.append(&a).unwrap();
    let pos_b = log.append(&b).unwrap();

    assert_eq!(log.read_at(0, a.len() as u32).unwrap(), a);
    assert_eq!(log.read_at(pos_b, b.len() as u32).unwrap(), b);
}

#[test]
fn test_read_past_end_is_io_error() {
    let (_temp, path) = setup_temp_log();
    let mut log = LogFile::create(&path, SyncStrategy::EveryWrite).unwrap();
    log.append(&record("k", "v")).unwrap();

    let result = log.read_at(0, 1000);
    assert!(matches!(result, Err(CaskError::Io(_))));
}

#[test]
fn test_create_truncates_existing_file() {
    let (_temp, path) = setup_temp_log();
    fs::write(&path, b"stale data").unwrap();

    let log = LogFile::create(&path, SyncStrategy::EveryWrite).unwrap();

    assert_eq!(log.cursor(), 0);
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_create_in_missing_directory_fails_with_initialization() {
    let (temp, _) = setup_temp_log();
    let path = temp.path().join("no_such_dir").join("x.log");

    let result = LogFile::create(&path, SyncStrategy::EveryWrite);
    assert!(matches!(result, Err(CaskError::Initialization { .. })));
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_open_new_file_is_empty() {
    let (_temp, path) = setup_temp_log();

    let (log, entries, result) = replay_all(&path);

    assert!(entries.is_empty());
    assert_eq!(result.records_replayed, 0);
    assert_eq!(log.cursor(), 0);
    assert!(path.exists());
}

#[test]
fn test_replay_reports_positions_in_order() {
    let (_temp, path) = setup_temp_log();
    let mut positions = Vec::new();
    {
        let mut log = LogFile::create(&path, SyncStrategy::EveryWrite).unwrap();
        for i in 0..5 {
            positions.push(log.append(&record(&format!("key{}", i), "v")).unwrap());
        }
        log.close().unwrap();
    }

    let (log, entries, result) = replay_all(&path);

    assert_eq!(result.records_replayed, 5);
    assert!(!result.was_truncated());
    assert_eq!(log.cursor(), result.end_offset);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.key, format!("key{}", i).into_bytes());
        assert_eq!(entry.position, positions[i]);
    }
}

#[test]
fn test_append_after_replay_continues_at_end() {
    let (_temp, path) = setup_temp_log();
    let a = record("a", "1");
    {
        let mut log = LogFile::create(&path, SyncStrategy::EveryWrite).unwrap();
        log.append(&a).unwrap();
        log.close().unwrap();
    }

    let (mut log, _, _) = replay_all(&path);
    let b = record("b", "2");
    let pos = log.append(&b).unwrap();

    assert_eq!(pos as usize, a.len() + 1);
    assert_eq!(log.read_at(pos, b.len() as u32).unwrap(), b);
}

#[test]
fn test_replay_rejects_torn_tail_by_default() {
    let (_temp, path) = setup_temp_log();
    let (a, b) = write_torn_log(&path);
    let len_before = fs::metadata(&path).unwrap().len();

    let result = replay_with(&path, false);

    assert!(matches!(result, Err(CaskError::Encoding(_))));
    assert_eq!(fs::metadata(&path).unwrap().len(), len_before);
    assert_eq!(len_before as usize, a.len() + 1 + b.len() / 2);
}

#[test]
fn test_replay_repairs_torn_tail_when_enabled() {
    let (_temp, path) = setup_temp_log();
    let (a, b) = write_torn_log(&path);

    let (log, entries, result) = replay_with(&path, true).unwrap();

    assert_eq!(entries.len(), 1);
    assert!(result.was_truncated());
    assert_eq!(result.truncated_bytes as usize, b.len() / 2);
    assert_eq!(log.cursor() as usize, a.len() + 1);
    assert_eq!(fs::metadata(&path).unwrap().len() as usize, a.len() + 1);
}

#[test]
fn test_repair_never_empties_a_log_without_complete_records() {
    let (_temp, path) = setup_temp_log();
    // One record missing its separator: nothing replayable
    let a = record("k", "v");
    fs::write(&path, &a).unwrap();

    let result = replay_with(&path, true);

    assert!(matches!(result, Err(CaskError::Encoding(_))));
    assert_eq!(fs::read(&path).unwrap(), a);
}

#[test]
fn test_replay_rejects_text_file() {
    let (_temp, path) = setup_temp_log();
    let notes = b"hello world, these are my important notes\n";
    fs::write(&path, notes).unwrap();

    assert!(matches!(replay_with(&path, false), Err(CaskError::Encoding(_))));
    assert!(matches!(replay_with(&path, true), Err(CaskError::Encoding(_))));
    assert_eq!(fs::read(&path).unwrap(), notes);
}

#[test]
fn test_replay_rejects_wrong_separator() {
    let (_temp, path) = setup_temp_log();
    let mut bytes = record("k", "v");
    bytes.push(0xFF);
    bytes.extend_from_slice(&record("k2", "v2"));
    bytes.push(RECORD_SEPARATOR);
    fs::write(&path, &bytes).unwrap();

    let result = LogFile::open(&path, SyncStrategy::EveryWrite, false, |_| Ok(()));
    assert!(matches!(result, Err(CaskError::Encoding(_))));
}

#[test]
fn test_replay_stops_on_apply_error() {
    let (_temp, path) = setup_temp_log();
    {
        let mut log = LogFile::create(&path, SyncStrategy::EveryWrite).unwrap();
        log.append(&record("a", "1")).unwrap();
        log.append(&record("b", "2")).unwrap();
        log.close().unwrap();
    }

    let mut seen = 0;
    let result = LogFile::open(&path, SyncStrategy::EveryWrite, false, |_| {
        seen += 1;
        Err(CaskError::Encoding("rejected".to_string()))
    });

    assert!(result.is_err());
    assert_eq!(seen, 1);
}

#[test]
fn test_log_replay_reader_directly() {
    let (_temp, path) = setup_temp_log();
    {
        let mut log = LogFile::create(&path, SyncStrategy::EveryWrite).unwrap();
        log.append(&record("x", "value")).unwrap();
        log.close().unwrap();
    }

    let file = fs::File::open(&path).unwrap();
    let mut replay = LogReplay::new(&file).unwrap();

    assert_eq!(replay.offset(), 0);
    let entry = replay.next_entry().unwrap().unwrap();
    assert_eq!(entry.key, b"x");
    assert_eq!(entry.total_size as usize, record("x", "value").len());
    // Past the record and its separator
    assert_eq!(replay.offset(), entry.total_size as u64 + 1);
    assert!(replay.next_entry().unwrap().is_none());

    let result = replay.finish();
    assert_eq!(result.records_replayed, 1);
    assert_eq!(result.truncated_bytes, 0);
}
