//! Shared test infrastructure for TodoStore integration tests.
//!
//! Provides TestEnv helper for on-disk store setup and reopening.

#![allow(dead_code)]

use tempfile::TempDir;
use todostore::{DateKey, DatedStore, FileStorage, FlatStore, Storage};

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::open(self.temp_dir.path()).expect("Failed to open file storage")
    }

    /// Open a flat store over this environment's directory.
    pub fn flat(&self) -> FlatStore<FileStorage> {
        FlatStore::open(self.storage())
    }

    /// Open a date-partitioned store over this environment's directory.
    pub fn dated(&self) -> DatedStore<FileStorage> {
        DatedStore::open(self.storage())
    }

    /// Overwrite the raw stored value for `key`.
    pub fn write_raw(&self, key: &str, value: &str) {
        self.storage().set(key, value).expect("Failed to write raw value");
    }

    pub fn read_raw(&self, key: &str) -> Option<String> {
        self.storage().get(key).expect("Failed to read raw value")
    }
}

pub fn date(y: i32, m: u32, d: u32) -> DateKey {
    DateKey::from_ymd(y, m, d).expect("valid date")
}

pub fn texts(items: &[todostore::Item]) -> Vec<&str> {
    items.iter().map(|item| item.text()).collect()
}
