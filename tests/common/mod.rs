#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use once_cell::sync::Lazy;
use repay_core::storage::{FileStore, RecordStore};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that is removed when the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Record store backed by JSON files in a unique directory.
pub fn file_backed_store() -> (Arc<RecordStore>, PathBuf) {
    let base = temp_base();
    let store = open_store(&base);
    (store, base)
}

pub fn open_store(base: &std::path::Path) -> Arc<RecordStore> {
    let files = FileStore::new(base.join("data")).expect("create file store");
    Arc::new(RecordStore::new(Arc::new(files)))
}
