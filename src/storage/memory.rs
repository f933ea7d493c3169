use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        RwLock,
    },
};

use crate::errors::StorageError;

use super::KeyValueStore;

/// In-process key-value store. Failures can be switched on to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `get` fail until switched off.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set`/`remove_many` fail until switched off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    fn check(&self, flag: &AtomicBool, operation: &str) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!(
                "memory store rejected {operation}"
            )));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check(&self.fail_reads, "read")?;
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Poisoned("memory store"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check(&self.fail_writes, "write")?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Poisoned("memory store"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.check(&self.fail_writes, "remove")?;
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Poisoned("memory store"))?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}
