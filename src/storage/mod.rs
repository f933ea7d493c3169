pub mod file_store;
pub mod memory;
pub mod record_store;

use std::sync::Arc;

use crate::errors::StorageError;

/// String-keyed document storage the record store persists into.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removes every listed key. Missing keys are ignored.
    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).remove_many(keys)
    }
}

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use record_store::{ExportDocument, ReadOutcome, RecordStore, HANDED_OVER_KEY, PAYMENTS_KEY};
