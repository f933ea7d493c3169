//! Durable CRUD over the payments and handed-over collections.
//!
//! Each collection lives as one JSON array under a fixed key. Every
//! read-modify-write cycle holds that collection's guard, so concurrent
//! callers sharing a store never lose updates.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    domain::{common::sum_amounts, HandedOverEntry, Payment},
    errors::{Result, StorageError},
    time::{Clock, SystemClock},
};

use super::KeyValueStore;

pub const PAYMENTS_KEY: &str = "payments";
pub const HANDED_OVER_KEY: &str = "handedOverAmounts";

/// Result of decoding a stored collection under the lenient read policy.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    Loaded(Vec<T>),
    /// The key was absent or empty.
    Missing,
    /// Reading or decoding failed; the empty default stands in.
    Recovered { reason: String },
}

impl<T> ReadOutcome<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            ReadOutcome::Loaded(records) => records,
            ReadOutcome::Missing | ReadOutcome::Recovered { .. } => Vec::new(),
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, ReadOutcome::Recovered { .. })
    }
}

/// Snapshot of both collections written by [`RecordStore::export_to_json`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub payments: Vec<Payment>,
    pub handed_over_amounts: Vec<HandedOverEntry>,
    pub export_date: DateTime<Utc>,
}

/// Owns both collections on top of a [`KeyValueStore`].
pub struct RecordStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    payments_guard: Mutex<()>,
    handed_over_guard: Mutex<()>,
}

impl RecordStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(kv, Arc::new(SystemClock))
    }

    pub fn with_clock(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            kv,
            clock,
            payments_guard: Mutex::new(()),
            handed_over_guard: Mutex::new(()),
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // Payments

    /// Tagged read of the payments collection.
    pub fn load_payments(&self) -> ReadOutcome<Payment> {
        self.load(PAYMENTS_KEY)
    }

    /// Returns every payment, or an empty list when the collection cannot be read.
    pub fn get_payments(&self) -> Vec<Payment> {
        self.load_payments().into_records()
    }

    pub fn save_payments(&self, payments: &[Payment]) -> Result<()> {
        let _guard = self.lock(&self.payments_guard, PAYMENTS_KEY)?;
        self.write(PAYMENTS_KEY, payments)
    }

    pub fn add_payment(&self, payment: Payment) -> Result<()> {
        self.modify(&self.payments_guard, PAYMENTS_KEY, |payments: &mut Vec<Payment>| {
            payments.push(payment);
            true
        })?;
        Ok(())
    }

    pub fn add_multiple_payments(&self, new_payments: Vec<Payment>) -> Result<()> {
        self.modify(&self.payments_guard, PAYMENTS_KEY, |payments: &mut Vec<Payment>| {
            payments.extend(new_payments);
            true
        })?;
        Ok(())
    }

    /// Replaces the first payment sharing `payment.id`. Returns `false` and
    /// leaves the collection untouched when no payment matches.
    pub fn update_payment(&self, payment: Payment) -> Result<bool> {
        self.modify(&self.payments_guard, PAYMENTS_KEY, |payments: &mut Vec<Payment>| {
            match payments.iter_mut().find(|existing| existing.id == payment.id) {
                Some(slot) => {
                    *slot = payment;
                    true
                }
                None => false,
            }
        })
    }

    /// Removes every payment with `id`. Returns whether anything was removed.
    pub fn delete_payment(&self, id: &str) -> Result<bool> {
        let mut removed = false;
        self.modify(&self.payments_guard, PAYMENTS_KEY, |payments: &mut Vec<Payment>| {
            let before = payments.len();
            payments.retain(|payment| payment.id != id);
            removed = payments.len() != before;
            true
        })?;
        Ok(removed)
    }

    // Handed-over amounts

    pub fn load_handed_over_amounts(&self) -> ReadOutcome<HandedOverEntry> {
        self.load(HANDED_OVER_KEY)
    }

    pub fn get_handed_over_amounts(&self) -> Vec<HandedOverEntry> {
        self.load_handed_over_amounts().into_records()
    }

    pub fn save_handed_over_amounts(&self, amounts: &[HandedOverEntry]) -> Result<()> {
        let _guard = self.lock(&self.handed_over_guard, HANDED_OVER_KEY)?;
        self.write(HANDED_OVER_KEY, amounts)
    }

    pub fn add_handed_over_amount(&self, entry: HandedOverEntry) -> Result<()> {
        self.modify(
            &self.handed_over_guard,
            HANDED_OVER_KEY,
            |amounts: &mut Vec<HandedOverEntry>| {
                amounts.push(entry);
                true
            },
        )?;
        Ok(())
    }

    pub fn add_multiple_handed_over_amounts(&self, entries: Vec<HandedOverEntry>) -> Result<()> {
        self.modify(
            &self.handed_over_guard,
            HANDED_OVER_KEY,
            |amounts: &mut Vec<HandedOverEntry>| {
                amounts.extend(entries);
                true
            },
        )?;
        Ok(())
    }

    pub fn delete_handed_over_amount(&self, id: &str) -> Result<bool> {
        let mut removed = false;
        self.modify(
            &self.handed_over_guard,
            HANDED_OVER_KEY,
            |amounts: &mut Vec<HandedOverEntry>| {
                let before = amounts.len();
                amounts.retain(|entry| entry.id != id);
                removed = amounts.len() != before;
                true
            },
        )?;
        Ok(removed)
    }

    /// Sum of all handed-over amounts; zero when the collection cannot be read.
    pub fn get_total_handed_over(&self) -> f64 {
        sum_amounts(&self.get_handed_over_amounts())
    }

    /// Replaces the whole handed-over history with a single entry worth `total`.
    pub fn set_total_handed_over(&self, total: f64) -> Result<HandedOverEntry> {
        let entry = HandedOverEntry::new(total, self.clock.today(), self.clock.now());
        let _guard = self.lock(&self.handed_over_guard, HANDED_OVER_KEY)?;
        self.write(HANDED_OVER_KEY, std::slice::from_ref(&entry))?;
        info!(total, "handed-over total overwritten");
        Ok(entry)
    }

    // Whole-store operations

    /// Removes both collection keys.
    pub fn clear_all_data(&self) -> Result<()> {
        let _payments = self.lock(&self.payments_guard, PAYMENTS_KEY)?;
        let _handed_over = self.lock(&self.handed_over_guard, HANDED_OVER_KEY)?;
        self.kv.remove_many(&[PAYMENTS_KEY, HANDED_OVER_KEY])?;
        info!("all stored data cleared");
        Ok(())
    }

    pub fn export_document(&self) -> ExportDocument {
        ExportDocument {
            payments: self.get_payments(),
            handed_over_amounts: self.get_handed_over_amounts(),
            export_date: self.clock.now(),
        }
    }

    /// Pretty-printed export of both collections plus the export timestamp.
    pub fn export_to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_document())?)
    }

    // Internals

    fn lock<'a>(&self, guard: &'a Mutex<()>, key: &'static str) -> Result<MutexGuard<'a, ()>> {
        guard
            .lock()
            .map_err(|_| StorageError::Poisoned(key).into())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> ReadOutcome<T> {
        match self.kv.get(key) {
            Ok(raw) => decode(key, raw),
            Err(err) => {
                warn!(key, error = %err, "failed to read collection; using empty default");
                ReadOutcome::Recovered {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.kv.set(key, &json)?;
        debug!(key, count = records.len(), "collection written");
        Ok(())
    }

    /// Read-modify-write under the collection guard. A backend read failure
    /// aborts the cycle; an undecodable document is treated as empty. The
    /// collection is written back only when `mutate` returns `true`.
    fn modify<T, F>(&self, guard: &Mutex<()>, key: &'static str, mutate: F) -> Result<bool>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> bool,
    {
        let _guard = self.lock(guard, key)?;
        let raw = self.kv.get(key)?;
        let mut records = decode(key, raw).into_records();
        let changed = mutate(&mut records);
        if changed {
            self.write(key, &records)?;
        }
        Ok(changed)
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: Option<String>) -> ReadOutcome<T> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return ReadOutcome::Missing;
    };
    match serde_json::from_str(&raw) {
        Ok(records) => ReadOutcome::Loaded(records),
        Err(err) => {
            warn!(key, error = %err, "stored collection is not valid JSON; using empty default");
            ReadOutcome::Recovered {
                reason: err.to_string(),
            }
        }
    }
}
