use tracing::info;

use crate::domain::{validate_amount, AmountRule, HandedOverEntry};
use crate::errors::Result;
use crate::storage::RecordStore;

/// Tracks money handed back against the payments total.
pub struct HandoverService;

impl HandoverService {
    /// Records an incremental handed-over amount dated today.
    pub fn add(store: &RecordStore, amount: &str, notes: Option<&str>) -> Result<HandedOverEntry> {
        let amount = validate_amount(amount, AmountRule::Positive)?;
        let clock = store.clock();
        let entry = HandedOverEntry::new(amount, clock.today(), clock.now()).with_notes(notes);
        store.add_handed_over_amount(entry.clone())?;
        info!(amount, "handed-over amount added");
        Ok(entry)
    }

    /// Overwrites the running total; earlier entries are discarded.
    pub fn set_total(store: &RecordStore, amount: &str) -> Result<HandedOverEntry> {
        let total = validate_amount(amount, AmountRule::NonNegative)?;
        store.set_total_handed_over(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn add_accumulates_and_set_total_collapses() {
        let store = RecordStore::new(Arc::new(MemoryStore::new()));
        HandoverService::add(&store, "10", Some("cash")).unwrap();
        HandoverService::add(&store, "2,5", None).unwrap();
        assert_eq!(store.get_total_handed_over(), 12.5);

        HandoverService::set_total(&store, "4").unwrap();
        assert_eq!(store.get_handed_over_amounts().len(), 1);
        assert_eq!(store.get_total_handed_over(), 4.0);
    }

    #[test]
    fn rejects_invalid_amounts_before_writing() {
        let store = RecordStore::new(Arc::new(MemoryStore::new()));
        HandoverService::add(&store, "3", None).unwrap();
        assert!(HandoverService::add(&store, "0", None).unwrap_err().is_validation());
        assert!(HandoverService::set_total(&store, "-1").unwrap_err().is_validation());
        assert_eq!(store.get_total_handed_over(), 3.0);
    }
}
