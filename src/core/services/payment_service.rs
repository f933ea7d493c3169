//! Validated create/edit/delete of payments on top of the record store.

use tracing::info;

use crate::domain::{Payment, PaymentDraft};
use crate::errors::{Result, ValidationError};
use crate::storage::RecordStore;

/// Provides validated CRUD helpers for payments.
pub struct PaymentService;

impl PaymentService {
    /// Validates `draft`, stores a new payment and returns it.
    pub fn add(store: &RecordStore, draft: &PaymentDraft) -> Result<Payment> {
        let payment = draft.validate()?.into_new_payment(store.clock().now());
        store.add_payment(payment.clone())?;
        info!(id = %payment.id, "payment added");
        Ok(payment)
    }

    /// Applies `draft` over `existing`. Fails when the payment no longer exists.
    pub fn edit(store: &RecordStore, existing: &Payment, draft: &PaymentDraft) -> Result<Payment> {
        let updated = draft.validate()?.apply_to(existing, store.clock().now());
        if !store.update_payment(updated.clone())? {
            return Err(ValidationError::NotFound(format!("payment {}", existing.id)).into());
        }
        info!(id = %updated.id, "payment updated");
        Ok(updated)
    }

    pub fn delete(store: &RecordStore, id: &str) -> Result<bool> {
        let removed = store.delete_payment(id)?;
        if removed {
            info!(id, "payment deleted");
        }
        Ok(removed)
    }

    /// Looks a payment up by exact id, then by unique id prefix.
    pub fn find(store: &RecordStore, id_or_prefix: &str) -> Result<Payment> {
        let needle = id_or_prefix.trim();
        let payments = store.get_payments();
        if let Some(exact) = payments.iter().find(|payment| payment.id == needle) {
            return Ok(exact.clone());
        }
        let mut matches = payments
            .into_iter()
            .filter(|payment| !needle.is_empty() && payment.id.starts_with(needle));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(found),
            (Some(_), Some(_)) => Err(ValidationError::Invalid(format!(
                "id prefix `{needle}` is ambiguous"
            ))
            .into()),
            _ => Err(ValidationError::NotFound(format!("payment {needle}")).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::time::FixedClock;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn store_at(hour: u32) -> (RecordStore, Arc<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        let now = Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap();
        (RecordStore::with_clock(kv.clone(), Arc::new(FixedClock(now))), kv)
    }

    fn draft(merchant: &str, price: &str) -> PaymentDraft {
        PaymentDraft {
            merchant: merchant.into(),
            price: price.into(),
            date: "2024-03-01".into(),
            notes: None,
        }
    }

    #[test]
    fn invalid_draft_never_reaches_storage() {
        let (store, kv) = store_at(10);
        let err = PaymentService::add(&store, &draft("", "0")).unwrap_err();
        assert!(err.is_validation());
        assert!(!kv.contains_key(crate::storage::PAYMENTS_KEY));
    }

    #[test]
    fn edit_replaces_fields_and_keeps_identity() {
        let (store, _kv) = store_at(10);
        let created = PaymentService::add(&store, &draft("Shop", "10")).unwrap();
        let mut change = PaymentDraft::from_payment(&created);
        change.price = "12.5".into();
        let updated = PaymentService::edit(&store, &created, &change).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.get_payments(), vec![updated]);
    }

    #[test]
    fn edit_of_deleted_payment_is_reported() {
        let (store, _kv) = store_at(10);
        let created = PaymentService::add(&store, &draft("Shop", "10")).unwrap();
        PaymentService::delete(&store, &created.id).unwrap();
        let err = PaymentService::edit(&store, &created, &draft("Shop", "11")).unwrap_err();
        assert!(err.to_string().contains("not found"), "unexpected error: {err}");
        assert!(store.get_payments().is_empty());
    }

    #[test]
    fn find_accepts_unique_prefix() {
        let (store, _kv) = store_at(10);
        let created = PaymentService::add(&store, &draft("Shop", "10")).unwrap();
        let found = PaymentService::find(&store, &created.id[..8]).unwrap();
        assert_eq!(found.id, created.id);
        assert!(PaymentService::find(&store, "zzzz").is_err());
    }
}
