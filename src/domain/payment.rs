//! Payment records and the draft used by the add/edit form.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{new_record_id, normalize_notes, parse_amount, Amounted};
use crate::errors::{FieldError, ValidationError};

/// A single recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub date: String,
    pub merchant: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a payment with a fresh identifier, stamped at `now`.
    pub fn new(
        date: impl Into<String>,
        merchant: impl Into<String>,
        price: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_record_id(),
            date: date.into(),
            merchant: merchant.into(),
            price,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = normalize_notes(Some(&notes.into()));
        self
    }

    /// Parses `date` as a calendar date; `None` when it is not `YYYY-MM-DD`.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

impl Amounted for Payment {
    fn amount(&self) -> f64 {
        self.price
    }
}

/// Raw form input for creating or editing a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentDraft {
    pub merchant: String,
    pub price: String,
    pub date: String,
    pub notes: Option<String>,
}

/// Field values that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPayment {
    pub merchant: String,
    pub price: f64,
    pub date: String,
    pub notes: Option<String>,
}

impl PaymentDraft {
    pub fn new(merchant: impl Into<String>, price: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            merchant: merchant.into(),
            price: price.into(),
            date: date.format("%Y-%m-%d").to_string(),
            notes: None,
        }
    }

    /// Pre-fills the form from an existing payment, as the edit screen does.
    pub fn from_payment(payment: &Payment) -> Self {
        Self {
            merchant: payment.merchant.clone(),
            price: payment.price.to_string(),
            date: payment.date.clone(),
            notes: payment.notes.clone(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks every field and collects all messages before failing.
    pub fn validate(&self) -> Result<ValidPayment, ValidationError> {
        let mut errors = Vec::new();

        let merchant = self.merchant.trim();
        if merchant.is_empty() {
            errors.push(FieldError::new("merchant", "merchant is required"));
        }

        let price = if self.price.trim().is_empty() {
            errors.push(FieldError::new("price", "price is required"));
            None
        } else {
            match parse_amount(&self.price) {
                Some(value) if value > 0.0 => Some(value),
                _ => {
                    errors.push(FieldError::new("price", "enter a valid price"));
                    None
                }
            }
        };

        let date = self.date.trim();
        if date.is_empty() {
            errors.push(FieldError::new("date", "date is required"));
        }

        match price {
            Some(price) if errors.is_empty() => Ok(ValidPayment {
                merchant: merchant.to_string(),
                price,
                date: date.to_string(),
                notes: normalize_notes(self.notes.as_deref()),
            }),
            _ => Err(ValidationError::Fields(errors)),
        }
    }
}

impl ValidPayment {
    /// Builds a brand-new payment from validated input.
    pub fn into_new_payment(self, now: DateTime<Utc>) -> Payment {
        Payment {
            id: new_record_id(),
            date: self.date,
            merchant: self.merchant,
            price: self.price,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies validated input over `existing`, keeping its id and creation stamp.
    pub fn apply_to(self, existing: &Payment, now: DateTime<Utc>) -> Payment {
        Payment {
            id: existing.id.clone(),
            date: self.date,
            merchant: self.merchant,
            price: self.price,
            notes: self.notes,
            created_at: existing.created_at,
            updated_at: now.max(existing.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn serializes_with_camel_case_and_omits_missing_notes() {
        let payment = Payment::new("2024-01-01", "Shop A", 10.0, at(9));
        let json = serde_json::to_value(&payment).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn deserializes_javascript_timestamps() {
        let raw = r#"{"id":"1712345678abc","date":"2024-01-01","merchant":"Shop",
            "price":4.5,"createdAt":"2024-01-01T10:00:00.000Z","updatedAt":"2024-01-01T10:00:00.000Z"}"#;
        let payment: Payment = serde_json::from_str(raw).unwrap();
        assert_eq!(payment.id, "1712345678abc");
        assert_eq!(payment.notes, None);
        assert_eq!(payment.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn validate_reports_every_bad_field() {
        let draft = PaymentDraft {
            merchant: "   ".into(),
            price: "-3".into(),
            date: "".into(),
            notes: None,
        };
        let err = draft.validate().expect_err("draft must be rejected");
        assert_eq!(err.field("merchant"), Some("merchant is required"));
        assert_eq!(err.field("price"), Some("enter a valid price"));
        assert_eq!(err.field("date"), Some("date is required"));
    }

    #[test]
    fn validate_distinguishes_missing_price() {
        let draft = PaymentDraft {
            merchant: "Shop".into(),
            price: " ".into(),
            date: "2024-01-01".into(),
            notes: None,
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field("price"), Some("price is required"));
    }

    #[test]
    fn validate_trims_and_drops_blank_notes() {
        let draft = PaymentDraft {
            merchant: "  Bakery ".into(),
            price: "3,20".into(),
            date: "2024-02-03".into(),
            notes: Some("  ".into()),
        };
        let valid = draft.validate().unwrap();
        assert_eq!(valid.merchant, "Bakery");
        assert_eq!(valid.price, 3.2);
        assert_eq!(valid.notes, None);
    }

    #[test]
    fn apply_keeps_identity_and_never_moves_updated_at_backwards() {
        let existing = Payment::new("2024-01-01", "Shop", 10.0, at(12));
        let valid = PaymentDraft::from_payment(&existing)
            .with_notes("edited")
            .validate()
            .unwrap();
        let updated = valid.apply_to(&existing, at(8));
        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.created_at, existing.created_at);
        assert_eq!(updated.updated_at, at(12));
        assert_eq!(updated.notes.as_deref(), Some("edited"));
    }

    #[test]
    fn calendar_date_rejects_free_text() {
        let mut payment = Payment::new("2024-03-10", "Shop", 1.0, at(1));
        assert!(payment.calendar_date().is_some());
        payment.date = "yesterday".into();
        assert!(payment.calendar_date().is_none());
    }
}
