use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{new_record_id, normalize_notes, parse_amount, Amounted};
use crate::errors::{FieldError, ValidationError};

/// Money given back against the running total of payments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HandedOverEntry {
    pub id: String,
    pub amount: f64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl HandedOverEntry {
    pub fn new(amount: f64, date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: new_record_id(),
            amount,
            date: date.format("%Y-%m-%d").to_string(),
            notes: None,
            created_at: now,
        }
    }

    pub fn with_notes(mut self, notes: Option<&str>) -> Self {
        self.notes = normalize_notes(notes);
        self
    }
}

impl Amounted for HandedOverEntry {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Which lower bound an entered amount must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRule {
    /// Incremental entries: strictly positive.
    Positive,
    /// Total overwrite: zero allowed.
    NonNegative,
}

/// Parses and checks a handed-over amount typed by the user.
pub fn validate_amount(input: &str, rule: AmountRule) -> Result<f64, ValidationError> {
    let accepted = parse_amount(input).filter(|value| match rule {
        AmountRule::Positive => *value > 0.0,
        AmountRule::NonNegative => *value >= 0.0,
    });
    accepted.ok_or_else(|| {
        ValidationError::Fields(vec![FieldError::new("amount", "enter a valid amount")])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn zero_is_only_valid_for_totals() {
        assert!(validate_amount("0", AmountRule::Positive).is_err());
        assert_eq!(validate_amount("0", AmountRule::NonNegative).unwrap(), 0.0);
        assert!(validate_amount("-1", AmountRule::NonNegative).is_err());
        assert_eq!(validate_amount("12.5", AmountRule::Positive).unwrap(), 12.5);
    }

    #[test]
    fn entry_uses_iso_date_and_camel_case_keys() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let entry = HandedOverEntry::new(20.0, now.date_naive(), now).with_notes(Some(" cash "));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-05-06");
        assert_eq!(json["notes"], "cash");
        assert!(json.get("createdAt").is_some());
    }
}
