//! Export to and additive import from the JSON exchange file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::core::utils::ensure_dir;
use crate::domain::{HandedOverEntry, Payment};
use crate::errors::{RepayError, Result, ValidationError};
use crate::storage::{file_store::write_atomic, RecordStore, HANDED_OVER_KEY, PAYMENTS_KEY};

const EXPORT_PREFIX: &str = "repay_eksport_";
const INVALID_FORMAT: &str = "invalid file format";

/// Records decoded from an import file, not yet written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBundle {
    pub payments: Vec<Payment>,
    pub handed_over_amounts: Vec<HandedOverEntry>,
}

impl ImportBundle {
    /// Confirmation text listing what will be appended.
    pub fn describe(&self) -> String {
        let mut text = format!("{} payment(s)", self.payments.len());
        if !self.handed_over_amounts.is_empty() {
            text.push_str(&format!(
                " and {} handed-over amount(s)",
                self.handed_over_amounts.len()
            ));
        }
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub payments: usize,
    pub handed_over: usize,
}

pub struct TransferService;

impl TransferService {
    /// `repay_eksport_<YYYY-MM-DD>.json`
    pub fn export_file_name(date: NaiveDate) -> String {
        format!("{EXPORT_PREFIX}{}.json", date.format("%Y-%m-%d"))
    }

    /// Writes the export document into `dir` under the conventional name.
    pub fn export_to_dir(store: &RecordStore, dir: &Path) -> Result<PathBuf> {
        ensure_dir(dir)?;
        let document = store.export_document();
        let json = serde_json::to_string_pretty(&document)?;
        let path = dir.join(Self::export_file_name(document.export_date.date_naive()));
        write_atomic(&path, &json)?;
        info!(
            path = %path.display(),
            payments = document.payments.len(),
            handed_over = document.handed_over_amounts.len(),
            "data exported"
        );
        Ok(path)
    }

    /// Decodes an exchange file. Only a `payments` array is required;
    /// `handedOverAmounts` may be absent or null and other fields are ignored.
    pub fn parse_import(text: &str) -> Result<ImportBundle> {
        let root: Value = serde_json::from_str(text).map_err(|_| invalid(INVALID_FORMAT))?;
        let Value::Object(mut fields) = root else {
            return Err(invalid(INVALID_FORMAT).into());
        };

        let payments = match fields.remove(PAYMENTS_KEY) {
            Some(value @ Value::Array(_)) => decode_records::<Payment>(value, "payment")?,
            _ => return Err(invalid(INVALID_FORMAT).into()),
        };
        let handed_over_amounts = match fields.remove(HANDED_OVER_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(value @ Value::Array(_)) => {
                decode_records::<HandedOverEntry>(value, "handed-over amount")?
            }
            Some(_) => return Err(invalid(INVALID_FORMAT).into()),
        };

        Ok(ImportBundle {
            payments,
            handed_over_amounts,
        })
    }

    /// Appends the bundle to the existing data; nothing is replaced or deduplicated.
    pub fn apply_import(store: &RecordStore, bundle: ImportBundle) -> Result<ImportSummary> {
        let summary = ImportSummary {
            payments: bundle.payments.len(),
            handed_over: bundle.handed_over_amounts.len(),
        };
        if !bundle.payments.is_empty() {
            store.add_multiple_payments(bundle.payments)?;
        }
        if !bundle.handed_over_amounts.is_empty() {
            store.add_multiple_handed_over_amounts(bundle.handed_over_amounts)?;
        }
        info!(
            payments = summary.payments,
            handed_over = summary.handed_over,
            "data imported"
        );
        Ok(summary)
    }

    pub fn read_import(path: &Path) -> Result<ImportBundle> {
        let text = fs::read_to_string(path)?;
        Self::parse_import(&text)
    }

    pub fn import_from_path(store: &RecordStore, path: &Path) -> Result<ImportSummary> {
        let bundle = Self::read_import(path)?;
        Self::apply_import(store, bundle)
    }
}

fn invalid(message: &str) -> ValidationError {
    ValidationError::Import(message.to_string())
}

fn decode_records<T: serde::de::DeserializeOwned>(value: Value, label: &str) -> Result<Vec<T>> {
    let Value::Array(items) = value else {
        return Err(invalid(INVALID_FORMAT).into());
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|err| {
                RepayError::from(ValidationError::Import(format!(
                    "{label} #{} is malformed: {err}",
                    index + 1
                )))
            })
        })
        .collect()
}
