use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RepayError>;

/// Error type covering every failure surfaced by the record store and services.
#[derive(Debug, Error)]
pub enum RepayError {
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepayError {
    pub fn is_validation(&self) -> bool {
        matches!(self, RepayError::Validation(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, RepayError::Storage(_))
    }
}

/// Failures raised by a key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid key `{0}`")]
    InvalidKey(String),
    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
    #[error("{0}")]
    Unavailable(String),
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{}", join_fields(.0))]
    Fields(Vec<FieldError>),
    #[error("{0}")]
    Import(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
}

impl ValidationError {
    /// Returns the message attached to `field`, if that field was rejected.
    pub fn field(&self, field: &str) -> Option<&str> {
        match self {
            ValidationError::Fields(errors) => errors
                .iter()
                .find(|error| error.field == field)
                .map(|error| error.message.as_str()),
            _ => None,
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_render_joined() {
        let err = ValidationError::Fields(vec![
            FieldError::new("merchant", "merchant is required"),
            FieldError::new("price", "enter a valid price"),
        ]);
        assert_eq!(
            err.to_string(),
            "merchant: merchant is required; price: enter a valid price"
        );
        assert_eq!(err.field("price"), Some("enter a valid price"));
        assert_eq!(err.field("date"), None);
    }

    #[test]
    fn storage_errors_wrap_into_repay_error() {
        let err: RepayError = StorageError::Unavailable("offline".into()).into();
        assert!(err.is_storage());
        assert_eq!(err.to_string(), "Storage failure: offline");
    }
}
