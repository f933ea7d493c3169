use uuid::Uuid;

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Generates a fresh identifier for a newly created record.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parses user-entered amounts. Accepts a decimal comma; rejects non-finite values.
pub fn parse_amount(input: &str) -> Option<f64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Trims free text and collapses blank input to `None`.
pub fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Sums the amounts of a slice of records.
pub fn sum_amounts<T: Amounted>(items: &[T]) -> f64 {
    items.iter().map(Amounted::amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_accepts_decimal_comma() {
        assert_eq!(parse_amount(" 12,50 "), Some(12.5));
        assert_eq!(parse_amount("7"), Some(7.0));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn normalize_notes_drops_blank_text() {
        assert_eq!(normalize_notes(Some("   ")), None);
        assert_eq!(normalize_notes(Some(" lunch ")), Some("lunch".into()));
        assert_eq!(normalize_notes(None), None);
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(new_record_id(), new_record_id());
    }
}
