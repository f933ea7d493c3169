//! Filtering, sorting and totals over a payments snapshot.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::collation::Collation;
use crate::domain::{common::sum_amounts, Payment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Merchant,
    Price,
}

impl SortField {
    pub fn label(self) -> &'static str {
        match self {
            SortField::Date => "Date",
            SortField::Merchant => "Merchant",
            SortField::Price => "Price",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "merchant" => Ok(SortField::Merchant),
            "price" => Ok(SortField::Price),
            other => Err(format!(
                "unknown sort field `{other}` (use date, merchant or price)"
            )),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order `{other}` (use asc or desc)")),
        }
    }
}

/// Search and sort settings of the payments list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilters {
    pub query: String,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub collation: Collation,
}

impl PaymentFilters {
    pub fn new(sort_by: SortField, order: SortOrder) -> Self {
        Self {
            query: String::new(),
            sort_by,
            order,
            collation: Collation::default(),
        }
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    pub fn toggle_order(&mut self) {
        self.order = self.order.toggled();
    }

    /// Short label such as `Date ↓`.
    pub fn sort_label(&self) -> String {
        format!("{} {}", self.sort_by.label(), self.order.arrow())
    }

    pub fn apply(&self, payments: &[Payment]) -> Vec<Payment> {
        SummaryService::filter_and_sort(
            payments,
            &self.query,
            self.sort_by,
            self.order,
            self.collation,
        )
    }
}

/// Totals displayed by the summary view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total_payments: f64,
    pub total_handed_over: f64,
    pub remaining: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Case-insensitive search over merchant and notes, followed by a stable sort.
    pub fn filter_and_sort(
        payments: &[Payment],
        query: &str,
        sort_by: SortField,
        order: SortOrder,
        collation: Collation,
    ) -> Vec<Payment> {
        let mut visible: Vec<Payment> = if query.trim().is_empty() {
            payments.to_vec()
        } else {
            let needle = query.to_lowercase();
            payments
                .iter()
                .filter(|payment| matches_query(payment, &needle))
                .cloned()
                .collect()
        };

        visible.sort_by(|a, b| {
            let ordering = compare(a, b, sort_by, collation);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        visible
    }

    pub fn total_of(payments: &[Payment]) -> f64 {
        sum_amounts(payments)
    }

    /// Outstanding amount; negative once more was handed over than spent.
    pub fn remaining(total_payments: f64, total_handed_over: f64) -> f64 {
        total_payments - total_handed_over
    }

    pub fn summarize(payments: &[Payment], total_handed_over: f64) -> Summary {
        let total_payments = Self::total_of(payments);
        Summary {
            total_payments,
            total_handed_over,
            remaining: Self::remaining(total_payments, total_handed_over),
        }
    }
}

fn matches_query(payment: &Payment, needle: &str) -> bool {
    payment.merchant.to_lowercase().contains(needle)
        || payment
            .notes
            .as_ref()
            .is_some_and(|notes| notes.to_lowercase().contains(needle))
}

fn compare(a: &Payment, b: &Payment, sort_by: SortField, collation: Collation) -> Ordering {
    match sort_by {
        // Unparseable dates order before every valid date.
        SortField::Date => a.calendar_date().cmp(&b.calendar_date()),
        SortField::Merchant => collation.compare(&a.merchant, &b.merchant),
        SortField::Price => a.price.total_cmp(&b.price),
    }
}
