//! Read-through view state for the payments list and summary.
//!
//! The view never mutates its snapshot directly: every action goes through
//! a service and, once that succeeds, the snapshot is re-read from the store.

use std::sync::Arc;

use crate::core::services::{
    HandoverService, ImportBundle, ImportSummary, PaymentFilters, PaymentService, SortField,
    SortOrder, Summary, SummaryService, TransferService,
};
use crate::domain::{HandedOverEntry, Payment, PaymentDraft};
use crate::errors::Result;
use crate::storage::RecordStore;

pub struct PaymentsView {
    store: Arc<RecordStore>,
    filters: PaymentFilters,
    payments: Vec<Payment>,
    handed_over: Vec<HandedOverEntry>,
    total_handed_over: f64,
}

impl PaymentsView {
    /// Creates the view and loads the first snapshot.
    pub fn new(store: Arc<RecordStore>, filters: PaymentFilters) -> Self {
        let mut view = Self {
            store,
            filters,
            payments: Vec::new(),
            handed_over: Vec::new(),
            total_handed_over: 0.0,
        };
        view.refresh();
        view
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn filters(&self) -> &PaymentFilters {
        &self.filters
    }

    /// Re-reads both collections. Read failures degrade to empty lists.
    pub fn refresh(&mut self) {
        self.payments = self.store.get_payments();
        self.handed_over = self.store.get_handed_over_amounts();
        self.total_handed_over = self.handed_over.iter().map(|entry| entry.amount).sum();
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn handed_over(&self) -> &[HandedOverEntry] {
        &self.handed_over
    }

    pub fn total_handed_over(&self) -> f64 {
        self.total_handed_over
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filters.query = query.into();
    }

    pub fn set_sort(&mut self, sort_by: SortField, order: Option<SortOrder>) {
        self.filters.sort_by = sort_by;
        if let Some(order) = order {
            self.filters.order = order;
        }
    }

    pub fn toggle_order(&mut self) {
        self.filters.toggle_order();
    }

    /// Snapshot rows after the current search and sort.
    pub fn visible(&self) -> Vec<Payment> {
        self.filters.apply(&self.payments)
    }

    /// Sum of the rows currently listed.
    pub fn visible_total(&self) -> f64 {
        SummaryService::total_of(&self.visible())
    }

    /// Totals over every payment, ignoring the search query.
    pub fn summary(&self) -> Summary {
        SummaryService::summarize(&self.payments, self.total_handed_over)
    }

    pub fn find(&self, id_or_prefix: &str) -> Result<Payment> {
        PaymentService::find(&self.store, id_or_prefix)
    }

    pub fn add_payment(&mut self, draft: &PaymentDraft) -> Result<Payment> {
        let payment = PaymentService::add(&self.store, draft)?;
        self.refresh();
        Ok(payment)
    }

    pub fn edit_payment(&mut self, existing: &Payment, draft: &PaymentDraft) -> Result<Payment> {
        let payment = PaymentService::edit(&self.store, existing, draft)?;
        self.refresh();
        Ok(payment)
    }

    pub fn delete_payment(&mut self, id: &str) -> Result<bool> {
        let removed = PaymentService::delete(&self.store, id)?;
        self.refresh();
        Ok(removed)
    }

    pub fn add_handed_over(&mut self, amount: &str, notes: Option<&str>) -> Result<HandedOverEntry> {
        let entry = HandoverService::add(&self.store, amount, notes)?;
        self.refresh();
        Ok(entry)
    }

    pub fn set_total_handed_over(&mut self, amount: &str) -> Result<HandedOverEntry> {
        let entry = HandoverService::set_total(&self.store, amount)?;
        self.refresh();
        Ok(entry)
    }

    pub fn import(&mut self, bundle: ImportBundle) -> Result<ImportSummary> {
        let summary = TransferService::apply_import(&self.store, bundle)?;
        self.refresh();
        Ok(summary)
    }

    pub fn clear_all(&mut self) -> Result<()> {
        self.store.clear_all_data()?;
        self.refresh();
        Ok(())
    }
}
