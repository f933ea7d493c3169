pub mod handover_service;
pub mod payment_service;
pub mod summary_service;
pub mod transfer_service;

pub use handover_service::HandoverService;
pub use payment_service::PaymentService;
pub use summary_service::{PaymentFilters, SortField, SortOrder, Summary, SummaryService};
pub use transfer_service::{ImportBundle, ImportSummary, TransferService};
