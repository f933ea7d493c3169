pub mod common;
pub mod handed_over;
pub mod payment;

pub use common::Amounted;
pub use handed_over::{validate_amount, AmountRule, HandedOverEntry};
pub use payment::{Payment, PaymentDraft, ValidPayment};
