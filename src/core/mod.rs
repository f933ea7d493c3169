//! Services and view state layered over the record store.

pub mod collation;
pub mod services;
pub mod utils;
pub mod view_state;

pub use view_state::PaymentsView;
