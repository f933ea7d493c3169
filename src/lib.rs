#![doc(test(attr(deny(warnings))))]

//! RePay Core tracks payments made on someone's behalf and the money handed
//! back against them, persisted through a pluggable key-value store.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod format;
pub mod storage;
pub mod time;
pub mod utils;

pub use errors::{RepayError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("RePay Core tracing initialized.");
    });
}
