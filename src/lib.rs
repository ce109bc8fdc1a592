#![doc(test(attr(deny(warnings))))]

//! Tenant Ledger tracks rent and utility-bill charges per tenant and period, derives
//! carried-forward statements, and keeps a cached outstanding balance reconciled.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod quotation;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use config::{ConfigManager, LedgerConfig};
pub use errors::LedgerError;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter and emits a startup info log.
pub fn init() {
    init_with(&LedgerConfig::default());
}

/// Initializes global tracing using the configured log filter.
pub fn init_with(config: &LedgerConfig) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(&config.log_filter);
        tracing::info!("Tenant Ledger tracing initialized.");
    });
}
