#![doc(test(attr(deny(warnings))))]

//! Finance Core records income and expense transactions, monthly category budgets and
//! savings goals, and derives balances, budget utilization and trend reports from them.
//!
//! Records live in a [`storage::LedgerStore`] (in memory or SQLite); every report in
//! [`core::services`] works against the read-only [`storage::LedgerReader`] view.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}
