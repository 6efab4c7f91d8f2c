//! Interactive and scripted shell over the ledger services.

pub mod commands;
pub mod core;
mod help;
pub mod output;
mod shell;
mod shell_context;
pub mod table;

pub use shell::{run_cli, SCRIPT_ENV};
