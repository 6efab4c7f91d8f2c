//! Storage-agnostic aggregation and reporting rules.

pub mod aggregation;
pub mod filter;
pub mod services;
pub mod time;
