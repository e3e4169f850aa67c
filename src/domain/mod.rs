//! Domain layer for the budget dashboard
//!
//! This module contains the report data model, credential records and the
//! ports the report fetcher depends on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::FinanceApiError;
