//! CLI command implementations.

pub mod check;
pub mod fetch;
pub mod sites;
