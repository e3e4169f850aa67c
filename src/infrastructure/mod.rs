//! Infrastructure layer module
//!
//! This module contains the adapters behind the domain ports:
//! - Financial API HTTP client
//! - Retry policy
//! - Configuration management
//! - Logging infrastructure
//! - Credentials resolution

pub mod config;
pub mod credentials;
pub mod finance_api;
pub mod logging;
pub mod retry;
