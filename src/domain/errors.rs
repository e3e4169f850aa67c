//! Domain errors for the budget report flow.

use thiserror::Error;

/// Substring of the vendor `faultcode` meaning another request is running
pub const BUSY_FAULT_CODE: &str = "8020";

/// Errors raised while asking the financial API for a budget report
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FinanceApiError {
    /// The account already has a request in flight (vendor fault 8020)
    #[error("another request is in progress ({fault_code}): {fault_string}")]
    Busy {
        fault_code: String,
        fault_string: String,
    },

    /// Any HTTP status other than 200
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Connection, TLS or timeout failure before a response arrived
    #[error("transport error: {0}")]
    Transport(String),

    /// A 200 response whose body is not the expected JSON
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The HTTP client could not be constructed
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl FinanceApiError {
    /// Only the busy fault is worth another attempt
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Failures reported to the user and answered with an empty table.
    /// Everything else propagates to the caller.
    pub const fn is_reportable(&self) -> bool {
        matches!(self, Self::Busy { .. } | Self::HttpStatus { .. })
    }

    /// Build a busy error when `fault_code` carries the busy marker
    pub fn busy_from_fault(fault_code: &str, fault_string: &str) -> Option<Self> {
        fault_code.contains(BUSY_FAULT_CODE).then(|| Self::Busy {
            fault_code: fault_code.to_string(),
            fault_string: fault_string.to_string(),
        })
    }
}
