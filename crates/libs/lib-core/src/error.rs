//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used consistently
//! across the wallet gateway, the record client, and the submission controller.
//!
//! ## Error Categories
//!
//! 1. **Session Errors** - wallet presence and consent
//!    - [`NoWalletFound`](AppError::NoWalletFound)
//!    - [`UserRejected`](AppError::UserRejected)
//!    - [`NoSession`](AppError::NoSession)
//!
//! 2. **Remote Errors** - ledger reads and writes
//!    - [`RecordNotFound`](AppError::RecordNotFound) (recoverable, maps to "uninitialized")
//!    - [`SubmissionFailed`](AppError::SubmissionFailed)
//!
//! 3. **Controller Errors** - rejected before any remote call
//!    - [`InvalidInput`](AppError::InvalidInput)
//!    - [`ActionUnavailable`](AppError::ActionUnavailable)
//!    - [`ActionInFlight`](AppError::ActionInFlight)
//!
//! 4. **Startup Errors**
//!    - [`Config`](AppError::Config) / [`Decoding`](AppError::Decoding)
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn require_address(addr: Option<&str>) -> Result<&str> {
//!     addr.ok_or(AppError::NoSession)
//! }
//!
//! assert!(matches!(require_address(None), Err(AppError::NoSession)));
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// No wallet-compatible object is injected in the host environment.
    #[error("No Solana wallet found. Install a Phantom-compatible wallet")]
    NoWalletFound,

    /// The wallet returned a rejection for an explicit connect request.
    #[error("Wallet rejected the request: {0}")]
    UserRejected(String),

    /// A state-changing operation was attempted without a wallet session.
    #[error("No wallet session")]
    NoSession,

    /// The record account does not exist or could not be decoded.
    ///
    /// Not surfaced to the user: the controller maps it to the
    /// `Uninitialized` state.
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Any remote failure: network, simulation, program rejection, signing.
    ///
    /// Carries the raw message reported by the remote side.
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// User input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested action is not offered in the controller's current state.
    #[error("Action not available: {0}")]
    ActionUnavailable(String),

    /// The same action is already outstanding.
    #[error("Action already in flight: {0}")]
    ActionInFlight(String),

    /// Configuration error during startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data decoding error (JSON, base58, base64, bincode).
    #[error("Decoding error: {0}")]
    Decoding(String),
}

impl AppError {
    /// Whether the error maps to a valid UI state rather than a failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::RecordNotFound(_))
    }

    /// Short stable code used by diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NoWalletFound => "NoWalletFound",
            AppError::UserRejected(_) => "UserRejected",
            AppError::NoSession => "NoSession",
            AppError::RecordNotFound(_) => "RecordNotFound",
            AppError::SubmissionFailed(_) => "SubmissionFailed",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::ActionUnavailable(_) => "ActionUnavailable",
            AppError::ActionInFlight(_) => "ActionInFlight",
            AppError::Config(_) => "Config",
            AppError::Decoding(_) => "Decoding",
        }
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_record_not_found_is_recoverable() {
        assert!(AppError::RecordNotFound("missing".to_string()).is_recoverable());
        assert!(!AppError::SubmissionFailed("boom".to_string()).is_recoverable());
        assert!(!AppError::NoSession.is_recoverable());
    }

    #[test]
    fn test_display_carries_raw_message() {
        let err = AppError::SubmissionFailed("insufficient funds".to_string());
        assert_eq!(err.to_string(), "Submission failed: insufficient funds");
        assert_eq!(err.code(), "SubmissionFailed");
    }

    #[test]
    fn test_json_error_maps_to_decoding() {
        let err: AppError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert!(matches!(err, AppError::Decoding(_)));
    }
}
