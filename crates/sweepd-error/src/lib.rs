//! # sweepd Error
//!
//! Error types shared by every sweepd crate.
//!
//! ## Example
//!
//! ```
//! use sweepd_error::{SweepError, Result};
//!
//! fn require_timeout(seconds: u64) -> Result<()> {
//!     if seconds == 0 {
//!         return Err(SweepError::ConfigError("timeout must be positive".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use thiserror::Error;

/// The error type for every scan and sweep operation.
#[derive(Error, Debug)]
pub enum SweepError {
    // ============ Key Errors ============
    /// Invalid private key. The key material itself is never included.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    // ============ Contract Errors ============
    /// An `eth_call` against a token contract failed or reverted
    #[error("Contract call {method} on {contract} failed: {reason}")]
    ContractCall {
        /// Contract address
        contract: String,
        /// Contract method, e.g. `symbol`
        method: &'static str,
        /// Error reason
        reason: String,
    },

    /// Return data or log data could not be decoded
    #[error("ABI error: {0}")]
    AbiError(String),

    // ============ Network Errors ============
    /// RPC connection could not be established
    #[error("RPC connection failed: {url} - {reason}")]
    RpcConnectionError {
        /// RPC URL
        url: String,
        /// Error reason
        reason: String,
    },

    /// RPC request failed
    #[error("RPC request failed: {method} - {reason}")]
    RpcRequestError {
        /// RPC method name
        method: &'static str,
        /// Error reason
        reason: String,
    },

    /// A call did not complete within the configured timeout
    #[error("{operation} timed out after {seconds}s")]
    Timeout {
        /// What was being awaited
        operation: String,
        /// Timeout duration
        seconds: u64,
    },

    /// The transaction history API returned an error
    #[error("History API error: {0}")]
    HistoryError(String),

    // ============ Transaction Errors ============
    /// Transaction signing failed
    #[error("Failed to sign transaction: {0}")]
    SigningError(String),

    /// Node rejected the raw transaction
    #[error("Failed to broadcast transaction: {0}")]
    BroadcastError(String),

    // ============ Generic ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Unknown/other error
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using [`SweepError`]
pub type Result<T> = std::result::Result<T, SweepError>;

impl From<hex::FromHexError> for SweepError {
    fn from(err: hex::FromHexError) -> Self {
        SweepError::InvalidPrivateKey(err.to_string())
    }
}

impl SweepError {
    /// Returns true for failures that may succeed if attempted again later.
    ///
    /// Used for log output only; nothing retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SweepError::Timeout { .. } | SweepError::RpcConnectionError { .. }
        )
    }

    /// Shorthand for an [`SweepError::RpcRequestError`]
    pub fn rpc(method: &'static str, reason: impl ToString) -> Self {
        SweepError::RpcRequestError {
            method,
            reason: reason.to_string(),
        }
    }
}
