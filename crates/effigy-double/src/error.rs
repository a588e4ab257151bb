//! Error types for synthesis and query operations.
//!
//! Construction-time misuse fails fast and loudly, so a misconfigured
//! double fails the test setup rather than silently degrading. Failures
//! raised while *invoking* a double are `CallFailure` instead, carried
//! through `Collaborator::invoke` untouched.

use effigy_contract::ContractId;

/// Errors raised synchronously at construction or query time.
#[derive(Debug, thiserror::Error)]
pub enum DoubleError {
    /// Caller misuse: zero contracts, a behavior map in a contract
    /// position, a non-sequence argument pattern, deriving from a spy.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A behavior entry the contract cannot honor.
    #[error("unsupported configuration for {contract}: operation {operation} is not declared")]
    UnsupportedConfiguration {
        contract: ContractId,
        operation: String,
    },
}
