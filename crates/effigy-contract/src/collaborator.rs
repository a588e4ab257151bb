//! The protocol live collaborators speak.
//!
//! A collaborator is anything a double can stand in for: it declares which
//! contracts it claims to satisfy and accepts dynamic invocations. Doubles
//! implement this trait themselves, so a double wrapping another double is
//! plain composition, and the delegate reaches the synthesized object
//! through an ordinary reference rather than any ambient binding.

use crate::descriptor::{ContractId, OperationId};
use serde_json::Value;
use thiserror::Error;

/// A dispatch-time failure.
///
/// Raised by a configured failure sentinel or by a real delegate. Spies
/// propagate these to the caller unchanged, never caught or wrapped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallFailure {
    /// A failure of `kind`, constructed with the given arguments.
    #[error("{kind} raised with args {args:?}")]
    Raised { kind: String, args: Vec<Value> },

    /// The operation is not reified by this collaborator.
    #[error("unknown operation: {0}")]
    UnknownOperation(OperationId),

    /// The call's arity is not among the operation's declared arities.
    /// Arities count the implicit receiver; `got` does not.
    #[error("arity mismatch for {operation}: got {got} arguments, declared arities {declared:?}")]
    ArityMismatch {
        operation: OperationId,
        got: usize,
        declared: Vec<usize>,
    },
}

impl CallFailure {
    /// A `Raised` failure with no constructor arguments.
    pub fn raised(kind: impl Into<String>) -> Self {
        Self::Raised {
            kind: kind.into(),
            args: vec![],
        }
    }
}

/// Dynamic invocation protocol.
///
/// `declared_contracts` is the capability set the host runtime reports for
/// this object; the registry resolves it back to descriptors best-effort.
/// `invoke` receives receiver-excluded arguments: the receiver is the
/// collaborator itself.
pub trait Collaborator: Send + Sync {
    /// The capability set this object claims to satisfy.
    fn declared_contracts(&self) -> Vec<ContractId>;

    /// Invoke one operation with receiver-excluded arguments.
    fn invoke(&self, operation: &OperationId, args: &[Value]) -> Result<Value, CallFailure>;
}
