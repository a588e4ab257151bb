//! # Effigy contracts
//!
//! Contract metadata and reflection: the normalized descriptors the double
//! synthesizer consumes, and the protocol live collaborators speak.
//!
//! ## Architecture
//!
//! ```text
//! ContractId / OperationId   ← explicit, contract-qualified identity
//!     │
//! OperationSignature         ← name + parameter lists (receiver first)
//!     │
//! ContractDescriptor         ← one contract's validated operation set
//!     │
//! ContractRegistry           ← descriptors known to the test process
//!     │
//! Collaborator               ← dynamic invocation protocol for targets
//! ```
//!
//! This crate is **double-agnostic**: it does not know whether an object
//! is real or synthesized, only how its capability set is described and
//! invoked.

pub mod collaborator;
pub mod descriptor;
pub mod registry;

pub use collaborator::{CallFailure, Collaborator};
pub use descriptor::{
    ContractDescriptor, ContractError, ContractId, FlatSignature, OperationId, OperationSignature,
};
pub use registry::ContractRegistry;
