//! # Effigy doubles
//!
//! The synthesis engine: given contract descriptors plus optional behavior
//! maps, construct substitute implementations for unit tests.
//!
//! ## Architecture
//!
//! ```text
//! Behavior / BehaviorMap    ← configured responses per operation
//!     │
//! CallLog                   ← per-double record of invocations
//!     │
//! Double                    ← the synthesized object (spy / stub / mock)
//!     │
//! spy · stub · mock         ← construction surface
//!     │
//! call_count · received     ← query surface over the call log
//! ```
//!
//! Three kinds of double, all implementing the same dynamic
//! [`Collaborator`](effigy_contract::Collaborator) protocol as the real
//! thing they stand in for:
//!
//! - a **spy** records every call, then delegates to a real
//!   implementation;
//! - a **stub** answers from configured behaviors, defaulting to the
//!   empty value;
//! - a **mock** is a spy wrapped around a stub, so it records *and*
//!   answers.
//!
//! Doubles are immutable once synthesized. Reconfiguring one
//! ([`returning`]) derives a new double and leaves the original — and its
//! call history — untouched.

pub mod behavior;
pub mod call_log;
pub mod double;
pub mod error;
pub mod query;
pub mod synth;

pub use behavior::{Behavior, BehaviorMap, FailureSpec, Handler, behaviors, throws};
pub use call_log::{CallLog, call_log_json};
pub use double::{Double, DoubleId, DoubleKind};
pub use error::DoubleError;
pub use query::{call_count, received};
pub use synth::{StubArg, mock, mock_of, returning, spy, spy_on, stub, stub_of};
