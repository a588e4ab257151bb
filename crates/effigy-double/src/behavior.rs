//! Configured responses for stubbed operations.
//!
//! Literals are data (`serde_json::Value`), so a callable can never occupy
//! a value position: logic must be wrapped in [`Behavior::Invoke`]
//! explicitly, and failures in [`Behavior::Raise`] via [`throws`]. This is
//! the wrapping choice that removes the "return this function object" vs
//! "invoke this function" ambiguity.

use effigy_contract::CallFailure;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handler form: logic invoked with the call's non-receiver arguments.
pub type Handler = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A failure sentinel: raise this kind, constructed with these arguments,
/// on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureSpec {
    pub kind: String,
    pub args: Vec<Value>,
}

/// One operation's configured response.
///
/// All non-`Invoke`, non-`Raise` responses are idempotent and
/// argument-independent.
#[derive(Clone, Default)]
pub enum Behavior {
    /// Return the empty value, ignoring arguments. The default for every
    /// operation with no entry.
    #[default]
    Empty,

    /// Return this literal verbatim on every call.
    Value(Value),

    /// Invoke this handler with the call arguments and return its result.
    Invoke(Handler),

    /// Raise the configured failure on every call.
    Raise(FailureSpec),
}

impl Behavior {
    /// Wrap logic as a configured response.
    pub fn invoke(handler: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self::Invoke(Arc::new(handler))
    }

    /// The response for one invocation.
    pub(crate) fn respond(&self, args: &[Value]) -> Result<Value, CallFailure> {
        match self {
            Behavior::Empty => Ok(Value::Null),
            Behavior::Value(value) => Ok(value.clone()),
            Behavior::Invoke(handler) => Ok(handler(args)),
            Behavior::Raise(spec) => Err(CallFailure::Raised {
                kind: spec.kind.clone(),
                args: spec.args.clone(),
            }),
        }
    }

    /// Short tag for snapshots and reports.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Behavior::Empty => "empty",
            Behavior::Value(_) => "value",
            Behavior::Invoke(_) => "invoke",
            Behavior::Raise(_) => "raise",
        }
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Behavior::Empty => write!(f, "Empty"),
            Behavior::Value(value) => write!(f, "Value({value})"),
            Behavior::Invoke(_) => write!(f, "Invoke(..)"),
            Behavior::Raise(spec) => write!(f, "Raise({spec:?})"),
        }
    }
}

impl From<Value> for Behavior {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Configure an operation to raise a failure of `kind` constructed with
/// the given arguments, every time it is invoked.
pub fn throws(kind: impl Into<String>, args: Vec<Value>) -> Behavior {
    Behavior::Raise(FailureSpec {
        kind: kind.into(),
        args,
    })
}

/// Operation name -> configured response, for one contract.
pub type BehaviorMap = BTreeMap<String, Behavior>;

/// Build a behavior map from (operation, behavior) pairs.
pub fn behaviors<K: Into<String>>(entries: impl IntoIterator<Item = (K, Behavior)>) -> BehaviorMap {
    entries
        .into_iter()
        .map(|(name, behavior)| (name.into(), behavior))
        .collect()
}
