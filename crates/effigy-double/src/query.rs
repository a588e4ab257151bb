//! Call-count queries over a double's recorded log.
//!
//! The query layer reads, never mutates: it returns counts and booleans
//! and leaves pass/fail reporting to the adapter. Argument filters are
//! ordered sequences of patterns applied elementwise to each logged
//! tuple.

use crate::double::Double;
use crate::error::DoubleError;
use effigy_contract::OperationId;
use effigy_match::{Pattern, matches_all};

/// Number of logged invocations of `operation`, optionally filtered by an
/// ordered argument pattern.
///
/// A supplied pattern must be [`Pattern::Seq`]; any other pattern kind is
/// caller misuse. An operation that was never invoked counts zero.
pub fn call_count(
    double: &Double,
    operation: &OperationId,
    pattern: Option<&Pattern>,
) -> Result<usize, DoubleError> {
    let log = double.calls();
    let tuples = log.tuples(operation);
    match pattern {
        None => Ok(tuples.len()),
        Some(Pattern::Seq(patterns)) => Ok(tuples
            .iter()
            .filter(|tuple| matches_all(patterns, tuple.as_slice()))
            .count()),
        Some(other) => Err(DoubleError::InvalidArgument(format!(
            "argument pattern must be an ordered sequence, got {other:?}"
        ))),
    }
}

/// Whether `operation` was invoked at least once, optionally with a
/// matching argument tuple. Presence only; no upper bound is checked.
pub fn received(
    double: &Double,
    operation: &OperationId,
    pattern: Option<&Pattern>,
) -> Result<bool, DoubleError> {
    Ok(call_count(double, operation, pattern)? >= 1)
}
