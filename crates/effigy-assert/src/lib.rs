//! Test-framework adapter.
//!
//! The core only returns counts and booleans; this crate turns them into
//! pass/fail reports. A failed check renders the actual logged tuples for
//! the operation, so the assertion message shows what the double really
//! received. Counting and matching stay in the core — this layer only
//! evaluates and renders.

use effigy_contract::OperationId;
use effigy_double::{Double, DoubleError, call_count};
use effigy_match::Pattern;
use serde::Serialize;
use serde_json::{Value, json};

/// Outcome of one `received` check against a double.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedReport {
    /// Whether the operation was received at least once (matching the
    /// pattern, when one was given).
    pub passed: bool,

    /// Instance identity of the checked double.
    pub double_id: String,

    /// The checked operation, contract-qualified.
    pub operation: String,

    /// Rendering of the argument pattern, when one was given.
    pub pattern: Option<String>,

    /// Number of logged invocations that satisfied the check.
    pub matched: usize,

    /// Every logged argument tuple for the operation, in call order.
    pub recorded: Vec<Vec<Value>>,
}

impl ReceivedReport {
    /// Human-readable pass/fail line, with the recorded calls on failure.
    pub fn message(&self) -> String {
        let check = match &self.pattern {
            Some(pattern) => format!("{} with {}", self.operation, pattern),
            None => self.operation.clone(),
        };
        if self.passed {
            format!("received {check} ({} matching call(s))", self.matched)
        } else if self.recorded.is_empty() {
            format!("not received: {check}; no calls were recorded for this operation")
        } else {
            let calls: Vec<String> = self
                .recorded
                .iter()
                .map(|tuple| Value::Array(tuple.clone()).to_string())
                .collect();
            format!(
                "not received: {check}; recorded calls: {}",
                calls.join(", ")
            )
        }
    }
}

/// Versioned JSON surface for a received-check report.
pub fn report_json(report: &ReceivedReport) -> Value {
    json!({
        "schema": 1,
        "reportKind": "effigy.received_report.v1",
        "report": report,
    })
}

/// Evaluate a `received` check and build its report.
///
/// Caller misuse (a non-sequence pattern) is still an error here — the
/// adapter reports on outcomes, it does not paper over bad queries.
pub fn verify_received(
    double: &Double,
    operation: &OperationId,
    pattern: Option<&Pattern>,
) -> Result<ReceivedReport, DoubleError> {
    let matched = call_count(double, operation, pattern)?;
    let recorded = double.calls().tuples(operation).to_vec();
    Ok(ReceivedReport {
        passed: matched >= 1,
        double_id: double.id().to_string(),
        operation: operation.to_string(),
        pattern: pattern.map(|p| format!("{p:?}")),
        matched,
        recorded,
    })
}

/// Assert that a double received an operation, panicking with the report
/// message otherwise.
///
/// The three-argument form takes an `Option<&Pattern>` argument filter.
#[macro_export]
macro_rules! assert_received {
    ($double:expr, $operation:expr) => {
        $crate::assert_received!($double, $operation, ::core::option::Option::None)
    };
    ($double:expr, $operation:expr, $pattern:expr) => {{
        let report = $crate::verify_received($double, $operation, $pattern)
            .unwrap_or_else(|err| panic!("received check could not run: {err}"));
        assert!(report.passed, "{}", report.message());
    }};
}
