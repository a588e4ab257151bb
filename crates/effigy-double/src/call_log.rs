//! Per-double record of invocations.
//!
//! The log maps contract-qualified operation identity to the ordered
//! argument tuples it was invoked with, receiver excluded. Insertion
//! order is call order. The log never shrinks; only the owning double's
//! dispatch appends to it.

use effigy_contract::OperationId;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Operation identity -> ordered argument tuples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallLog {
    entries: BTreeMap<OperationId, Vec<Vec<Value>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one invocation's argument tuple under its operation.
    pub fn record(&mut self, operation: OperationId, args: Vec<Value>) {
        self.entries.entry(operation).or_default().push(args);
    }

    /// The argument tuples logged for one operation, in call order.
    /// Empty when the operation was never invoked.
    pub fn tuples(&self, operation: &OperationId) -> &[Vec<Value>] {
        self.entries.get(operation).map_or(&[], |tuples| tuples.as_slice())
    }

    /// Number of logged invocations of one operation.
    pub fn count(&self, operation: &OperationId) -> usize {
        self.tuples(operation).len()
    }

    /// Total logged invocations across all operations.
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate (operation, tuples) pairs in operation order.
    pub fn iter(&self) -> impl Iterator<Item = (&OperationId, &Vec<Vec<Value>>)> {
        self.entries.iter()
    }
}

/// Versioned JSON surface for a call log.
pub fn call_log_json(log: &CallLog) -> Value {
    json!({
        "schema": 1,
        "logKind": "effigy.call_log.v1",
        "operations": log
            .iter()
            .map(|(operation, tuples)| json!({
                "operation": operation.to_string(),
                "calls": tuples,
            }))
            .collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use effigy_contract::ContractId;
    use serde_json::json;

    fn op(name: &str) -> OperationId {
        OperationId::new(ContractId::new("test", "Log"), name)
    }

    #[test]
    fn insertion_order_is_call_order() {
        let mut log = CallLog::new();
        log.record(op("bar"), vec![json!("first")]);
        log.record(op("bar"), vec![json!("second")]);
        assert_eq!(
            log.tuples(&op("bar")),
            &[vec![json!("first")], vec![json!("second")]]
        );
    }

    #[test]
    fn absent_operation_has_empty_tuples() {
        let log = CallLog::new();
        assert!(log.tuples(&op("never")).is_empty());
        assert_eq!(log.count(&op("never")), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn totals_span_operations() {
        let mut log = CallLog::new();
        log.record(op("a"), vec![]);
        log.record(op("b"), vec![json!(1)]);
        log.record(op("b"), vec![json!(2)]);
        assert_eq!(log.total(), 3);
        assert_eq!(log.count(&op("b")), 2);
    }

    #[test]
    fn json_surface_is_deterministic() {
        let mut log = CallLog::new();
        log.record(op("b"), vec![json!("x")]);
        log.record(op("a"), vec![]);

        let first = call_log_json(&log);
        let second = call_log_json(&log);
        assert_eq!(first, second);
        assert_eq!(
            first.get("logKind").and_then(Value::as_str),
            Some("effigy.call_log.v1")
        );
        // BTreeMap keying orders operations deterministically.
        let ops: Vec<_> = first["operations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["operation"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ops, vec!["test/Log::a", "test/Log::b"]);
    }
}
