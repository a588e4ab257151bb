//! The synthesized test object and its dispatch.
//!
//! A double reifies every operation of every contract it was built with,
//! plus the bookkeeping surface: its call log, its behavior tables, and
//! (for spies and mocks) the proxied delegate. Doubles are created
//! atomically by one synthesis call and are immutable afterwards; deriving
//! a reconfigured double always yields a new object.
//!
//! Dispatch consults the contract descriptors first: an operation no
//! reified contract declares, or a call at an undeclared arity, fails
//! before any recording or delegation happens.

use crate::behavior::BehaviorMap;
use crate::call_log::{CallLog, call_log_json};
use effigy_contract::{
    CallFailure, Collaborator, ContractDescriptor, ContractId, OperationId, OperationSignature,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

/// Instance identity of one synthesized double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DoubleId(Uuid);

impl DoubleId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DoubleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which dispatch a double performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoubleKind {
    /// Records calls, then delegates to a real implementation.
    Spy,

    /// Answers from configured behaviors; records nothing.
    Stub,

    /// A spy whose delegate is a stub: records and answers.
    Mock,
}

impl DoubleKind {
    /// Whether dispatch appends to the call log.
    pub fn records_calls(&self) -> bool {
        matches!(self, DoubleKind::Spy | DoubleKind::Mock)
    }

    /// Whether the double carries configured behavior tables.
    pub fn has_behaviors(&self) -> bool {
        matches!(self, DoubleKind::Stub | DoubleKind::Mock)
    }
}

impl fmt::Display for DoubleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DoubleKind::Spy => "spy",
            DoubleKind::Stub => "stub",
            DoubleKind::Mock => "mock",
        };
        write!(f, "{label}")
    }
}

/// A synthesized test substitute.
///
/// Exclusively owns its call log and behavior tables; holds a reference
/// to (never owns) any proxied delegate.
pub struct Double {
    id: DoubleId,
    kind: DoubleKind,
    contracts: Vec<ContractDescriptor>,
    behaviors: BTreeMap<ContractId, BehaviorMap>,
    target: Option<Arc<dyn Collaborator>>,
    log: Mutex<CallLog>,
}

impl Double {
    pub(crate) fn assemble(
        kind: DoubleKind,
        contracts: Vec<ContractDescriptor>,
        behaviors: BTreeMap<ContractId, BehaviorMap>,
        target: Option<Arc<dyn Collaborator>>,
    ) -> Self {
        Self {
            id: DoubleId::fresh(),
            kind,
            contracts,
            behaviors,
            target,
            log: Mutex::new(CallLog::new()),
        }
    }

    pub fn id(&self) -> DoubleId {
        self.id
    }

    pub fn kind(&self) -> DoubleKind {
        self.kind
    }

    /// The contracts this double reifies.
    pub fn contracts(&self) -> &[ContractDescriptor] {
        &self.contracts
    }

    /// Whether this double records calls (spy or mock).
    pub fn is_spy_double(&self) -> bool {
        self.kind.records_calls()
    }

    /// Whether this double answers from behavior tables (stub or mock).
    pub fn is_stub_double(&self) -> bool {
        self.kind.has_behaviors()
    }

    /// Snapshot of the call log, cloned out from under the lock.
    pub fn calls(&self) -> CallLog {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The proxied delegate, for spies and mocks.
    pub fn proxied_target(&self) -> Option<Arc<dyn Collaborator>> {
        self.target.clone()
    }

    /// Normalized (contract, behavior table) pairs, for stubs and mocks.
    pub fn all_behaviors(&self) -> Vec<(ContractId, BehaviorMap)> {
        self.behaviors
            .iter()
            .map(|(contract, table)| (contract.clone(), table.clone()))
            .collect()
    }

    pub(crate) fn behavior_tables(&self) -> &BTreeMap<ContractId, BehaviorMap> {
        &self.behaviors
    }

    /// Resolve a bare operation name across this double's contracts.
    ///
    /// Contracts are scanned in reification order; the first declaring
    /// contract wins, so the result is deterministic even when several
    /// contracts declare the name.
    pub fn operation(&self, name: &str) -> Option<OperationId> {
        self.contracts
            .iter()
            .find_map(|descriptor| descriptor.operation_id(name))
    }

    fn signature(&self, operation: &OperationId) -> Option<&OperationSignature> {
        self.contracts
            .iter()
            .find(|descriptor| descriptor.id == operation.contract)
            .and_then(|descriptor| descriptor.operation(&operation.name))
    }

    fn dispatch(&self, operation: &OperationId, args: &[Value]) -> Result<Value, CallFailure> {
        let signature = self
            .signature(operation)
            .ok_or_else(|| CallFailure::UnknownOperation(operation.clone()))?;
        if !signature.accepts_call(args.len()) {
            return Err(CallFailure::ArityMismatch {
                operation: operation.clone(),
                got: args.len(),
                declared: signature.arities(),
            });
        }

        // Recording happens-before delegation: a reentrant log read from
        // inside the delegate sees this call already present. The lock is
        // released before delegating.
        if self.kind.records_calls() {
            self.log
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record(operation.clone(), args.to_vec());
        }

        match &self.target {
            Some(target) => target.invoke(operation, args),
            None => self.respond(operation, args),
        }
    }

    fn respond(&self, operation: &OperationId, args: &[Value]) -> Result<Value, CallFailure> {
        match self
            .behaviors
            .get(&operation.contract)
            .and_then(|table| table.get(&operation.name))
        {
            Some(behavior) => behavior.respond(args),
            None => Ok(Value::Null),
        }
    }

    /// Versioned JSON introspection surface for one double.
    pub fn snapshot_json(&self) -> Value {
        let behaviors: BTreeMap<String, BTreeMap<&String, &'static str>> = self
            .behaviors
            .iter()
            .map(|(contract, table)| {
                (
                    contract.to_string(),
                    table
                        .iter()
                        .map(|(name, behavior)| (name, behavior.kind_label()))
                        .collect(),
                )
            })
            .collect();
        json!({
            "schema": 1,
            "doubleKind": "effigy.double.v1",
            "id": self.id.to_string(),
            "kind": self.kind,
            "contracts": self
                .contracts
                .iter()
                .map(|descriptor| descriptor.id.to_string())
                .collect::<Vec<_>>(),
            "behaviors": behaviors,
            "callLog": call_log_json(&self.calls()),
        })
    }
}

impl Collaborator for Double {
    fn declared_contracts(&self) -> Vec<ContractId> {
        self.contracts
            .iter()
            .map(|descriptor| descriptor.id.clone())
            .collect()
    }

    fn invoke(&self, operation: &OperationId, args: &[Value]) -> Result<Value, CallFailure> {
        self.dispatch(operation, args)
    }
}

impl fmt::Debug for Double {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Double")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("contracts", &self.declared_contracts())
            .field("recorded", &self.calls().total())
            .finish()
    }
}
