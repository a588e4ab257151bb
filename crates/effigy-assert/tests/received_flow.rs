//! End-to-end flows: synthesize doubles, drive them like real
//! collaborators, then assert on what they received.

use effigy_assert::{assert_received, verify_received};
use effigy_contract::{
    CallFailure, Collaborator, ContractDescriptor, ContractId, ContractRegistry, OperationId,
    OperationSignature,
};
use effigy_double::{
    Behavior, BehaviorMap, Double, behaviors, call_count, mock_of, received, returning, spy,
    spy_on, stub_of, throws,
};
use effigy_match::{ANYTHING, Pattern};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

fn db_client() -> ContractDescriptor {
    ContractDescriptor::new(
        ContractId::new("db.client", "DbClient"),
        vec![
            OperationSignature::new("select", &["sql"]),
            OperationSignature::new("ping", &[]),
        ],
    )
    .expect("descriptor should validate")
}

#[test]
fn mock_scenario_select_round_trip() {
    let subject = mock_of(
        db_client(),
        behaviors([("select", Behavior::Value(json!({"id": 1})))]),
    )
    .unwrap();
    let select = subject.operation("select").unwrap();

    assert!(!received(&subject, &select, None).unwrap());

    let result = subject.invoke(&select, &[json!("select * from users")]).unwrap();
    assert_eq!(result, json!({"id": 1}));

    assert!(received(&subject, &select, None).unwrap());
    let exact = Pattern::seq([Pattern::literal(json!("select * from users"))]);
    assert!(received(&subject, &select, Some(&exact)).unwrap());
    let other = Pattern::seq([Pattern::literal(json!("other"))]);
    assert!(!received(&subject, &select, Some(&other)).unwrap());

    assert_received!(&subject, &select);
    assert_received!(&subject, &select, Some(&exact));
}

#[test]
fn unstubbed_operations_answer_the_empty_value() {
    let subject = stub_of(db_client(), BehaviorMap::new()).unwrap();
    let select = subject.operation("select").unwrap();
    assert_eq!(subject.invoke(&select, &[json!("x")]).unwrap(), Value::Null);
}

#[test]
fn substring_vs_exact_counting() {
    let subject = mock_of(db_client(), BehaviorMap::new()).unwrap();
    let select = subject.operation("select").unwrap();
    subject.invoke(&select, &[json!("yes")]).unwrap();
    subject.invoke(&select, &[json!("yess")]).unwrap();
    subject.invoke(&select, &[json!("no")]).unwrap();

    let substring = Pattern::seq([Pattern::regex("yes").unwrap()]);
    assert_eq!(call_count(&subject, &select, Some(&substring)).unwrap(), 2);
    let exact = Pattern::seq([Pattern::literal(json!("yes"))]);
    assert_eq!(call_count(&subject, &select, Some(&exact)).unwrap(), 1);
}

#[test]
fn configured_failures_reach_the_assertion_layer() {
    let subject = mock_of(
        db_client(),
        behaviors([("select", throws("connection_lost", vec![json!("db-0")]))]),
    )
    .unwrap();
    let select = subject.operation("select").unwrap();

    let failure = subject.invoke(&select, &[json!("q")]).unwrap_err();
    assert_eq!(
        failure,
        CallFailure::Raised {
            kind: "connection_lost".into(),
            args: vec![json!("db-0")],
        }
    );
    // The failed call still counts as received.
    assert_received!(&subject, &select, Some(&Pattern::seq([ANYTHING])));
}

#[test]
fn returning_derives_without_touching_history() {
    let original = mock_of(
        db_client(),
        behaviors([("select", Behavior::Value(json!("v1")))]),
    )
    .unwrap();
    let select = original.operation("select").unwrap();
    original.invoke(&select, &[json!("q")]).unwrap();

    let contract = ContractId::new("db.client", "DbClient");
    let derived = returning(
        &original,
        &contract,
        behaviors([("select", Behavior::Value(json!("v2")))]),
    )
    .unwrap();

    assert_eq!(derived.invoke(&select, &[json!("q")]).unwrap(), json!("v2"));
    assert_eq!(original.invoke(&select, &[json!("q")]).unwrap(), json!("v1"));
    // History stayed with the original; the derivative started fresh.
    assert_eq!(call_count(&original, &select, None).unwrap(), 2);
    assert_eq!(call_count(&derived, &select, None).unwrap(), 1);
}

struct LiveDb;

impl Collaborator for LiveDb {
    fn declared_contracts(&self) -> Vec<ContractId> {
        vec![
            ContractId::new("db.client", "DbClient"),
            ContractId::new("host", "Builtin"),
        ]
    }

    fn invoke(&self, operation: &OperationId, args: &[Value]) -> Result<Value, CallFailure> {
        match operation.name.as_str() {
            "select" => Ok(json!({"ran": args[0]})),
            "ping" => Ok(json!("pong")),
            _ => Err(CallFailure::UnknownOperation(operation.clone())),
        }
    }
}

#[test]
fn spy_inference_drops_unrecognized_capabilities() {
    let registry = ContractRegistry::from_descriptors(vec![db_client()]);
    let subject = spy_on(&registry, Arc::new(LiveDb)).unwrap();

    // Only DbClient resolved; host/Builtin was silently dropped.
    assert_eq!(subject.contracts().len(), 1);

    let select = subject.operation("select").unwrap();
    assert_eq!(
        subject.invoke(&select, &[json!("q")]).unwrap(),
        json!({"ran": "q"})
    );
    assert_received!(&subject, &select);
}

#[test]
fn spy_inference_with_nothing_recognized_fails_setup() {
    let registry = ContractRegistry::new();
    assert!(spy_on(&registry, Arc::new(LiveDb)).is_err());
}

/// A delegate that reads the spy's own log mid-call.
#[derive(Default)]
struct Reentrant {
    spy: Mutex<Option<Arc<Double>>>,
    observed_mid_call: Mutex<Option<usize>>,
}

impl Collaborator for Reentrant {
    fn declared_contracts(&self) -> Vec<ContractId> {
        vec![ContractId::new("db.client", "DbClient")]
    }

    fn invoke(&self, operation: &OperationId, _args: &[Value]) -> Result<Value, CallFailure> {
        if let Some(spy) = self.spy.lock().unwrap().as_ref() {
            let count = spy.calls().count(operation);
            *self.observed_mid_call.lock().unwrap() = Some(count);
        }
        Ok(Value::Null)
    }
}

#[test]
fn recording_happens_before_delegation() {
    let target = Arc::new(Reentrant::default());
    let subject = Arc::new(spy(target.clone(), vec![db_client()]).unwrap());
    *target.spy.lock().unwrap() = Some(subject.clone());

    let ping = subject.operation("ping").unwrap();
    subject.invoke(&ping, &[]).unwrap();

    // The delegate saw its own in-progress call already logged.
    assert_eq!(*target.observed_mid_call.lock().unwrap(), Some(1));
}

#[test]
fn failing_check_renders_the_recorded_calls() {
    let subject = mock_of(db_client(), BehaviorMap::new()).unwrap();
    let select = subject.operation("select").unwrap();
    subject.invoke(&select, &[json!("select 2")]).unwrap();

    let miss = Pattern::seq([Pattern::literal(json!("select 1"))]);
    let report = verify_received(&subject, &select, Some(&miss)).unwrap();
    assert!(!report.passed);
    assert!(report.message().contains("select 2"));
}
