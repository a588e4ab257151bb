//! Construction surface: `spy`, `stub`, `mock`, and `returning`.
//!
//! All construction misuse is rejected here, synchronously, so a broken
//! double never reaches the body of a test.

use crate::behavior::BehaviorMap;
use crate::double::{Double, DoubleKind};
use crate::error::DoubleError;
use effigy_contract::{Collaborator, ContractDescriptor, ContractId, ContractRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A positional argument to [`stub`] or [`mock`]: a contract descriptor,
/// optionally followed by the behavior map configuring it.
#[derive(Debug, Clone)]
pub enum StubArg {
    Contract(ContractDescriptor),
    Behaviors(BehaviorMap),
}

impl StubArg {
    /// Whether this positional argument is a recognized contract.
    pub fn is_contract(&self) -> bool {
        matches!(self, StubArg::Contract(_))
    }
}

impl From<ContractDescriptor> for StubArg {
    fn from(descriptor: ContractDescriptor) -> Self {
        Self::Contract(descriptor)
    }
}

impl From<BehaviorMap> for StubArg {
    fn from(map: BehaviorMap) -> Self {
        Self::Behaviors(map)
    }
}

/// Wrap a real implementation in a call-recording spy for an explicit
/// contract set.
///
/// Every reified operation records its receiver-excluded argument tuple,
/// then delegates to `target` unchanged and returns (or propagates)
/// whatever the target produces.
pub fn spy(
    target: Arc<dyn Collaborator>,
    contracts: Vec<ContractDescriptor>,
) -> Result<Double, DoubleError> {
    if contracts.is_empty() {
        return Err(DoubleError::InvalidArgument(
            "spy requires at least one contract to wrap".into(),
        ));
    }
    Ok(Double::assemble(
        DoubleKind::Spy,
        contracts,
        BTreeMap::new(),
        Some(target),
    ))
}

/// The omitted-contracts form of [`spy`]: infer the wrapped contracts
/// from the target's declared capabilities.
pub fn spy_on(
    registry: &ContractRegistry,
    target: Arc<dyn Collaborator>,
) -> Result<Double, DoubleError> {
    let contracts = registry.descriptors_of(target.as_ref());
    if contracts.is_empty() {
        return Err(DoubleError::InvalidArgument(
            "spy target declares no recognized contracts".into(),
        ));
    }
    spy(target, contracts)
}

/// Synthesize a stub from an interleaved contract/behavior-map sequence.
///
/// Operations with no behavior entry return the empty value. A behavior
/// map must directly follow the contract it configures; entries naming
/// operations the contract does not declare are rejected.
pub fn stub(args: Vec<StubArg>) -> Result<Double, DoubleError> {
    let specs = collect_specs(args)?;
    let mut contracts = Vec::with_capacity(specs.len());
    let mut behaviors = BTreeMap::new();
    for (descriptor, table) in specs {
        behaviors.insert(descriptor.id.clone(), table);
        contracts.push(descriptor);
    }
    Ok(Double::assemble(
        DoubleKind::Stub,
        contracts,
        behaviors,
        None,
    ))
}

/// One-contract convenience form of [`stub`].
pub fn stub_of(
    descriptor: ContractDescriptor,
    map: BehaviorMap,
) -> Result<Double, DoubleError> {
    stub(vec![StubArg::Contract(descriptor), StubArg::Behaviors(map)])
}

/// Synthesize a mock: a stub wrapped in a spy.
///
/// The spy wraps the stub's own declared contracts, never re-inferred, so
/// the mock records calls like a spy and answers like the stub.
pub fn mock(args: Vec<StubArg>) -> Result<Double, DoubleError> {
    let inner = stub(args)?;
    Ok(wrap_stub(inner))
}

/// One-contract convenience form of [`mock`].
pub fn mock_of(
    descriptor: ContractDescriptor,
    map: BehaviorMap,
) -> Result<Double, DoubleError> {
    mock(vec![StubArg::Contract(descriptor), StubArg::Behaviors(map)])
}

/// Derive a new double of the same kind with `contract`'s behavior table
/// merged with `additions` (new entries win). Untouched operations and
/// other contracts carry over unchanged; the derived double starts with a
/// fresh call log. The original is never mutated.
pub fn returning(
    double: &Double,
    contract: &ContractId,
    additions: BehaviorMap,
) -> Result<Double, DoubleError> {
    if !double.is_stub_double() {
        return Err(DoubleError::InvalidArgument(format!(
            "returning requires a stub or mock, got a {}",
            double.kind()
        )));
    }
    let descriptor = double
        .contracts()
        .iter()
        .find(|descriptor| &descriptor.id == contract)
        .ok_or_else(|| {
            DoubleError::InvalidArgument(format!(
                "contract {contract} is not reified by this double"
            ))
        })?;
    validate_entries(descriptor, &additions)?;

    let mut behaviors = double.behavior_tables().clone();
    let table = behaviors.entry(contract.clone()).or_default();
    for (name, behavior) in additions {
        table.insert(name, behavior);
    }

    let rebuilt = Double::assemble(
        DoubleKind::Stub,
        double.contracts().to_vec(),
        behaviors,
        None,
    );
    Ok(match double.kind() {
        DoubleKind::Mock => wrap_stub(rebuilt),
        _ => rebuilt,
    })
}

fn wrap_stub(inner: Double) -> Double {
    let contracts = inner.contracts().to_vec();
    let behaviors = inner.behavior_tables().clone();
    Double::assemble(
        DoubleKind::Mock,
        contracts,
        behaviors,
        Some(Arc::new(inner)),
    )
}

fn collect_specs(
    args: Vec<StubArg>,
) -> Result<Vec<(ContractDescriptor, BehaviorMap)>, DoubleError> {
    let mut specs: Vec<(ContractDescriptor, BehaviorMap)> = Vec::new();
    let mut awaiting_map = false;
    for arg in args {
        match arg {
            StubArg::Contract(descriptor) => {
                if specs
                    .iter()
                    .any(|(existing, _)| existing.id == descriptor.id)
                {
                    return Err(DoubleError::InvalidArgument(format!(
                        "contract {} supplied more than once",
                        descriptor.id
                    )));
                }
                specs.push((descriptor, BehaviorMap::new()));
                awaiting_map = true;
            }
            StubArg::Behaviors(map) => match specs.last_mut() {
                Some((descriptor, table)) if awaiting_map => {
                    validate_entries(descriptor, &map)?;
                    *table = map;
                    awaiting_map = false;
                }
                _ => {
                    return Err(DoubleError::InvalidArgument(
                        "behavior map must directly follow its contract".into(),
                    ));
                }
            },
        }
    }
    if specs.is_empty() {
        return Err(DoubleError::InvalidArgument(
            "at least one contract is required".into(),
        ));
    }
    Ok(specs)
}

fn validate_entries(
    descriptor: &ContractDescriptor,
    map: &BehaviorMap,
) -> Result<(), DoubleError> {
    for name in map.keys() {
        if descriptor.operation(name).is_none() {
            return Err(DoubleError::UnsupportedConfiguration {
                contract: descriptor.id.clone(),
                operation: name.clone(),
            });
        }
    }
    Ok(())
}
