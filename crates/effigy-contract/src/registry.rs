//! The set of contracts known to a test process.
//!
//! The registry is an explicit value passed where inference is needed.
//! Nothing here is process-global: two test processes (or two tests in
//! one process) can hold disjoint registries without interfering.

use crate::collaborator::Collaborator;
use crate::descriptor::{ContractDescriptor, ContractId};
use std::collections::BTreeMap;

/// Registry of contract descriptors, keyed by contract identity.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    contracts: BTreeMap<ContractId, ContractDescriptor>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from fully-materialized descriptors.
    ///
    /// Duplicate identities resolve with deterministic last-write-wins
    /// semantics, matching re-declaration of a contract during a test run.
    pub fn from_descriptors(descriptors: Vec<ContractDescriptor>) -> Self {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor);
        }
        registry
    }

    /// Register (or re-register) one contract descriptor.
    pub fn register(&mut self, descriptor: ContractDescriptor) {
        self.contracts.insert(descriptor.id.clone(), descriptor);
    }

    /// Resolve an identity back to its descriptor.
    pub fn resolve(&self, id: &ContractId) -> Option<&ContractDescriptor> {
        self.contracts.get(id)
    }

    /// Whether the identity names a recognized contract.
    pub fn is_contract(&self, id: &ContractId) -> bool {
        self.contracts.contains_key(id)
    }

    /// Number of registered contracts.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether the registry holds zero contracts.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Best-effort inference: resolve each capability the target declares.
    ///
    /// Capabilities that do not resolve (host-builtin capabilities, or
    /// contracts declared in another process) are silently dropped. An
    /// empty result is a legitimate state, never an error.
    pub fn descriptors_of(&self, target: &dyn Collaborator) -> Vec<ContractDescriptor> {
        target
            .declared_contracts()
            .iter()
            .filter_map(|id| self.resolve(id).cloned())
            .collect()
    }
}
