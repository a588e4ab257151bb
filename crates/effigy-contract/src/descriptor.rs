//! Contract identity, operation signatures, and descriptors.
//!
//! Operation identity is always the explicit pair (contract, name). There
//! is no bare-name resolution here: anything that needs to talk about an
//! operation carries its declaring contract with it.
//!
//! Descriptors are created when a contract is declared by the code under
//! test, validated once, and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unique identity of a contract: a name plus its originating namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractId {
    /// Originating namespace or module path.
    pub namespace: String,

    /// Contract name, unique within the namespace.
    pub name: String,
}

impl ContractId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Contract-qualified operation identity.
///
/// Carried explicitly as a pair so that operations with the same name
/// declared across separate contracts never collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationId {
    /// The declaring contract.
    pub contract: ContractId,

    /// Operation name within that contract.
    pub name: String,
}

impl OperationId {
    pub fn new(contract: ContractId, name: impl Into<String>) -> Self {
        Self {
            contract,
            name: name.into(),
        }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.contract, self.name)
    }
}

/// One operation of a contract, possibly overloaded by arity.
///
/// Invariant: every parameter list includes the implicit receiver at
/// position 0, so an arity is one more than the number of call arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSignature {
    /// Operation name, unique within the declaring contract.
    pub name: String,

    /// Parameter lists, one per supported arity, receiver first.
    pub parameter_lists: Vec<Vec<String>>,
}

impl OperationSignature {
    /// A single-arity operation. The receiver is inserted at position 0.
    pub fn new(name: impl Into<String>, params: &[&str]) -> Self {
        Self {
            name: name.into(),
            parameter_lists: vec![receiver_first(params)],
        }
    }

    /// Add an overload for another arity. The receiver is inserted at
    /// position 0.
    pub fn with_arity(mut self, params: &[&str]) -> Self {
        self.parameter_lists.push(receiver_first(params));
        self
    }

    /// Supported arities, receiver included.
    pub fn arities(&self) -> Vec<usize> {
        self.parameter_lists.iter().map(Vec::len).collect()
    }

    /// Whether a call with `argc` non-receiver arguments fits an arity.
    pub fn accepts_call(&self, argc: usize) -> bool {
        self.parameter_lists.iter().any(|list| list.len() == argc + 1)
    }
}

fn receiver_first(params: &[&str]) -> Vec<String> {
    let mut list = Vec::with_capacity(params.len() + 1);
    list.push("self".to_string());
    list.extend(params.iter().map(|p| (*p).to_string()));
    list
}

/// A flattened (operation, arity, parameter list) tuple.
///
/// Multi-arity operations contribute one tuple per arity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatSignature {
    pub operation: OperationId,
    pub arity: usize,
    pub parameters: Vec<String>,
}

/// Errors raised while constructing a contract descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("contract name is empty")]
    EmptyName,

    #[error("duplicate operation in {contract}: {operation}")]
    DuplicateOperation { contract: String, operation: String },

    #[error("operation {operation} declares no parameter list")]
    MissingParameters { operation: String },

    #[error("parameter list for {operation} is missing the receiver")]
    MissingReceiver { operation: String },

    #[error("duplicate arity {arity} for operation {operation}")]
    DuplicateArity { operation: String, arity: usize },
}

/// The reflected, normalized metadata describing one contract.
///
/// Immutable once built; the synthesizer only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDescriptor {
    pub id: ContractId,
    pub operations: Vec<OperationSignature>,
}

impl ContractDescriptor {
    /// Build a descriptor, validating the contract invariants: a non-empty
    /// name, operation-name uniqueness, and receiver-first parameter lists
    /// with one list per arity.
    pub fn new(
        id: ContractId,
        operations: Vec<OperationSignature>,
    ) -> Result<Self, ContractError> {
        if id.name.is_empty() {
            return Err(ContractError::EmptyName);
        }
        let mut seen = BTreeSet::new();
        for op in &operations {
            if !seen.insert(op.name.as_str()) {
                return Err(ContractError::DuplicateOperation {
                    contract: id.to_string(),
                    operation: op.name.clone(),
                });
            }
            if op.parameter_lists.is_empty() {
                return Err(ContractError::MissingParameters {
                    operation: op.name.clone(),
                });
            }
            let mut arities = BTreeSet::new();
            for list in &op.parameter_lists {
                if list.is_empty() {
                    return Err(ContractError::MissingReceiver {
                        operation: op.name.clone(),
                    });
                }
                if !arities.insert(list.len()) {
                    return Err(ContractError::DuplicateArity {
                        operation: op.name.clone(),
                        arity: list.len(),
                    });
                }
            }
        }
        Ok(Self { id, operations })
    }

    /// Lookup one declared operation by name.
    pub fn operation(&self, name: &str) -> Option<&OperationSignature> {
        self.operations.iter().find(|op| op.name == name)
    }

    /// Contract-qualified identity for a declared operation name.
    pub fn operation_id(&self, name: &str) -> Option<OperationId> {
        self.operation(name)
            .map(|op| OperationId::new(self.id.clone(), op.name.as_str()))
    }

    /// Flatten multi-arity operations into one signature tuple per arity.
    pub fn flat_signatures(&self) -> Vec<FlatSignature> {
        self.operations
            .iter()
            .flat_map(|op| {
                op.parameter_lists.iter().map(move |list| FlatSignature {
                    operation: OperationId::new(self.id.clone(), op.name.as_str()),
                    arity: list.len(),
                    parameters: list.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_client() -> ContractDescriptor {
        ContractDescriptor::new(
            ContractId::new("db.client", "DbClient"),
            vec![
                OperationSignature::new("select", &["sql"]),
                OperationSignature::new("ping", &[]).with_arity(&["timeout"]),
            ],
        )
        .expect("descriptor should validate")
    }

    #[test]
    fn qualified_identity_display() {
        let descriptor = db_client();
        let op = descriptor.operation_id("select").unwrap();
        assert_eq!(op.to_string(), "db.client/DbClient::select");
    }

    #[test]
    fn receiver_occupies_position_zero() {
        let descriptor = db_client();
        let select = descriptor.operation("select").unwrap();
        assert_eq!(select.parameter_lists[0], vec!["self", "sql"]);
        assert_eq!(select.arities(), vec![2]);
    }

    #[test]
    fn multi_arity_flattening() {
        let descriptor = db_client();
        let flat = descriptor.flat_signatures();
        // select/2, ping/1, ping/2
        assert_eq!(flat.len(), 3);
        let ping: Vec<_> = flat.iter().filter(|s| s.operation.name == "ping").collect();
        assert_eq!(ping.len(), 2);
        assert_eq!(ping[0].arity, 1);
        assert_eq!(ping[1].arity, 2);
        assert_eq!(ping[1].parameters, vec!["self", "timeout"]);
    }

    #[test]
    fn accepts_call_by_non_receiver_count() {
        let descriptor = db_client();
        let ping = descriptor.operation("ping").unwrap();
        assert!(ping.accepts_call(0));
        assert!(ping.accepts_call(1));
        assert!(!ping.accepts_call(2));
    }

    #[test]
    fn duplicate_operation_names_rejected() {
        let err = ContractDescriptor::new(
            ContractId::new("db.client", "DbClient"),
            vec![
                OperationSignature::new("select", &["sql"]),
                OperationSignature::new("select", &["sql", "limit"]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::DuplicateOperation { .. }));
    }

    #[test]
    fn duplicate_arity_rejected() {
        let err = ContractDescriptor::new(
            ContractId::new("db.client", "DbClient"),
            vec![OperationSignature::new("select", &["sql"]).with_arity(&["query"])],
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::DuplicateArity { arity: 2, .. }));
    }

    #[test]
    fn empty_contract_name_rejected() {
        let err = ContractDescriptor::new(ContractId::new("db.client", ""), vec![]).unwrap_err();
        assert!(matches!(err, ContractError::EmptyName));
    }

    #[test]
    fn unknown_operation_lookup_is_none() {
        let descriptor = db_client();
        assert!(descriptor.operation("insert").is_none());
        assert!(descriptor.operation_id("insert").is_none());
    }
}
