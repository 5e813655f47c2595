//! Shared traversal machinery
//!
//! Runtime classification of values, identity-keyed bookkeeping, and the
//! per-call state every engine carries.

use crate::config::ReplicaConfig;
use crate::error::{ReplicaError, StructuralReason};
use crate::path::{FieldPath, Segment};
use replica_meta::{Registry, TypeMetadata};
use replica_model::{ArrayRef, ContainerRef, Identity, RecordRef, TimestampRef, TypeKey, Value};
use replica_policy::Projection;
use std::collections::HashMap;
use std::sync::Arc;

/// Runtime category of a value, as traversal sees it
#[derive(Debug)]
pub(crate) enum Node<'v> {
    /// Null
    Absent,
    /// Never copied: value-semantics scalars, text, configured-immutable records
    Shared,
    /// Copied as a fresh instance with an equal value
    Timestamp(&'v TimestampRef),
    Array(&'v ArrayRef),
    Container(&'v ContainerRef),
    Record(&'v RecordRef),
}

/// Classify `value` by its runtime type
pub(crate) fn classify<'v>(value: &'v Value, config: &ReplicaConfig) -> Node<'v> {
    match value {
        Value::Null => Node::Absent,
        Value::Bool(_) | Value::Char(_) | Value::Int(_) | Value::Float(_) | Value::Text(_) => {
            Node::Shared
        }
        Value::Timestamp(t) => Node::Timestamp(t),
        Value::Array(a) => Node::Array(a),
        Value::Container(c) => Node::Container(c),
        Value::Record(r) if config.is_immutable(r.type_key()) => Node::Shared,
        Value::Record(r) => Node::Record(r),
    }
}

/// Per-call traversal state
#[derive(Debug)]
pub(crate) struct Traversal<'a> {
    pub(crate) registry: &'a Registry,
    pub(crate) config: &'a ReplicaConfig,
    pub(crate) projection: Option<Projection>,
    pub(crate) path: FieldPath,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        config: &'a ReplicaConfig,
        projection: Option<Projection>,
    ) -> Self {
        Self {
            registry,
            config,
            projection,
            path: FieldPath::root(),
        }
    }

    /// Metadata for `key`, failures located at the current path
    pub(crate) fn metadata(&self, key: TypeKey) -> Result<Arc<TypeMetadata>, ReplicaError> {
        self.registry
            .metadata(key)
            .map_err(|e| ReplicaError::from_meta(e, self.path.clone()))
    }

    /// Structural error at the current path
    pub(crate) fn structural(&self, reason: impl Into<StructuralReason>) -> ReplicaError {
        ReplicaError::structural(self.path.clone(), reason)
    }

    pub(crate) fn enter(&mut self, segment: Segment) {
        self.path.push(segment);
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }
}

/// Original-to-copy mapping keyed by identity
///
/// Keeps each original alive for the whole call so its address cannot be
/// reused by a temporary produced later in the same traversal.
#[derive(Debug, Default)]
pub(crate) struct IdentityMap {
    entries: HashMap<Identity, (Value, Value)>,
}

impl IdentityMap {
    pub(crate) fn get(&self, original: &Value) -> Option<Value> {
        let id = original.identity()?;
        self.entries.get(&id).map(|(_, copy)| copy.clone())
    }

    pub(crate) fn insert(&mut self, original: &Value, copy: Value) {
        if let Some(id) = original.identity() {
            self.entries.insert(id, (original.clone(), copy));
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Identity-keyed visited set, retaining what it has seen
#[derive(Debug, Default)]
pub(crate) struct VisitedSet {
    entries: HashMap<Identity, Value>,
}

impl VisitedSet {
    /// Mark `value` visited; `false` if it already was
    pub(crate) fn insert(&mut self, value: &Value) -> bool {
        match value.identity() {
            Some(id) => {
                if self.entries.contains_key(&id) {
                    return false;
                }
                self.entries.insert(id, value.clone());
                true
            }
            None => true,
        }
    }

    /// Forget `value`, so it may be visited again
    pub(crate) fn remove(&mut self, value: &Value) {
        if let Some(id) = value.identity() {
            self.entries.remove(&id);
        }
    }

    pub(crate) fn contains(&self, value: &Value) -> bool {
        value
            .identity()
            .is_some_and(|id| self.entries.contains_key(&id))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
