//! Cycle-safe deep copy
//!
//! [`GraphCloner`] duplicates a graph in one pass. Every reference it meets
//! is looked up in an identity map first; new copies are registered there
//! *before* their contents are filled in, so shared references stay shared
//! in the copy and cycles close on themselves instead of recursing forever.

use crate::config::ReplicaConfig;
use crate::error::{ReplicaError, StructuralReason};
use crate::path::Segment;
use crate::traverse::{classify, IdentityMap, Node, Traversal};
use replica_meta::Registry;
use replica_model::{ArrayRef, ContainerData, ContainerRef, RecordRef, Value};
use replica_policy::{describe, Projection};
use tracing::{debug, trace};

/// Deep copier for one top-level call
#[derive(Debug)]
pub struct GraphCloner<'a> {
    walk: Traversal<'a>,
    copies: IdentityMap,
}

impl<'a> GraphCloner<'a> {
    /// Create cloner resolving policies under `projection`
    #[must_use]
    pub fn new(
        registry: &'a Registry,
        config: &'a ReplicaConfig,
        projection: Option<Projection>,
    ) -> Self {
        Self {
            walk: Traversal::new(registry, config, projection),
            copies: IdentityMap::default(),
        }
    }

    /// Duplicate the graph reachable from `root`
    ///
    /// # Errors
    /// - [`ReplicaError::Structural`] for non-participating, unregistered or
    ///   unconstructible types, unrecognized containers, and failing accessors
    /// - [`ReplicaError::PolicyConflict`] for illegal markers on a reached type
    pub fn duplicate(mut self, root: &Value) -> Result<Value, ReplicaError> {
        let copy = self.copy(root)?;
        debug!(
            "Duplicated {} under {} ({} references copied)",
            root.kind(),
            describe(self.walk.projection),
            self.copies.len()
        );
        Ok(copy)
    }

    fn copy(&mut self, value: &Value) -> Result<Value, ReplicaError> {
        if let Some(existing) = self.copies.get(value) {
            return Ok(existing);
        }

        match classify(value, self.walk.config) {
            Node::Absent | Node::Shared => Ok(value.clone()),
            Node::Timestamp(t) => {
                let copy = Value::Timestamp(t.fresh_copy());
                self.copies.insert(value, copy.clone());
                Ok(copy)
            }
            Node::Array(array) => self.copy_array(value, array),
            Node::Container(container) => self.copy_container(value, container),
            Node::Record(record) => self.copy_record(value, record),
        }
    }

    fn copy_array(&mut self, original: &Value, array: &ArrayRef) -> Result<Value, ReplicaError> {
        trace!("Copying array at {}", self.walk.path);
        let items = array.items();
        let copy = ArrayRef::with_len(array.element(), items.len());
        self.copies.insert(original, Value::Array(copy.clone()));

        for (i, item) in items.iter().enumerate() {
            self.walk.enter(Segment::Index(i));
            let element = self.copy(item)?;
            copy.set(i, element).map_err(|e| self.walk.structural(e))?;
            self.walk.leave();
        }
        Ok(Value::Array(copy))
    }

    fn copy_container(
        &mut self,
        original: &Value,
        container: &ContainerRef,
    ) -> Result<Value, ReplicaError> {
        let ty = container.container_type();
        trace!("Copying {} at {}", ty, self.walk.path);
        if !self.walk.registry.recognizes(&ty) {
            return Err(self
                .walk
                .structural(StructuralReason::UnrecognizedContainer(ty)));
        }

        let copy = ContainerRef::new(ty);
        self.copies.insert(original, Value::Container(copy.clone()));

        match container.snapshot() {
            ContainerData::Sequence(items) => self.fill(&copy, items.iter())?,
            ContainerData::Set(items) => self.fill(&copy, items.iter())?,
            ContainerData::Map(entries) => {
                for (i, (key, val)) in entries.iter().enumerate() {
                    self.walk.enter(Segment::MapKey(i));
                    let key = self.copy(key)?;
                    self.walk.leave();

                    self.walk.enter(Segment::MapValue(i));
                    let val = self.copy(val)?;
                    copy.insert(key, val).map_err(|e| self.walk.structural(e))?;
                    self.walk.leave();
                }
            }
        }
        Ok(Value::Container(copy))
    }

    fn fill<'v>(
        &mut self,
        copy: &ContainerRef,
        items: impl Iterator<Item = &'v Value>,
    ) -> Result<(), ReplicaError> {
        for (i, item) in items.enumerate() {
            self.walk.enter(Segment::Index(i));
            let element = self.copy(item)?;
            copy.push(element).map_err(|e| self.walk.structural(e))?;
            self.walk.leave();
        }
        Ok(())
    }

    fn copy_record(&mut self, original: &Value, record: &RecordRef) -> Result<Value, ReplicaError> {
        let key = record.type_key();
        trace!("Copying {} at {}", key, self.walk.path);
        let meta = self.walk.metadata(key)?;
        let copy = meta
            .construct()
            .ok_or_else(|| self.walk.structural(StructuralReason::Uninstantiable(key)))?;
        self.copies.insert(original, Value::Record(copy.clone()));

        for field in meta.fields() {
            if !field.disposition(self.walk.projection).is_include() {
                continue;
            }
            self.walk.enter(Segment::Field(field.name()));
            let current = record
                .get(field.name())
                .map_err(|e| self.walk.structural(e))?;
            let duplicated = self.copy(&current)?;
            copy.set(field.name(), duplicated)
                .map_err(|e| self.walk.structural(e))?;
            self.walk.leave();
        }
        Ok(Value::Record(copy))
    }
}
