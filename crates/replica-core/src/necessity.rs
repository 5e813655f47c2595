//! Clone-necessity analysis
//!
//! [`NecessityAnalyzer`] decides whether a graph can be handed downstream
//! as-is. A copy is forced by any reachable non-canonical container, and by
//! any record holding state that a copy would drop: a non-default value in
//! a field excluded under the requested projection.

use crate::config::ReplicaConfig;
use crate::error::ReplicaError;
use crate::path::Segment;
use crate::traverse::{classify, Node, Traversal, VisitedSet};
use replica_meta::{FieldMetadata, Registry, TypeMetadata};
use replica_model::{ContainerData, ContainerRef, RecordRef, TypeKey, Value};
use replica_policy::{describe, Disposition, Projection};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Reachability check for one top-level call
#[derive(Debug)]
pub struct NecessityAnalyzer<'a> {
    walk: Traversal<'a>,
    visited: VisitedSet,
    fresh: HashMap<TypeKey, Option<RecordRef>>,
}

impl<'a> NecessityAnalyzer<'a> {
    /// Create analyzer resolving policies under `projection`
    #[must_use]
    pub fn new(
        registry: &'a Registry,
        config: &'a ReplicaConfig,
        projection: Option<Projection>,
    ) -> Self {
        Self {
            walk: Traversal::new(registry, config, projection),
            visited: VisitedSet::default(),
            fresh: HashMap::new(),
        }
    }

    /// True if `root` must be duplicated before it is handed downstream
    ///
    /// # Errors
    /// Surfaces the same structural and policy errors as duplication for
    /// every record type it has to inspect.
    pub fn needs_independent_copy(mut self, root: &Value) -> Result<bool, ReplicaError> {
        let needed = self.needs(root)?;
        debug!(
            "Necessity of {} under {}: {} ({} references visited)",
            root.kind(),
            describe(self.walk.projection),
            needed,
            self.visited.len()
        );
        Ok(needed)
    }

    fn needs(&mut self, value: &Value) -> Result<bool, ReplicaError> {
        if self.visited.contains(value) {
            return Ok(false);
        }

        match classify(value, self.walk.config) {
            Node::Absent | Node::Shared | Node::Timestamp(_) => Ok(false),
            Node::Array(array) => {
                self.visited.insert(value);
                self.any_element(array.items().iter())
            }
            Node::Container(container) => self.container_needs(value, container),
            Node::Record(record) => self.record_needs(value, record),
        }
    }

    fn within(&mut self, segment: Segment, value: &Value) -> Result<bool, ReplicaError> {
        self.walk.enter(segment);
        let needed = self.needs(value)?;
        self.walk.leave();
        Ok(needed)
    }

    fn container_needs(
        &mut self,
        original: &Value,
        container: &ContainerRef,
    ) -> Result<bool, ReplicaError> {
        let ty = container.container_type();
        if !self.walk.config.is_canonical(&ty) {
            trace!("Non-canonical {} at {}", ty, self.walk.path);
            return Ok(true);
        }
        self.visited.insert(original);

        match container.snapshot() {
            ContainerData::Sequence(items) => self.any_element(items.iter()),
            ContainerData::Set(items) => self.any_element(items.iter()),
            ContainerData::Map(entries) => {
                for (i, (key, val)) in entries.iter().enumerate() {
                    if self.within(Segment::MapKey(i), key)?
                        || self.within(Segment::MapValue(i), val)?
                    {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn any_element<'v>(
        &mut self,
        items: impl Iterator<Item = &'v Value>,
    ) -> Result<bool, ReplicaError> {
        for (i, item) in items.enumerate() {
            if self.within(Segment::Index(i), item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn record_needs(&mut self, original: &Value, record: &RecordRef) -> Result<bool, ReplicaError> {
        let meta = self.walk.metadata(record.type_key())?;
        self.visited.insert(original);

        for field in meta.fields() {
            self.walk.enter(Segment::Field(field.name()));
            let needed = match field.disposition(self.walk.projection) {
                Disposition::Include => {
                    let current = record
                        .get(field.name())
                        .map_err(|e| self.walk.structural(e))?;
                    self.needs(&current)?
                }
                Disposition::Exclude => {
                    let current = record
                        .get(field.name())
                        .map_err(|e| self.walk.structural(e))?;
                    self.holds_excluded_state(&meta, field, &current)?
                }
                Disposition::Unspecified => false,
            };
            self.walk.leave();

            if needed {
                trace!("Copy forced by {}", self.walk.path.child(Segment::Field(field.name())));
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True if an excluded field holds something a fresh instance would not
    fn holds_excluded_state(
        &mut self,
        meta: &TypeMetadata,
        field: &FieldMetadata,
        current: &Value,
    ) -> Result<bool, ReplicaError> {
        if current.is_null() {
            return Ok(false);
        }
        if current.identity().is_some() {
            return Ok(true);
        }

        let fresh = self
            .fresh
            .entry(meta.key())
            .or_insert_with(|| meta.construct())
            .clone();
        match fresh {
            Some(instance) => {
                let default = instance
                    .get(field.name())
                    .map_err(|e| self.walk.structural(e))?;
                Ok(default != *current)
            }
            None => Ok(true),
        }
    }
}
