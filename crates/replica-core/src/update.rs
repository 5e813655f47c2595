//! Inbound field update
//!
//! [`UpdateEngine`] overwrites a destination record's inbound-eligible
//! fields from a source record. Nested records already present on the
//! destination are merged in place rather than replaced, so references held
//! elsewhere stay valid.
//!
//! Updates are planned before anything is written: every read, metadata
//! lookup and recursion happens first, and the collected writes are applied
//! only once planning succeeded. Each write remembers the value it replaces,
//! so a setter rejecting a value during apply rolls the earlier writes back.

use crate::config::ReplicaConfig;
use crate::error::{ReplicaError, StructuralReason};
use crate::path::{FieldPath, Segment};
use crate::traverse::{Traversal, VisitedSet};
use replica_meta::{FieldKind, FieldMetadata, Registry};
use replica_model::{RecordRef, Value};
use replica_policy::{describe, InboundDisposition, Projection};
use tracing::{debug, trace, warn};

/// A single pending field write
#[derive(Debug)]
struct Write {
    target: RecordRef,
    field: &'static str,
    value: Value,
    previous: Value,
    path: FieldPath,
}

/// Inbound updater for one top-level call
#[derive(Debug)]
pub struct UpdateEngine<'a> {
    walk: Traversal<'a>,
    /// Destination records whose merge is still in progress
    merging: VisitedSet,
    plan: Vec<Write>,
}

impl<'a> UpdateEngine<'a> {
    /// Create engine resolving inbound policies under `projection`
    #[must_use]
    pub fn new(
        registry: &'a Registry,
        config: &'a ReplicaConfig,
        projection: Option<Projection>,
    ) -> Self {
        Self {
            walk: Traversal::new(registry, config, projection),
            merging: VisitedSet::default(),
            plan: Vec::new(),
        }
    }

    /// Overwrite `destination`'s inbound fields from `source`
    ///
    /// # Errors
    /// - [`ReplicaError::Argument`] if either argument is null or not a record
    /// - [`ReplicaError::Structural`] / [`ReplicaError::PolicyConflict`] if a
    ///   record cannot be introspected, a source field is foreign to the
    ///   destination, or a setter rejects a value; the destination is left
    ///   untouched
    pub fn update(mut self, destination: &Value, source: &Value) -> Result<(), ReplicaError> {
        let dest = record_argument("destination", destination)?;
        let src = record_argument("source", source)?;

        self.merging.insert(destination);
        self.plan_merge(dest, src)?;

        let writes = self.apply()?;
        debug!(
            "Updated {} under {} ({} fields written)",
            dest.type_key(),
            describe(self.walk.projection),
            writes
        );
        Ok(())
    }

    fn plan_merge(&mut self, dest: &RecordRef, src: &RecordRef) -> Result<(), ReplicaError> {
        let meta = self.walk.metadata(src.type_key())?;
        let dest_meta = self.walk.metadata(dest.type_key())?;
        trace!("Planning merge of {} at {}", src.type_key(), self.walk.path);

        for field in meta.fields() {
            if field.inbound(self.walk.projection) == InboundDisposition::Skip {
                continue;
            }
            self.walk.enter(Segment::Field(field.name()));
            if !dest_meta.chain().contains(&field.owner()) {
                return Err(self.walk.structural(StructuralReason::ForeignField {
                    owner: field.owner(),
                    field: field.name(),
                    destination: dest.type_key(),
                }));
            }
            let incoming = src
                .get(field.name())
                .map_err(|e| self.walk.structural(e))?;
            let current = dest
                .get(field.name())
                .map_err(|e| self.walk.structural(e))?;

            match self.merge_pair(field, &current, &incoming) {
                Some((nested_dest, nested_src)) => {
                    // only a merge still on the stack blocks re-entry
                    if self.merging.insert(&current) {
                        self.plan_merge(nested_dest, nested_src)?;
                        self.merging.remove(&current);
                    }
                }
                None => self.plan.push(Write {
                    target: dest.clone(),
                    field: field.name(),
                    value: incoming,
                    previous: current,
                    path: self.walk.path.clone(),
                }),
            }
            self.walk.leave();
        }
        Ok(())
    }

    /// Destination and source records to merge, if the field qualifies
    fn merge_pair<'v>(
        &self,
        field: &FieldMetadata,
        current: &'v Value,
        incoming: &'v Value,
    ) -> Option<(&'v RecordRef, &'v RecordRef)> {
        let FieldKind::Record(declared) = field.kind() else {
            return None;
        };
        if !self.walk.registry.participates(declared) {
            return None;
        }
        Some((current.as_record()?, incoming.as_record()?))
    }

    /// Perform the planned writes, undoing them all if one is rejected
    fn apply(&mut self) -> Result<usize, ReplicaError> {
        let plan = std::mem::take(&mut self.plan);
        for (done, write) in plan.iter().enumerate() {
            if let Err(e) = write.target.set(write.field, write.value.clone()) {
                for applied in plan[..done].iter().rev() {
                    let restored = applied.target.set(applied.field, applied.previous.clone());
                    if let Err(undo) = restored {
                        warn!("Rollback of {} failed: {}", applied.path, undo);
                    }
                }
                return Err(ReplicaError::structural(write.path.clone(), e));
            }
        }
        Ok(plan.len())
    }
}

fn record_argument<'v>(name: &'static str, value: &'v Value) -> Result<&'v RecordRef, ReplicaError> {
    match value {
        Value::Record(r) => Ok(r),
        Value::Null => Err(ReplicaError::argument(name, "must not be null")),
        _ => Err(ReplicaError::argument(name, "must be a record")),
    }
}
