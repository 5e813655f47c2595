//! Error types for replica operations
//!
//! Every failure is terminal: it reflects a mismatch between declared
//! policy and the actual shape of the graph, never a transient condition.

use crate::path::FieldPath;
use replica_meta::MetaError;
use replica_model::{AccessError, ContainerType, TypeKey};
use replica_policy::PolicyError;

/// Main replica error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReplicaError {
    /// Illegal include/exclude combination on a field
    #[error("policy conflict on {owner}.{field} at {path}: {source}")]
    PolicyConflict {
        /// Where the offending type was reached
        path: FieldPath,
        /// Declaring type
        owner: TypeKey,
        /// Field name
        field: &'static str,
        /// Underlying conflict
        #[source]
        source: PolicyError,
    },

    /// Graph shape does not fit the declared policy
    #[error("structural error at {path}: {reason}")]
    Structural {
        /// Where the offending value was reached
        path: FieldPath,
        /// What is wrong with it
        reason: StructuralReason,
    },

    /// Required argument missing or of the wrong kind
    #[error("invalid argument `{name}`: {reason}")]
    Argument {
        /// Parameter name
        name: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },
}

/// Cause of a [`ReplicaError::Structural`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralReason {
    /// Policy-bearing field is static
    #[error("field {owner}.{field} is static and cannot carry a policy")]
    StaticField {
        /// Declaring type
        owner: TypeKey,
        /// Field name
        field: &'static str,
    },

    /// Policy-bearing field is fixed at construction
    #[error("field {owner}.{field} is final and cannot carry a policy")]
    FinalField {
        /// Declaring type
        owner: TypeKey,
        /// Field name
        field: &'static str,
    },

    /// Runtime type never carries the participation marker
    #[error("{0} does not participate in replication")]
    NotParticipating(TypeKey),

    /// Runtime type (or an ancestor) is unknown to the registry
    #[error("type not registered: {0}")]
    Unregistered(TypeKey),

    /// Ancestor chain loops back on itself
    #[error("inheritance cycle through {0}")]
    InheritanceCycle(TypeKey),

    /// Inbound field is not declared anywhere in the destination's ancestry
    #[error("field {owner}.{field} does not exist on destination {destination}")]
    ForeignField {
        /// Type declaring the field on the source side
        owner: TypeKey,
        /// Field name
        field: &'static str,
        /// Runtime type of the destination record
        destination: TypeKey,
    },

    /// Type has no no-argument construction path
    #[error("{0} cannot be constructed")]
    Uninstantiable(TypeKey),

    /// Container type is not recognized by the registry
    #[error("unrecognized container type {0}")]
    UnrecognizedContainer(ContainerType),

    /// Accessor or element operation failed
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl ReplicaError {
    /// Create structural error
    #[inline]
    #[must_use]
    pub fn structural(path: FieldPath, reason: impl Into<StructuralReason>) -> Self {
        Self::Structural {
            path,
            reason: reason.into(),
        }
    }

    /// Create argument error
    #[inline]
    #[must_use]
    pub fn argument(name: &'static str, reason: &'static str) -> Self {
        Self::Argument { name, reason }
    }

    /// Map an introspection failure reached at `path`
    #[must_use]
    pub fn from_meta(error: MetaError, path: FieldPath) -> Self {
        let reason = match error {
            MetaError::PolicyConflict {
                owner,
                field,
                source,
            } => {
                return Self::PolicyConflict {
                    path,
                    owner,
                    field,
                    source,
                }
            }
            MetaError::StaticField { owner, field } => StructuralReason::StaticField { owner, field },
            MetaError::FinalField { owner, field } => StructuralReason::FinalField { owner, field },
            MetaError::NotParticipating(key) => StructuralReason::NotParticipating(key),
            MetaError::Unregistered(key) => StructuralReason::Unregistered(key),
            MetaError::InheritanceCycle(key) => StructuralReason::InheritanceCycle(key),
        };
        Self::structural(path, reason)
    }

    /// Location of the failure, if it arose during traversal
    #[must_use]
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::PolicyConflict { path, .. } | Self::Structural { path, .. } => Some(path),
            Self::Argument { .. } => None,
        }
    }

    /// Check if error is retryable
    ///
    /// Always `false`: retrying against the same graph fails the same way.
    #[inline]
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Check if error is a policy conflict
    #[inline]
    #[must_use]
    pub fn is_policy_conflict(&self) -> bool {
        matches!(self, Self::PolicyConflict { .. })
    }

    /// Check if error is structural
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Segment;
    use replica_policy::ConflictReason;

    struct Invoice;

    #[test]
    fn meta_conflict_maps_to_policy_conflict() {
        let err = ReplicaError::from_meta(
            MetaError::PolicyConflict {
                owner: TypeKey::of::<Invoice>(),
                field: "total",
                source: PolicyError::Conflict {
                    reason: ConflictReason::BothUnscoped,
                },
            },
            FieldPath::root(),
        );
        assert!(err.is_policy_conflict());
        assert!(!err.is_retryable());
    }

    #[test]
    fn meta_static_maps_to_structural() {
        let path = FieldPath::root().child(Segment::Field("invoice"));
        let err = ReplicaError::from_meta(
            MetaError::StaticField {
                owner: TypeKey::of::<Invoice>(),
                field: "count",
            },
            path.clone(),
        );
        assert!(err.is_structural());
        assert_eq!(err.path(), Some(&path));
        assert_eq!(
            err.to_string(),
            "structural error at root.invoice: field Invoice.count is static and cannot carry a policy"
        );
    }

    #[test]
    fn access_converts_into_reason() {
        let err = ReplicaError::structural(
            FieldPath::root(),
            AccessError::unknown_field("Invoice", "total"),
        );
        assert_eq!(
            err.to_string(),
            "structural error at root: no field 'total' on Invoice"
        );
    }

    #[test]
    fn argument_has_no_path() {
        let err = ReplicaError::argument("source", "must not be null");
        assert!(err.path().is_none());
        assert_eq!(err.to_string(), "invalid argument `source`: must not be null");
    }
}
