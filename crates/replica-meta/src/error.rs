//! Introspection errors

use replica_model::TypeKey;
use replica_policy::PolicyError;

/// Errors raised while building type metadata
///
/// Cloneable so a failure can be cached and re-raised on every later use
/// of the same type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetaError {
    /// Type (or one of its declared ancestors) was never registered
    #[error("type not registered: {0}")]
    Unregistered(TypeKey),

    /// No type in the ancestor chain carries the participation marker
    #[error("{0} does not participate in replication")]
    NotParticipating(TypeKey),

    /// Policy-bearing field belongs to the type, not to instances
    #[error("field {owner}.{field} is static and cannot carry a policy")]
    StaticField {
        /// Declaring type
        owner: TypeKey,
        /// Field name
        field: &'static str,
    },

    /// Policy-bearing field cannot be repopulated after construction
    #[error("field {owner}.{field} is final and cannot carry a policy")]
    FinalField {
        /// Declaring type
        owner: TypeKey,
        /// Field name
        field: &'static str,
    },

    /// Illegal include/exclude combination
    #[error("field {owner}.{field}: {source}")]
    PolicyConflict {
        /// Declaring type
        owner: TypeKey,
        /// Field name
        field: &'static str,
        /// Underlying conflict
        #[source]
        source: PolicyError,
    },

    /// Ancestor chain loops back on itself
    #[error("inheritance cycle through {0}")]
    InheritanceCycle(TypeKey),
}

impl MetaError {
    /// True if this failure depends on registrations that may still arrive
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unregistered(_))
    }
}
