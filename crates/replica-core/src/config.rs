//! Replicator configuration

use replica_model::{ContainerType, TypeKey};
use std::collections::HashSet;

/// Replicator configuration
///
/// Both sets are honored identically by duplication and by necessity
/// analysis.
#[derive(Debug, Clone)]
pub struct ReplicaConfig {
    /// Record types shared rather than copied
    pub immutable: HashSet<TypeKey>,
    /// Container types a downstream consumer understands as-is
    pub canonical_containers: HashSet<ContainerType>,
}

impl ReplicaConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With `T` treated as immutable
    #[inline]
    #[must_use]
    pub fn with_immutable<T: 'static>(self) -> Self {
        self.with_immutable_key(TypeKey::of::<T>())
    }

    /// With the type `key` treated as immutable
    #[inline]
    #[must_use]
    pub fn with_immutable_key(mut self, key: TypeKey) -> Self {
        self.immutable.insert(key);
        self
    }

    /// With `ty` accepted as canonical
    #[inline]
    #[must_use]
    pub fn with_canonical_container(mut self, ty: ContainerType) -> Self {
        self.canonical_containers.insert(ty);
        self
    }

    /// Without `ty` among the canonical containers
    #[inline]
    #[must_use]
    pub fn without_canonical_container(mut self, ty: ContainerType) -> Self {
        self.canonical_containers.remove(&ty);
        self
    }

    /// True if records of `key` are shared rather than copied
    #[inline]
    #[must_use]
    pub fn is_immutable(&self, key: TypeKey) -> bool {
        self.immutable.contains(&key)
    }

    /// True if `ty` can be handed downstream without a copy
    #[inline]
    #[must_use]
    pub fn is_canonical(&self, ty: &ContainerType) -> bool {
        self.canonical_containers.contains(ty)
    }
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            immutable: HashSet::new(),
            canonical_containers: ContainerType::BUILTIN.into_iter().collect(),
        }
    }
}
