//! Type registry and metadata cache
//!
//! Registrations and built metadata live in `DashMap`s so the process-wide
//! [`Registry::global`] can be read from any thread without a global lock.
//! A first build may race with another thread building the same type; both
//! produce equivalent metadata and the first insert wins.

use crate::error::MetaError;
use crate::metadata::{build_metadata, TypeMetadata};
use crate::spec::TypeSpec;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use once_cell::sync::Lazy;
use replica_model::{ContainerType, RecordRef, TypeKey};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached builds, failures included
    pub entry_count: u64,
}

/// Registry of record types and recognized containers
#[derive(Debug)]
pub struct Registry {
    specs: DashMap<TypeKey, TypeSpec>,
    containers: DashSet<ContainerType>,
    cache: DashMap<TypeKey, Result<Arc<TypeMetadata>, MetaError>>,
}

impl Registry {
    /// Empty registry recognizing the built-in containers
    #[must_use]
    pub fn new() -> Self {
        let containers = DashSet::new();
        for ty in ContainerType::BUILTIN {
            containers.insert(ty);
        }
        Self {
            specs: DashMap::new(),
            containers,
            cache: DashMap::new(),
        }
    }

    /// Process-wide registry
    #[inline]
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Register a record type
    ///
    /// Returns `false` if the type was already registered; the first
    /// registration is kept.
    pub fn register(&self, spec: TypeSpec) -> bool {
        let key = spec.key();
        let inserted = match self.specs.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(spec);
                true
            }
        };
        if inserted {
            debug!("Registered type {}", key);
        }
        inserted
    }

    /// Recognize a user-defined container type
    pub fn register_container(&self, ty: ContainerType) -> bool {
        self.containers.insert(ty)
    }

    /// True if containers of `ty` can be constructed
    #[inline]
    #[must_use]
    pub fn recognizes(&self, ty: &ContainerType) -> bool {
        self.containers.contains(ty)
    }

    /// True if `key` is registered
    #[inline]
    #[must_use]
    pub fn is_registered(&self, key: TypeKey) -> bool {
        self.specs.contains_key(&key)
    }

    /// Registration of `key`
    #[must_use]
    pub fn spec(&self, key: TypeKey) -> Option<TypeSpec> {
        self.specs.get(&key).map(|s| s.value().clone())
    }

    /// True if `key` or one of its ancestors carries the participation marker
    #[must_use]
    pub fn participates(&self, key: TypeKey) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = Some(key);
        while let Some(current) = cursor {
            if !seen.insert(current) {
                return false;
            }
            let Some((participates, parent)) = self
                .specs
                .get(&current)
                .map(|s| (s.participates, s.parent))
            else {
                return false;
            };
            if participates {
                return true;
            }
            cursor = parent;
        }
        false
    }

    /// Fresh instance of `key` via its no-argument constructor
    #[must_use]
    pub fn construct(&self, key: TypeKey) -> Option<RecordRef> {
        let make = self.specs.get(&key).and_then(|s| s.constructor)?;
        Some(make())
    }

    /// Cached metadata for `key`, building it on first use
    ///
    /// Failures are cached and re-raised on later calls, except
    /// [`MetaError::Unregistered`], which a later registration may resolve.
    ///
    /// # Errors
    /// Returns the [`MetaError`] produced by [`build_metadata`].
    pub fn metadata(&self, key: TypeKey) -> Result<Arc<TypeMetadata>, MetaError> {
        if let Some(cached) = self.cache.get(&key) {
            if let Err(err) = cached.value() {
                debug!("Re-raising cached failure for {}: {}", key, err);
            }
            return cached.value().clone();
        }

        let built = build_metadata(self, key).map(Arc::new);
        match &built {
            Ok(meta) => debug!(
                "Built metadata for {} ({} fields)",
                key,
                meta.fields().len()
            ),
            Err(err) => debug!("Metadata build failed for {}: {}", key, err),
        }

        if built.as_ref().is_err_and(MetaError::is_transient) {
            return built;
        }
        self.cache.entry(key).or_insert(built).value().clone()
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.cache.len() as u64,
        }
    }

    /// Drop all cached metadata
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
