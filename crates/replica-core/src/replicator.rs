//! Replicator facade
//!
//! [`Replicator`] binds a [`Registry`] to a [`ReplicaConfig`] and starts a
//! fresh engine for every call, so no identity map or visited set ever
//! outlives the operation it belongs to.

use crate::cloner::GraphCloner;
use crate::config::ReplicaConfig;
use crate::error::ReplicaError;
use crate::necessity::NecessityAnalyzer;
use crate::path::FieldPath;
use crate::update::UpdateEngine;
use replica_meta::Registry;
use replica_model::{TypeKey, Value};
use replica_policy::{describe, Disposition, Projection};
use tracing::debug;

/// Entry point for duplication, reuse and inbound update
#[derive(Debug, Clone)]
pub struct Replicator<'r> {
    registry: &'r Registry,
    config: ReplicaConfig,
}

impl Replicator<'static> {
    /// Replicator over the process-wide registry
    #[must_use]
    pub fn global() -> Self {
        Self::new(Registry::global())
    }
}

impl<'r> Replicator<'r> {
    /// Create replicator with default configuration
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            config: ReplicaConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: ReplicaConfig) -> Self {
        self.config = config;
        self
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ReplicaConfig {
        &self.config
    }

    /// Get registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Full independent copy under the default projection
    ///
    /// # Errors
    /// See [`GraphCloner::duplicate`].
    pub fn duplicate(&self, root: &Value) -> Result<Value, ReplicaError> {
        self.duplicate_with(root, None)
    }

    /// Full independent copy under `projection`
    ///
    /// # Errors
    /// See [`GraphCloner::duplicate`].
    pub fn duplicate_as(&self, root: &Value, projection: Projection) -> Result<Value, ReplicaError> {
        self.duplicate_with(root, Some(projection))
    }

    /// Full independent copy; `None` selects the default projection
    ///
    /// # Errors
    /// See [`GraphCloner::duplicate`].
    pub fn duplicate_with(
        &self,
        root: &Value,
        projection: Option<Projection>,
    ) -> Result<Value, ReplicaError> {
        GraphCloner::new(self.registry, &self.config, projection).duplicate(root)
    }

    /// `root` itself if it can be handed downstream unchanged, else a copy
    ///
    /// # Errors
    /// Same as [`Self::duplicate`].
    pub fn reuse_or_duplicate(&self, root: &Value) -> Result<Value, ReplicaError> {
        self.reuse_or_duplicate_with(root, None)
    }

    /// `root` itself if it can be handed downstream unchanged under
    /// `projection`, else a copy
    ///
    /// # Errors
    /// Same as [`Self::duplicate_as`].
    pub fn reuse_or_duplicate_as(
        &self,
        root: &Value,
        projection: Projection,
    ) -> Result<Value, ReplicaError> {
        self.reuse_or_duplicate_with(root, Some(projection))
    }

    /// Reuse-or-copy; `None` selects the default projection
    ///
    /// # Errors
    /// Same as [`Self::duplicate_with`].
    pub fn reuse_or_duplicate_with(
        &self,
        root: &Value,
        projection: Option<Projection>,
    ) -> Result<Value, ReplicaError> {
        if self.needs_independent_copy(root, projection)? {
            self.duplicate_with(root, projection)
        } else {
            debug!("Reusing {} under {}", root.kind(), describe(projection));
            Ok(root.clone())
        }
    }

    /// True if `root` must be copied before it is handed downstream
    ///
    /// # Errors
    /// See [`NecessityAnalyzer::needs_independent_copy`].
    pub fn needs_independent_copy(
        &self,
        root: &Value,
        projection: Option<Projection>,
    ) -> Result<bool, ReplicaError> {
        NecessityAnalyzer::new(self.registry, &self.config, projection).needs_independent_copy(root)
    }

    /// Overwrite `destination`'s inbound fields from `source`
    ///
    /// # Errors
    /// See [`UpdateEngine::update`].
    pub fn update(&self, destination: &Value, source: &Value) -> Result<(), ReplicaError> {
        self.update_with(destination, source, None)
    }

    /// Overwrite `destination`'s fields marked inbound for `projection`
    ///
    /// # Errors
    /// See [`UpdateEngine::update`].
    pub fn update_as(
        &self,
        destination: &Value,
        source: &Value,
        projection: Projection,
    ) -> Result<(), ReplicaError> {
        self.update_with(destination, source, Some(projection))
    }

    /// Inbound update; `None` selects the default projection
    ///
    /// # Errors
    /// See [`UpdateEngine::update`].
    pub fn update_with(
        &self,
        destination: &Value,
        source: &Value,
        projection: Option<Projection>,
    ) -> Result<(), ReplicaError> {
        UpdateEngine::new(self.registry, &self.config, projection).update(destination, source)
    }

    /// Resolved duplication disposition of `field` on `key`
    ///
    /// Fields without markers resolve to [`Disposition::Unspecified`].
    ///
    /// # Errors
    /// Returns the introspection error for `key`, located at the root.
    pub fn disposition(
        &self,
        key: TypeKey,
        field: &str,
        projection: Option<Projection>,
    ) -> Result<Disposition, ReplicaError> {
        let meta = self
            .registry
            .metadata(key)
            .map_err(|e| ReplicaError::from_meta(e, FieldPath::root()))?;
        Ok(meta
            .field(field)
            .map_or(Disposition::Unspecified, |f| f.disposition(projection)))
    }
}
