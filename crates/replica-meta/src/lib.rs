//! Replica Type Introspection
//!
//! Declarative registration of record types and the memoized, validated
//! field metadata the replication engine consumes.
//!
//! # Core Concepts
//!
//! - [`TypeSpec`] / [`FieldSpec`]: What a type declares: ancestor, markers, constructor
//! - [`Registry`]: Registration table plus the process-wide metadata cache
//! - [`TypeMetadata`]: A type's full, validated list of policy-bearing fields
//!
//! # Example
//!
//! ```
//! use replica_meta::{FieldSpec, Registry, TypeSpec};
//! use replica_model::{AccessError, Object, TypeKey, Value};
//!
//! #[derive(Debug, Default)]
//! struct Invoice;
//!
//! impl Object for Invoice {
//!     fn get(&mut self, field: &str) -> Result<Value, AccessError> {
//!         Err(AccessError::unknown_field("Invoice", field))
//!     }
//!     fn set(&mut self, field: &str, _value: Value) -> Result<(), AccessError> {
//!         Err(AccessError::unknown_field("Invoice", field))
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.register(
//!     TypeSpec::constructible::<Invoice>()
//!         .participates()
//!         .field(FieldSpec::new("total").include()),
//! );
//!
//! let meta = registry.metadata(TypeKey::of::<Invoice>()).unwrap();
//! assert_eq!(meta.fields().len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod metadata;
mod registry;
mod spec;

// Re-exports
pub use error::MetaError;
pub use metadata::{build_metadata, FieldMetadata, TypeMetadata};
pub use registry::{CacheStats, Registry};
pub use spec::{FieldKind, FieldSpec, TypeSpec};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
