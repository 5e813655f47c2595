//! Replica Core
//!
//! Policy-driven duplication of typed object graphs.
//!
//! # Architecture
//!
//! ```text
//! Replicator ──┬─► GraphCloner        (full, cycle-safe copy)
//!              ├─► NecessityAnalyzer  (can the original be reused?)
//!              └─► UpdateEngine       (inbound field overwrite)
//!                        │
//!                        ▼
//!              Registry / TypeMetadata (replica-meta)
//! ```
//!
//! Every operation dispatches on the runtime kind of each value it meets,
//! compares references by identity, and fails atomically: no partial copy
//! or partial update is ever handed back.
//!
//! # Example
//!
//! ```
//! use replica_core::Replicator;
//! use replica_meta::{FieldSpec, Registry, TypeSpec};
//! use replica_model::{AccessError, FromValue, IntoValue, Object, RecordRef, Value};
//!
//! #[derive(Debug, Default)]
//! struct Note {
//!     text: Option<String>,
//! }
//!
//! impl Object for Note {
//!     fn get(&mut self, field: &str) -> Result<Value, AccessError> {
//!         match field {
//!             "text" => Ok(self.text.clone().into_value()),
//!             _ => Err(AccessError::unknown_field("Note", field)),
//!         }
//!     }
//!
//!     fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
//!         match field {
//!             "text" => self.text = Option::from_value(value)?,
//!             _ => return Err(AccessError::unknown_field("Note", field)),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.register(
//!     TypeSpec::constructible::<Note>()
//!         .participates()
//!         .field(FieldSpec::new("text").include()),
//! );
//!
//! let original = Value::Record(RecordRef::new(Note { text: Some("hi".into()) }));
//! let replicator = Replicator::new(&registry);
//!
//! let copy = replicator.duplicate(&original).unwrap();
//! assert!(!copy.same(&original));
//! assert_eq!(copy.as_record().unwrap().get("text").unwrap(), Value::text("hi"));
//!
//! // Nothing forces a copy, so the original is handed back
//! let reused = replicator.reuse_or_duplicate(&original).unwrap();
//! assert!(reused.same(&original));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cloner;
mod config;
mod error;
mod necessity;
mod path;
mod replicator;
mod traverse;
mod update;

// Re-exports
pub use cloner::GraphCloner;
pub use config::ReplicaConfig;
pub use error::{ReplicaError, StructuralReason};
pub use necessity::NecessityAnalyzer;
pub use path::{FieldPath, Segment};
pub use replicator::Replicator;
pub use update::UpdateEngine;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
