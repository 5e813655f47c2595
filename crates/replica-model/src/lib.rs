//! Replica Object Model
//!
//! The runtime shape of graphs handled by the replication engine.
//!
//! # Core Concepts
//!
//! - [`Value`]: Node of an object graph, dispatched on at runtime
//! - [`Object`]: Record with named, possibly lazy, field accessors
//! - [`RecordRef`]: Identity-bearing handle to a record and its [`TypeKey`]
//! - [`ArrayRef`] / [`ContainerRef`]: Arrays and typed containers
//! - [`Identity`]: Reference identity, the basis of sharing and cycle detection
//!
//! Handles are `Rc`-based: graphs are built and traversed on one thread.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod array;
mod container;
mod convert;
mod error;
mod object;
mod timestamp;
mod value;

// Re-exports
pub use array::ArrayRef;
pub use container::{ContainerData, ContainerRef, ContainerShape, ContainerType};
pub use convert::{FromValue, IntoValue};
pub use error::AccessError;
pub use object::{AsAny, Object, RecordRef, TypeKey};
pub use timestamp::TimestampRef;
pub use value::{Identity, Value, ValueKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
