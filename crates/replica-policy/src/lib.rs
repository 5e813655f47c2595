//! Replica Policy
//!
//! Declarative duplication policy for individual record fields.
//!
//! # Core Concepts
//!
//! - [`Projection`]: Identity-compared token selecting a field variant
//! - [`Marker`]: Include / exclude / inbound marker, optionally scoped
//! - [`DuplicationPolicy`]: Include + exclude pair resolved to a [`Disposition`]
//! - [`InboundPolicy`]: Inbound marker resolved to an [`InboundDisposition`]
//!
//! # Example
//!
//! ```rust
//! use replica_policy::{Disposition, DuplicationPolicy, Marker, Projection, ProjectionMarker};
//!
//! struct Public;
//! impl ProjectionMarker for Public {}
//!
//! let policy = DuplicationPolicy::new(
//!     Some(Marker::unscoped()),
//!     Some(Marker::scoped([Projection::of::<Public>()])),
//! );
//! policy.validate().unwrap();
//!
//! assert_eq!(policy.resolve(None), Disposition::Include);
//! assert_eq!(policy.resolve(Some(Projection::of::<Public>())), Disposition::Exclude);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod marker;
mod projection;
mod resolver;

// Re-exports
pub use marker::Marker;
pub use projection::{describe, Projection, ProjectionMarker};
pub use resolver::{
    ConflictReason, Disposition, DuplicationPolicy, InboundDisposition, InboundPolicy, PolicyError,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
