//! Testing utilities for the replica workspace
//!
//! Shared fixture records, graph comparison helpers, and tracing setup.

#![allow(missing_docs)]

pub mod fixtures;
pub mod graph;

pub use fixtures::{fixture_registry, register_fixtures};
pub use graph::{graph_eq, reachable_references, shares_no_references};

use replica_model::{RecordRef, Value};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once per process; honors `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wrap a record as a graph root
pub fn record<T: replica_model::Object>(record: T) -> Value {
    Value::Record(RecordRef::new(record))
}

/// Read `name` off a record value
///
/// # Panics
/// Panics if `value` is not a record or has no such field.
pub fn field(value: &Value, name: &str) -> Value {
    value
        .as_record()
        .expect("value is not a record")
        .get(name)
        .unwrap_or_else(|e| panic!("reading {name}: {e}"))
}
