//! Field and element access errors

use crate::container::ContainerShape;
use crate::value::ValueKind;

/// Errors raised by record accessors and container/array operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Record has no accessor for this field
    #[error("no field '{field}' on {type_name}")]
    UnknownField {
        /// Record type
        type_name: &'static str,
        /// Requested field
        field: String,
    },

    /// Value kind does not fit the field
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Expected field type
        expected: &'static str,
        /// Kind of the offered value
        found: ValueKind,
    },

    /// Array index out of range
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Operation does not apply to the container's shape
    #[error("{operation} is not supported by {shape} containers")]
    ShapeMismatch {
        /// Attempted operation
        operation: &'static str,
        /// Container shape
        shape: ContainerShape,
    },

    /// Object is already mutably borrowed further up the call stack
    #[error("{type_name} is already borrowed")]
    Borrowed {
        /// Type of the busy object
        type_name: &'static str,
    },
}

impl AccessError {
    /// Create unknown-field error
    pub fn unknown_field(type_name: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name,
            field: field.into(),
        }
    }

    /// Create type-mismatch error
    #[must_use]
    pub fn mismatch(expected: &'static str, found: ValueKind) -> Self {
        Self::TypeMismatch { expected, found }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_field_display() {
        let err = AccessError::unknown_field("Order", "total");
        assert_eq!(err.to_string(), "no field 'total' on Order");
    }

    #[test]
    fn mismatch_display() {
        let err = AccessError::mismatch("i64", ValueKind::Text);
        assert_eq!(err.to_string(), "type mismatch: expected i64, found text");
    }
}
