//! Dynamically typed values
//!
//! Provides [`Value`], the unit every traversal dispatches on. Scalars and
//! text carry value semantics; every other variant is a shared reference
//! with an [`Identity`].

use crate::array::ArrayRef;
use crate::container::ContainerRef;
use crate::object::RecordRef;
use crate::timestamp::TimestampRef;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Address-derived identity of a shared reference
///
/// Only meaningful while the referenced object is alive; holders that key
/// on identity must keep the reference itself alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
    pub(crate) fn of<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Runtime category of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Absent reference
    Null,
    /// Boolean scalar
    Bool,
    /// Character scalar
    Char,
    /// Integer scalar
    Int,
    /// Floating point scalar
    Float,
    /// Immutable text
    Text,
    /// Mutable point-in-time value
    Timestamp,
    /// Fixed-length array
    Array,
    /// Sequence, set or map
    Container,
    /// User-defined record
    Record,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Array => "array",
            Self::Container => "container",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}

/// A node in an object graph
///
/// Cloning a `Value` clones the handle, never the referenced object.
/// Equality and hashing compare scalars and text by value and every
/// reference variant by identity.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent reference
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Character scalar
    Char(char),
    /// Integer scalar
    Int(i64),
    /// Floating point scalar
    Float(f64),
    /// Immutable shared text
    Text(Rc<str>),
    /// Mutable point-in-time value
    Timestamp(TimestampRef),
    /// Fixed-length array
    Array(ArrayRef),
    /// Sequence, set or map
    Container(ContainerRef),
    /// User-defined record
    Record(RecordRef),
}

impl Value {
    /// Text value
    #[inline]
    #[must_use]
    pub fn text(s: &str) -> Self {
        Self::Text(Rc::from(s))
    }

    /// Runtime category
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Char(_) => ValueKind::Char,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::Array(_) => ValueKind::Array,
            Self::Container(_) => ValueKind::Container,
            Self::Record(_) => ValueKind::Record,
        }
    }

    /// True for [`Value::Null`]
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Identity of reference variants (`None` for scalars, text and null)
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Self::Timestamp(t) => Some(t.identity()),
            Self::Array(a) => Some(a.identity()),
            Self::Container(c) => Some(c.identity()),
            Self::Record(r) => Some(r.identity()),
            _ => None,
        }
    }

    /// True if both values are the same reference, or equal scalars
    #[inline]
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        self == other
    }

    /// Integer payload
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Text payload
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Record handle
    #[inline]
    #[must_use]
    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Array handle
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Container handle
    #[inline]
    #[must_use]
    pub fn as_container(&self) -> Option<&ContainerRef> {
        match self {
            Self::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Timestamp handle
    #[inline]
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&TimestampRef> {
        match self {
            Self::Timestamp(t) => Some(t),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a.ptr_eq(b),
            (Self::Array(a), Self::Array(b)) => a.ptr_eq(b),
            (Self::Container(a), Self::Container(b)) => a.ptr_eq(b),
            (Self::Record(a), Self::Record(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Char(c) => c.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(x) => x.to_bits().hash(state),
            Self::Text(s) => s.hash(state),
            Self::Timestamp(_) | Self::Array(_) | Self::Container(_) | Self::Record(_) => {
                self.identity().hash(state);
            }
        }
    }
}
