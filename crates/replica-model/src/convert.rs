//! Conversions between field types and [`Value`]
//!
//! Used by [`Object`](crate::Object) implementations to expose typed
//! storage through the untyped accessor interface.

use crate::array::ArrayRef;
use crate::container::ContainerRef;
use crate::error::AccessError;
use crate::object::RecordRef;
use crate::timestamp::TimestampRef;
use crate::value::Value;
use std::rc::Rc;

/// Convert a field value into a [`Value`]
pub trait IntoValue {
    /// Perform the conversion
    fn into_value(self) -> Value;
}

/// Convert a [`Value`] back into a field value
pub trait FromValue: Sized {
    /// Perform the conversion
    ///
    /// # Errors
    /// Returns [`AccessError::TypeMismatch`] if the value has the wrong kind.
    fn from_value(value: Value) -> Result<Self, AccessError>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        Ok(value)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

macro_rules! scalar_conversions {
    ($ty:ty, $variant:ident, $label:literal) => {
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self.into())
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, AccessError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(AccessError::mismatch($label, other.kind())),
                }
            }
        }
    };
}

scalar_conversions!(bool, Bool, "bool");
scalar_conversions!(char, Char, "char");
scalar_conversions!(i64, Int, "i64");
scalar_conversions!(f64, Float, "f64");
scalar_conversions!(Rc<str>, Text, "text");
scalar_conversions!(TimestampRef, Timestamp, "timestamp");
scalar_conversions!(ArrayRef, Array, "array");
scalar_conversions!(ContainerRef, Container, "container");
scalar_conversions!(RecordRef, Record, "record");

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Int(v) => i32::try_from(v).map_err(|_| AccessError::mismatch("i32", Value::Int(v).kind())),
            other => Err(AccessError::mismatch("i32", other.kind())),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Float(v) => Ok(v as f32),
            other => Err(AccessError::mismatch("f32", other.kind())),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(Rc::from(self))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Text(s) => Ok(s.to_string()),
            other => Err(AccessError::mismatch("text", other.kind())),
        }
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::text(self)
    }
}
