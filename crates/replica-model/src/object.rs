//! User-defined records
//!
//! Records implement [`Object`]: every field is read and written through
//! named accessors rather than raw storage, so implementations are free to
//! materialize values lazily on first read. Inheritance is expressed by
//! embedding the ancestor and delegating unknown field names to it.

use crate::error::AccessError;
use crate::value::{Identity, Value};
use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Runtime type of a record
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for type `T`
    #[inline]
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        let full = std::any::type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            name: full.rsplit("::").next().unwrap_or(full),
        }
    }

    /// Short type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Underlying type id
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Downcasting support for [`Object`]
pub trait AsAny: Any {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A record whose fields are reachable by name
///
/// # Example
/// ```
/// use replica_model::{AccessError, FromValue, IntoValue, Object, Value};
///
/// #[derive(Debug, Default)]
/// struct Point {
///     x: i64,
/// }
///
/// impl Object for Point {
///     fn get(&mut self, field: &str) -> Result<Value, AccessError> {
///         match field {
///             "x" => Ok(self.x.into_value()),
///             _ => Err(AccessError::unknown_field("Point", field)),
///         }
///     }
///
///     fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
///         match field {
///             "x" => self.x = i64::from_value(value)?,
///             _ => return Err(AccessError::unknown_field("Point", field)),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Object: AsAny + fmt::Debug {
    /// Read a field through its accessor
    ///
    /// Takes `&mut self` so accessors may initialize the field on first use.
    ///
    /// # Errors
    /// Returns [`AccessError::UnknownField`] if the record has no such field.
    fn get(&mut self, field: &str) -> Result<Value, AccessError>;

    /// Write a field through its accessor
    ///
    /// # Errors
    /// Returns [`AccessError`] for unknown fields or ill-typed values.
    fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError>;
}

/// Shared, identity-bearing handle to a record
#[derive(Clone)]
pub struct RecordRef {
    key: TypeKey,
    cell: Rc<RefCell<dyn Object>>,
}

impl RecordRef {
    /// Wrap a record
    #[must_use]
    pub fn new<T: Object>(record: T) -> Self {
        let cell: Rc<RefCell<dyn Object>> = Rc::new(RefCell::new(record));
        Self {
            key: TypeKey::of::<T>(),
            cell,
        }
    }

    /// Exact runtime type
    #[inline]
    #[must_use]
    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    /// Read `field` through the record's accessor
    ///
    /// # Errors
    /// Returns [`AccessError::Borrowed`] if the record is in use, otherwise
    /// whatever the accessor reports.
    pub fn get(&self, field: &str) -> Result<Value, AccessError> {
        self.try_borrow_mut()?.get(field)
    }

    /// Write `field` through the record's accessor
    ///
    /// # Errors
    /// Returns [`AccessError::Borrowed`] if the record is in use, otherwise
    /// whatever the accessor reports.
    pub fn set(&self, field: &str, value: Value) -> Result<(), AccessError> {
        self.try_borrow_mut()?.set(field, value)
    }

    /// Borrow the record
    ///
    /// # Panics
    /// Panics if the record is mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, dyn Object> {
        self.cell.borrow()
    }

    /// Run `f` on the record if it is a `T`
    ///
    /// # Panics
    /// Panics if the record is mutably borrowed.
    pub fn with<T: Object, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.cell.borrow();
        let record: &dyn Object = &*guard;
        record.as_any().downcast_ref::<T>().map(f)
    }

    /// Run `f` on the record mutably if it is a `T`
    ///
    /// # Panics
    /// Panics if the record is borrowed.
    pub fn with_mut<T: Object, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.cell.borrow_mut();
        let record: &mut dyn Object = &mut *guard;
        record.as_any_mut().downcast_mut::<T>().map(f)
    }

    /// Reference identity
    #[inline]
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::of(Rc::as_ptr(&self.cell))
    }

    /// True if both handles point at the same record
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    fn try_borrow_mut(&self) -> Result<RefMut<'_, dyn Object>, AccessError> {
        self.cell.try_borrow_mut().map_err(|_| AccessError::Borrowed {
            type_name: self.key.name(),
        })
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.key, self.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{FromValue, IntoValue};

    #[derive(Debug, Default)]
    struct Base {
        id: i64,
    }

    impl Object for Base {
        fn get(&mut self, field: &str) -> Result<Value, AccessError> {
            match field {
                "id" => Ok(self.id.into_value()),
                _ => Err(AccessError::unknown_field("Base", field)),
            }
        }

        fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
            match field {
                "id" => self.id = i64::from_value(value)?,
                _ => return Err(AccessError::unknown_field("Base", field)),
            }
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct Derived {
        base: Base,
        lazy: Option<i64>,
    }

    impl Object for Derived {
        fn get(&mut self, field: &str) -> Result<Value, AccessError> {
            match field {
                "lazy" => Ok((*self.lazy.get_or_insert(7)).into_value()),
                _ => self.base.get(field),
            }
        }

        fn set(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
            match field {
                "lazy" => self.lazy = Option::from_value(value)?,
                _ => self.base.set(field, value)?,
            }
            Ok(())
        }
    }

    #[test]
    fn type_key_equality() {
        assert_eq!(TypeKey::of::<Base>(), TypeKey::of::<Base>());
        assert_ne!(TypeKey::of::<Base>(), TypeKey::of::<Derived>());
        assert_eq!(TypeKey::of::<Base>().name(), "Base");
    }

    #[test]
    fn accessors_delegate_to_ancestor() {
        let r = RecordRef::new(Derived::default());
        r.set("id", Value::Int(42)).unwrap();
        assert_eq!(r.get("id").unwrap(), Value::Int(42));
        assert_eq!(r.with(|d: &Derived| d.base.id), Some(42));
    }

    #[test]
    fn lazy_accessor_materializes() {
        let r = RecordRef::new(Derived::default());
        assert_eq!(r.with(|d: &Derived| d.lazy), Some(None));
        assert_eq!(r.get("lazy").unwrap(), Value::Int(7));
        assert_eq!(r.with(|d: &Derived| d.lazy), Some(Some(7)));
    }

    #[test]
    fn typed_mutation_is_visible_through_accessors() {
        let r = RecordRef::new(Derived::default());
        assert_eq!(r.with_mut(|d: &mut Derived| d.base.id = 9), Some(()));
        assert_eq!(r.get("id").unwrap(), Value::Int(9));
        assert!(r.with_mut(|_: &mut Base| ()).is_none());
    }

    #[test]
    fn downcast_to_wrong_type() {
        let r = RecordRef::new(Base::default());
        assert!(r.with(|_: &Derived| ()).is_none());
        assert_eq!(r.type_key(), TypeKey::of::<Base>());
    }

    #[test]
    fn unknown_field() {
        let r = RecordRef::new(Base::default());
        assert!(matches!(
            r.get("missing"),
            Err(AccessError::UnknownField { .. })
        ));
    }
}
