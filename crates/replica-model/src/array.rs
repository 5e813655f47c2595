//! Fixed-length arrays

use crate::error::AccessError;
use crate::value::{Identity, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Array payload
#[derive(Debug, Clone)]
struct Array {
    element: &'static str,
    items: Vec<Value>,
}

/// Shared handle to a fixed-length array
///
/// The element type is a diagnostic label (`"i64"`, `"Order"`); length is
/// fixed at creation.
#[derive(Clone)]
pub struct ArrayRef(Rc<RefCell<Array>>);

impl ArrayRef {
    /// Create array from items
    #[must_use]
    pub fn new(element: &'static str, items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(Array { element, items })))
    }

    /// Create array of `len` nulls
    #[must_use]
    pub fn with_len(element: &'static str, len: usize) -> Self {
        Self::new(element, vec![Value::Null; len])
    }

    /// Element type label
    #[inline]
    #[must_use]
    pub fn element(&self) -> &'static str {
        self.0.borrow().element
    }

    /// Number of slots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().items.len()
    }

    /// True if the array has no slots
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read slot `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().items.get(index).cloned()
    }

    /// Overwrite slot `index`
    ///
    /// # Errors
    /// Returns [`AccessError::IndexOutOfBounds`] past the end.
    pub fn set(&self, index: usize, value: Value) -> Result<(), AccessError> {
        let mut array = self.0.borrow_mut();
        let len = array.items.len();
        let slot = array
            .items
            .get_mut(index)
            .ok_or(AccessError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Snapshot of all slots
    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        self.0.borrow().items.clone()
    }

    /// Reference identity
    #[inline]
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::of(Rc::as_ptr(&self.0))
    }

    /// True if both handles point at the same array
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(a) => write!(f, "Array<{}>[{}]@{}", a.element, a.items.len(), self.identity()),
            Err(_) => write!(f, "Array@{}", self.identity()),
        }
    }
}
