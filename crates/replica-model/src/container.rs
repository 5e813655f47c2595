//! Multi-element containers
//!
//! A [`ContainerRef`] carries its exact runtime [`ContainerType`]. Built-in
//! types are provided as constants; a user-defined container "subclass" is
//! a [`ContainerType::custom`] sharing a built-in's shape under its own name.

use crate::error::AccessError;
use crate::value::{Identity, Value};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// Structural category of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerShape {
    /// Ordered, duplicates allowed
    Sequence,
    /// Unique elements, insertion ordered
    Set,
    /// Unique keys mapped to values, insertion ordered
    Map,
}

impl Display for ContainerShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sequence => "sequence",
            Self::Set => "set",
            Self::Map => "map",
        };
        f.write_str(name)
    }
}

/// Exact runtime type of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerType {
    name: &'static str,
    shape: ContainerShape,
}

impl ContainerType {
    /// Growable vector
    pub const VEC: Self = Self::custom("Vec", ContainerShape::Sequence);
    /// Doubly linked list
    pub const LINKED_LIST: Self = Self::custom("LinkedList", ContainerShape::Sequence);
    /// Hash set
    pub const HASH_SET: Self = Self::custom("HashSet", ContainerShape::Set);
    /// Insertion-ordered set
    pub const ORDERED_SET: Self = Self::custom("OrderedSet", ContainerShape::Set);
    /// Hash map
    pub const HASH_MAP: Self = Self::custom("HashMap", ContainerShape::Map);
    /// Insertion-ordered map
    pub const ORDERED_MAP: Self = Self::custom("OrderedMap", ContainerShape::Map);

    /// All built-in container types
    pub const BUILTIN: [Self; 6] = [
        Self::VEC,
        Self::LINKED_LIST,
        Self::HASH_SET,
        Self::ORDERED_SET,
        Self::HASH_MAP,
        Self::ORDERED_MAP,
    ];

    /// Container type with its own name
    #[inline]
    #[must_use]
    pub const fn custom(name: &'static str, shape: ContainerShape) -> Self {
        Self { name, shape }
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Structural category
    #[inline]
    #[must_use]
    pub fn shape(&self) -> ContainerShape {
        self.shape
    }
}

impl Display for ContainerType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Container contents
#[derive(Debug, Clone)]
pub enum ContainerData {
    /// Sequence elements
    Sequence(Vec<Value>),
    /// Set elements
    Set(IndexSet<Value>),
    /// Map entries
    Map(IndexMap<Value, Value>),
}

impl ContainerData {
    /// Empty contents of `shape`
    #[must_use]
    pub fn empty(shape: ContainerShape) -> Self {
        match shape {
            ContainerShape::Sequence => Self::Sequence(Vec::new()),
            ContainerShape::Set => Self::Set(IndexSet::new()),
            ContainerShape::Map => Self::Map(IndexMap::new()),
        }
    }

    /// Number of elements or entries
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(v) => v.len(),
            Self::Set(s) => s.len(),
            Self::Map(m) => m.len(),
        }
    }

    /// True if there are no elements
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct Container {
    ty: ContainerType,
    data: ContainerData,
}

/// Shared handle to a container
#[derive(Clone)]
pub struct ContainerRef(Rc<RefCell<Container>>);

impl ContainerRef {
    /// Empty container of `ty`
    #[must_use]
    pub fn new(ty: ContainerType) -> Self {
        Self(Rc::new(RefCell::new(Container {
            ty,
            data: ContainerData::empty(ty.shape()),
        })))
    }

    /// Sequence or set populated from `values`
    ///
    /// # Errors
    /// Returns [`AccessError::ShapeMismatch`] for map types.
    pub fn from_values(
        ty: ContainerType,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self, AccessError> {
        let container = Self::new(ty);
        for v in values {
            container.push(v)?;
        }
        Ok(container)
    }

    /// Map populated from `entries`
    ///
    /// # Errors
    /// Returns [`AccessError::ShapeMismatch`] for non-map types.
    pub fn from_entries(
        ty: ContainerType,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Result<Self, AccessError> {
        let container = Self::new(ty);
        for (k, v) in entries {
            container.insert(k, v)?;
        }
        Ok(container)
    }

    /// Exact runtime type
    #[inline]
    #[must_use]
    pub fn container_type(&self) -> ContainerType {
        self.0.borrow().ty
    }

    /// Append to a sequence or add to a set
    ///
    /// # Errors
    /// Returns [`AccessError::ShapeMismatch`] for maps.
    pub fn push(&self, value: Value) -> Result<(), AccessError> {
        let mut c = self.0.borrow_mut();
        match &mut c.data {
            ContainerData::Sequence(v) => v.push(value),
            ContainerData::Set(s) => {
                s.insert(value);
            }
            ContainerData::Map(_) => {
                return Err(AccessError::ShapeMismatch {
                    operation: "push",
                    shape: ContainerShape::Map,
                })
            }
        }
        Ok(())
    }

    /// Insert a map entry, returning the replaced value
    ///
    /// # Errors
    /// Returns [`AccessError::ShapeMismatch`] for sequences and sets.
    pub fn insert(&self, key: Value, value: Value) -> Result<Option<Value>, AccessError> {
        let mut c = self.0.borrow_mut();
        let shape = c.ty.shape();
        match &mut c.data {
            ContainerData::Map(m) => Ok(m.insert(key, value)),
            _ => Err(AccessError::ShapeMismatch {
                operation: "insert",
                shape,
            }),
        }
    }

    /// Element at `index` of a sequence or set
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        match &self.0.borrow().data {
            ContainerData::Sequence(v) => v.get(index).cloned(),
            ContainerData::Set(s) => s.get_index(index).cloned(),
            ContainerData::Map(_) => None,
        }
    }

    /// Value mapped to `key`
    #[must_use]
    pub fn lookup(&self, key: &Value) -> Option<Value> {
        match &self.0.borrow().data {
            ContainerData::Map(m) => m.get(key).cloned(),
            _ => None,
        }
    }

    /// Number of elements or entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().data.len()
    }

    /// True if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the contents
    #[must_use]
    pub fn snapshot(&self) -> ContainerData {
        self.0.borrow().data.clone()
    }

    /// Reference identity
    #[inline]
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::of(Rc::as_ptr(&self.0))
    }

    /// True if both handles point at the same container
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ContainerRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(c) => write!(f, "{}[{}]@{}", c.ty, c.data.len(), self.identity()),
            Err(_) => write!(f, "Container@{}", self.identity()),
        }
    }
}
