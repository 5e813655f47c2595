//! Declarative type and field registrations
//!
//! A [`TypeSpec`] describes one record type as its author declared it: the
//! fields declared on that type (not its ancestors), their markers, and how
//! to construct a fresh instance.

use replica_model::{Object, RecordRef, TypeKey};
use replica_policy::{Marker, Projection};

/// Declared kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// Scalar, text, array, container, or a reference of unknown type
    #[default]
    Value,
    /// Reference to a record of the given declared type
    Record(TypeKey),
}

/// Per-field declaration
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) name: &'static str,
    pub(crate) include: Option<Marker>,
    pub(crate) exclude: Option<Marker>,
    pub(crate) inbound: Option<Marker>,
    pub(crate) is_static: bool,
    pub(crate) is_final: bool,
    pub(crate) kind: FieldKind,
}

impl FieldSpec {
    /// Field without markers
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            include: None,
            exclude: None,
            inbound: None,
            is_static: false,
            is_final: false,
            kind: FieldKind::Value,
        }
    }

    /// Include under every projection not claimed by an exclude marker
    #[must_use]
    pub fn include(mut self) -> Self {
        self.include = Some(Marker::unscoped());
        self
    }

    /// Include only under `projections`
    #[must_use]
    pub fn include_for(mut self, projections: impl IntoIterator<Item = Projection>) -> Self {
        self.include = Some(Marker::scoped(projections));
        self
    }

    /// Exclude under every projection not claimed by an include marker
    #[must_use]
    pub fn exclude(mut self) -> Self {
        self.exclude = Some(Marker::unscoped());
        self
    }

    /// Exclude only under `projections`
    #[must_use]
    pub fn exclude_for(mut self, projections: impl IntoIterator<Item = Projection>) -> Self {
        self.exclude = Some(Marker::scoped(projections));
        self
    }

    /// Overwrite from inbound sources under every projection
    #[must_use]
    pub fn inbound(mut self) -> Self {
        self.inbound = Some(Marker::unscoped());
        self
    }

    /// Overwrite from inbound sources only under `projections`
    #[must_use]
    pub fn inbound_for(mut self, projections: impl IntoIterator<Item = Projection>) -> Self {
        self.inbound = Some(Marker::scoped(projections));
        self
    }

    /// Field belongs to the type rather than to instances
    #[must_use]
    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Field is fixed at construction
    #[must_use]
    pub fn final_field(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Field is declared to hold a `T` record
    #[must_use]
    pub fn record<T: 'static>(mut self) -> Self {
        self.kind = FieldKind::Record(TypeKey::of::<T>());
        self
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True if any marker is declared
    #[inline]
    #[must_use]
    pub fn is_policy_bearing(&self) -> bool {
        self.include.is_some() || self.exclude.is_some() || self.inbound.is_some()
    }
}

/// Per-type declaration
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub(crate) key: TypeKey,
    pub(crate) parent: Option<TypeKey>,
    pub(crate) participates: bool,
    pub(crate) constructor: Option<fn() -> RecordRef>,
    pub(crate) fields: Vec<FieldSpec>,
}

fn construct_default<T: Object + Default>() -> RecordRef {
    RecordRef::new(T::default())
}

impl TypeSpec {
    /// Declaration for `T` without a constructor
    #[must_use]
    pub fn of<T: Object>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            parent: None,
            participates: false,
            constructor: None,
            fields: Vec::new(),
        }
    }

    /// Declaration for `T`, constructed through `T::default()`
    #[must_use]
    pub fn constructible<T: Object + Default>() -> Self {
        Self::of::<T>().constructor(construct_default::<T>)
    }

    /// Carry the participation marker
    #[must_use]
    pub fn participates(mut self) -> Self {
        self.participates = true;
        self
    }

    /// Declare `P` as the direct ancestor
    #[must_use]
    pub fn extends<P: 'static>(mut self) -> Self {
        self.parent = Some(TypeKey::of::<P>());
        self
    }

    /// Set the no-argument construction path
    #[must_use]
    pub fn constructor(mut self, constructor: fn() -> RecordRef) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Declare a field on this type
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Declared type
    #[inline]
    #[must_use]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Direct ancestor
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<TypeKey> {
        self.parent
    }

    /// Fields declared on this type
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}
