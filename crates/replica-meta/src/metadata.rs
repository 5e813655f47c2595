//! Built type metadata
//!
//! [`build_metadata`] flattens a type's ancestor chain into a
//! [`TypeMetadata`]: the ordered, validated list of policy-bearing fields.

use crate::error::MetaError;
use crate::registry::Registry;
use crate::spec::{FieldKind, FieldSpec};
use replica_model::{RecordRef, TypeKey};
use replica_policy::{Disposition, DuplicationPolicy, InboundDisposition, InboundPolicy, Projection};
use std::collections::HashSet;

/// Validated metadata of one policy-bearing field
#[derive(Debug, Clone)]
pub struct FieldMetadata {
    name: &'static str,
    owner: TypeKey,
    duplication: DuplicationPolicy,
    inbound: InboundPolicy,
    kind: FieldKind,
}

impl FieldMetadata {
    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declaring type (the type itself or an ancestor)
    #[inline]
    #[must_use]
    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    /// Declared kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Include/exclude markers
    #[inline]
    #[must_use]
    pub fn duplication(&self) -> &DuplicationPolicy {
        &self.duplication
    }

    /// Duplication disposition under `projection`
    #[inline]
    #[must_use]
    pub fn disposition(&self, projection: Option<Projection>) -> Disposition {
        self.duplication.resolve(projection)
    }

    /// Inbound disposition under `projection`
    #[inline]
    #[must_use]
    pub fn inbound(&self, projection: Option<Projection>) -> InboundDisposition {
        self.inbound.resolve(projection)
    }
}

/// Validated metadata of one participating record type
#[derive(Debug, Clone)]
pub struct TypeMetadata {
    key: TypeKey,
    chain: Vec<TypeKey>,
    fields: Vec<FieldMetadata>,
    constructor: Option<fn() -> RecordRef>,
}

impl TypeMetadata {
    /// Runtime type
    #[inline]
    #[must_use]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// The type followed by its ancestors, nearest first
    #[inline]
    #[must_use]
    pub fn chain(&self) -> &[TypeKey] {
        &self.chain
    }

    /// Policy-bearing fields, outermost ancestor's first
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldMetadata] {
        &self.fields
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True if a fresh instance can be constructed
    #[inline]
    #[must_use]
    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Construct a fresh instance through the no-argument path
    #[must_use]
    pub fn construct(&self) -> Option<RecordRef> {
        self.constructor.map(|make| make())
    }
}

/// Build metadata for `key` from the registrations in `registry`
///
/// Pure with respect to the registry: building twice yields equivalent
/// metadata, so concurrent first builds may race harmlessly.
///
/// # Errors
/// - [`MetaError::Unregistered`] if `key` or a declared ancestor is unknown
/// - [`MetaError::InheritanceCycle`] if the ancestor chain loops
/// - [`MetaError::NotParticipating`] if no type in the chain participates
/// - [`MetaError::StaticField`] / [`MetaError::FinalField`] for ill-placed markers
/// - [`MetaError::PolicyConflict`] for illegal include/exclude combinations
pub fn build_metadata(registry: &Registry, key: TypeKey) -> Result<TypeMetadata, MetaError> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut participates = false;
    let mut declared: Vec<(TypeKey, Vec<FieldSpec>)> = Vec::new();
    let mut constructor = None;

    let mut cursor = Some(key);
    while let Some(current) = cursor {
        if !seen.insert(current) {
            return Err(MetaError::InheritanceCycle(current));
        }
        let spec = registry
            .spec(current)
            .ok_or(MetaError::Unregistered(current))?;

        if current == key {
            constructor = spec.constructor;
        }
        participates |= spec.participates;
        chain.push(current);
        cursor = spec.parent;
        declared.push((current, spec.fields));
    }

    if !participates {
        return Err(MetaError::NotParticipating(key));
    }

    let mut fields = Vec::new();
    for (owner, specs) in declared.into_iter().rev() {
        for spec in specs.into_iter().filter(FieldSpec::is_policy_bearing) {
            fields.push(validate_field(owner, spec)?);
        }
    }

    Ok(TypeMetadata {
        key,
        chain,
        fields,
        constructor,
    })
}

fn validate_field(owner: TypeKey, spec: FieldSpec) -> Result<FieldMetadata, MetaError> {
    let field = spec.name;
    if spec.is_static {
        return Err(MetaError::StaticField { owner, field });
    }
    if spec.is_final {
        return Err(MetaError::FinalField { owner, field });
    }

    let duplication = DuplicationPolicy::new(spec.include, spec.exclude);
    duplication
        .validate()
        .map_err(|source| MetaError::PolicyConflict {
            owner,
            field,
            source,
        })?;

    Ok(FieldMetadata {
        name: field,
        owner,
        duplication,
        inbound: InboundPolicy::new(spec.inbound),
        kind: spec.kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::TypeSpec;
    use pretty_assertions::assert_eq;
    use replica_model::{AccessError, Object, Value};
    use replica_policy::ProjectionMarker;

    macro_rules! empty_record {
        ($name:ident) => {
            #[derive(Debug, Default)]
            struct $name;

            impl Object for $name {
                fn get(&mut self, field: &str) -> Result<Value, AccessError> {
                    Err(AccessError::unknown_field(stringify!($name), field))
                }

                fn set(&mut self, field: &str, _value: Value) -> Result<(), AccessError> {
                    Err(AccessError::unknown_field(stringify!($name), field))
                }
            }
        };
    }

    empty_record!(Root);
    empty_record!(Middle);
    empty_record!(Leaf);
    empty_record!(Loner);

    struct Summary;
    impl ProjectionMarker for Summary {}

    fn names(meta: &TypeMetadata) -> Vec<&'static str> {
        meta.fields().iter().map(FieldMetadata::name).collect()
    }

    #[test]
    fn collects_fields_across_chain() {
        let registry = Registry::new();
        registry.register(
            TypeSpec::of::<Root>()
                .field(FieldSpec::new("id").include())
                .field(FieldSpec::new("notes")),
        );
        registry.register(
            TypeSpec::of::<Middle>()
                .extends::<Root>()
                .field(FieldSpec::new("owner").exclude()),
        );
        registry.register(
            TypeSpec::constructible::<Leaf>()
                .extends::<Middle>()
                .participates()
                .field(FieldSpec::new("total").include().inbound()),
        );

        let meta = build_metadata(&registry, TypeKey::of::<Leaf>()).unwrap();
        assert_eq!(names(&meta), vec!["id", "owner", "total"]);
        assert_eq!(
            meta.chain(),
            &[TypeKey::of::<Leaf>(), TypeKey::of::<Middle>(), TypeKey::of::<Root>()]
        );
        assert_eq!(meta.field("id").unwrap().owner(), TypeKey::of::<Root>());
        assert!(meta.is_constructible());
    }

    #[test]
    fn participation_may_come_from_ancestor() {
        let registry = Registry::new();
        registry.register(TypeSpec::of::<Root>().participates());
        registry.register(
            TypeSpec::of::<Leaf>()
                .extends::<Root>()
                .field(FieldSpec::new("x").include()),
        );

        let meta = build_metadata(&registry, TypeKey::of::<Leaf>()).unwrap();
        assert!(!meta.is_constructible());
        assert_eq!(
            meta.field("x").unwrap().disposition(None),
            Disposition::Include
        );
    }

    #[test]
    fn rejects_non_participating() {
        let registry = Registry::new();
        registry.register(TypeSpec::of::<Loner>().field(FieldSpec::new("x").include()));

        assert_eq!(
            build_metadata(&registry, TypeKey::of::<Loner>()).unwrap_err(),
            MetaError::NotParticipating(TypeKey::of::<Loner>())
        );
    }

    #[test]
    fn rejects_static_and_final() {
        let registry = Registry::new();
        registry.register(
            TypeSpec::of::<Root>()
                .participates()
                .field(FieldSpec::new("count").include().static_field()),
        );
        registry.register(
            TypeSpec::of::<Leaf>()
                .participates()
                .field(FieldSpec::new("id").inbound().final_field()),
        );

        assert!(matches!(
            build_metadata(&registry, TypeKey::of::<Root>()),
            Err(MetaError::StaticField { field: "count", .. })
        ));
        assert!(matches!(
            build_metadata(&registry, TypeKey::of::<Leaf>()),
            Err(MetaError::FinalField { field: "id", .. })
        ));
    }

    #[test]
    fn unmarked_static_field_is_ignored() {
        let registry = Registry::new();
        registry.register(
            TypeSpec::of::<Root>()
                .participates()
                .field(FieldSpec::new("count").static_field()),
        );
        assert!(build_metadata(&registry, TypeKey::of::<Root>()).is_ok());
    }

    #[test]
    fn rejects_conflicting_markers() {
        let registry = Registry::new();
        registry.register(
            TypeSpec::of::<Root>().participates().field(
                FieldSpec::new("x")
                    .include_for([Projection::of::<Summary>()])
                    .exclude_for([Projection::of::<Summary>()]),
            ),
        );

        let err = build_metadata(&registry, TypeKey::of::<Root>()).unwrap_err();
        assert!(matches!(err, MetaError::PolicyConflict { field: "x", .. }));
    }

    #[test]
    fn missing_ancestor_is_unregistered() {
        let registry = Registry::new();
        registry.register(TypeSpec::of::<Leaf>().extends::<Middle>().participates());

        assert_eq!(
            build_metadata(&registry, TypeKey::of::<Leaf>()).unwrap_err(),
            MetaError::Unregistered(TypeKey::of::<Middle>())
        );
    }

    #[test]
    fn detects_inheritance_cycle() {
        let registry = Registry::new();
        registry.register(TypeSpec::of::<Root>().extends::<Leaf>().participates());
        registry.register(TypeSpec::of::<Leaf>().extends::<Root>());

        assert!(matches!(
            build_metadata(&registry, TypeKey::of::<Leaf>()),
            Err(MetaError::InheritanceCycle(_))
        ));
    }
}
