//! Projection tokens
//!
//! Provides [`Projection`], an identity-compared token naming a variant of
//! the field set that participates in an operation.

use std::any::TypeId;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Marker trait for projection tag types
///
/// Projections are declared as zero-sized types:
///
/// ```
/// use replica_policy::{Projection, ProjectionMarker};
///
/// struct Summary;
/// impl ProjectionMarker for Summary {}
///
/// let summary = Projection::of::<Summary>();
/// assert_eq!(summary, Projection::of::<Summary>());
/// ```
pub trait ProjectionMarker: 'static {}

/// Identity of a projection tag type
///
/// Two projections are equal only if they were created from the same tag
/// type. The name is carried for diagnostics and never compared. The
/// default projection is expressed as `None` wherever an
/// `Option<Projection>` is accepted.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    id: TypeId,
    name: &'static str,
}

impl Projection {
    /// Projection token for tag type `P`
    #[inline]
    #[must_use]
    pub fn of<P: ProjectionMarker>() -> Self {
        Self {
            id: TypeId::of::<P>(),
            name: short_name(std::any::type_name::<P>()),
        }
    }

    /// Diagnostic name of the tag type
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Projection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Projection {}

impl Hash for Projection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Projection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Render a requested projection, `None` being the default
#[must_use]
pub fn describe(projection: Option<Projection>) -> &'static str {
    projection.map_or("<default>", |p| p.name)
}

fn short_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    impl ProjectionMarker for Alpha {}

    struct Beta;
    impl ProjectionMarker for Beta {}

    #[test]
    fn equality_is_by_tag_type() {
        assert_eq!(Projection::of::<Alpha>(), Projection::of::<Alpha>());
        assert_ne!(Projection::of::<Alpha>(), Projection::of::<Beta>());
    }

    #[test]
    fn name_is_last_path_segment() {
        assert_eq!(Projection::of::<Alpha>().name(), "Alpha");
        assert_eq!(Projection::of::<Beta>().to_string(), "Beta");
    }

    #[test]
    fn describe_default() {
        assert_eq!(describe(None), "<default>");
        assert_eq!(describe(Some(Projection::of::<Alpha>())), "Alpha");
    }
}
