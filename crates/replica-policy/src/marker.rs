//! Declarative field markers
//!
//! A [`Marker`] is attached to a field to request inclusion, exclusion or
//! inbound copying. It is either unscoped (applies to every projection not
//! claimed otherwise) or scoped to an explicit, non-empty projection set.

use crate::projection::Projection;

/// Field marker, optionally scoped to projections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marker {
    projections: Vec<Projection>,
}

impl Marker {
    /// Marker applying to all projections
    #[inline]
    #[must_use]
    pub fn unscoped() -> Self {
        Self {
            projections: Vec::new(),
        }
    }

    /// Marker applying only to the given projections
    ///
    /// An empty iterator yields an unscoped marker. Duplicates are dropped.
    #[must_use]
    pub fn scoped(projections: impl IntoIterator<Item = Projection>) -> Self {
        let mut set: Vec<Projection> = Vec::new();
        for p in projections {
            if !set.contains(&p) {
                set.push(p);
            }
        }
        Self { projections: set }
    }

    /// True if no explicit projection set was given
    #[inline]
    #[must_use]
    pub fn is_unscoped(&self) -> bool {
        self.projections.is_empty()
    }

    /// True if `projection` is explicitly listed
    ///
    /// The default projection (`None`) is never a member of an explicit set.
    #[inline]
    #[must_use]
    pub fn lists(&self, projection: Option<Projection>) -> bool {
        projection.is_some_and(|p| self.projections.contains(&p))
    }

    /// Explicit projection set (empty when unscoped)
    #[inline]
    #[must_use]
    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }
}
