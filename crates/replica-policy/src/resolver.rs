//! Policy resolution
//!
//! Maps a field's declared markers and a requested projection to a
//! [`Disposition`] (duplication) or an [`InboundDisposition`] (inbound
//! overwrite).
//!
//! # Duplication table
//!
//! For a concrete projection `p` the first matching rule wins:
//!
//! 1. include lists `p` → `Include`
//! 2. exclude lists `p` → `Exclude`
//! 3. include unscoped → `Include`
//! 4. exclude unscoped → `Exclude`
//! 5. otherwise → `Unspecified`
//!
//! For the default projection an explicit-only marker governs only when the
//! opposing marker is absent altogether.

use crate::marker::Marker;
use crate::projection::Projection;
use serde::{Deserialize, Serialize};

/// Duplication outcome for one field under one projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    /// Field is duplicated recursively
    Include,
    /// Field is left at its freshly constructed value
    Exclude,
    /// No marker applies; field is left at its freshly constructed value
    Unspecified,
}

impl Disposition {
    /// True for [`Disposition::Include`]
    #[inline]
    #[must_use]
    pub fn is_include(self) -> bool {
        matches!(self, Self::Include)
    }
}

/// Inbound overwrite outcome for one field under one projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InboundDisposition {
    /// Field is overwritten from the source
    Copy,
    /// Field is left untouched
    Skip,
}

/// Illegal marker combination
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// Include and exclude markers disagree
    #[error("conflicting markers: {reason}")]
    Conflict {
        /// What makes the combination illegal
        reason: ConflictReason,
    },
}

/// Why an include/exclude pair is illegal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// Both markers unscoped, so the default is ambiguous
    BothUnscoped,
    /// Both markers explicitly list these projections
    Overlapping(Vec<&'static str>),
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BothUnscoped => f.write_str("include and exclude are both unscoped"),
            Self::Overlapping(names) => {
                write!(f, "projections claimed by both include and exclude: {}", names.join(", "))
            }
        }
    }
}

/// Include/exclude marker pair of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicationPolicy {
    /// Include marker, if declared
    pub include: Option<Marker>,
    /// Exclude marker, if declared
    pub exclude: Option<Marker>,
}

impl DuplicationPolicy {
    /// Create policy from optional markers
    #[inline]
    #[must_use]
    pub fn new(include: Option<Marker>, exclude: Option<Marker>) -> Self {
        Self { include, exclude }
    }

    /// Check marker legality
    ///
    /// # Errors
    /// Returns [`PolicyError::Conflict`] if both markers are unscoped, or both
    /// are scoped and share a projection.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let (Some(include), Some(exclude)) = (&self.include, &self.exclude) else {
            return Ok(());
        };

        if include.is_unscoped() && exclude.is_unscoped() {
            return Err(PolicyError::Conflict {
                reason: ConflictReason::BothUnscoped,
            });
        }

        let overlap: Vec<&'static str> = include
            .projections()
            .iter()
            .filter(|p| exclude.projections().contains(p))
            .map(Projection::name)
            .collect();

        if overlap.is_empty() {
            Ok(())
        } else {
            Err(PolicyError::Conflict {
                reason: ConflictReason::Overlapping(overlap),
            })
        }
    }

    /// Resolve the disposition for `projection` (`None` is the default)
    ///
    /// Assumes [`validate`](Self::validate) succeeded.
    #[must_use]
    pub fn resolve(&self, projection: Option<Projection>) -> Disposition {
        match projection {
            Some(_) => self.resolve_concrete(projection),
            None => self.resolve_default(),
        }
    }

    fn resolve_concrete(&self, projection: Option<Projection>) -> Disposition {
        let include = self.include.as_ref();
        let exclude = self.exclude.as_ref();

        if include.is_some_and(|m| m.lists(projection)) {
            Disposition::Include
        } else if exclude.is_some_and(|m| m.lists(projection)) {
            Disposition::Exclude
        } else if include.is_some_and(Marker::is_unscoped) {
            Disposition::Include
        } else if exclude.is_some_and(Marker::is_unscoped) {
            Disposition::Exclude
        } else {
            Disposition::Unspecified
        }
    }

    fn resolve_default(&self) -> Disposition {
        match (&self.include, &self.exclude) {
            (Some(include), Some(exclude)) => {
                if include.is_unscoped() {
                    Disposition::Include
                } else if exclude.is_unscoped() {
                    Disposition::Exclude
                } else {
                    Disposition::Unspecified
                }
            }
            (Some(_), None) => Disposition::Include,
            (None, Some(_)) => Disposition::Exclude,
            (None, None) => Disposition::Unspecified,
        }
    }
}

/// Inbound-copy marker of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundPolicy {
    /// Inbound marker, if declared
    pub marker: Option<Marker>,
}

impl InboundPolicy {
    /// Create policy from optional marker
    #[inline]
    #[must_use]
    pub fn new(marker: Option<Marker>) -> Self {
        Self { marker }
    }

    /// Resolve inbound disposition for `projection`
    #[must_use]
    pub fn resolve(&self, projection: Option<Projection>) -> InboundDisposition {
        match &self.marker {
            Some(m) if m.is_unscoped() || m.lists(projection) => InboundDisposition::Copy,
            _ => InboundDisposition::Skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectionMarker;
    use proptest::prelude::*;

    struct A;
    impl ProjectionMarker for A {}
    struct B;
    impl ProjectionMarker for B {}
    struct C;
    impl ProjectionMarker for C {}

    fn a() -> Projection {
        Projection::of::<A>()
    }
    fn b() -> Projection {
        Projection::of::<B>()
    }
    fn c() -> Projection {
        Projection::of::<C>()
    }

    fn policy(include: Option<Marker>, exclude: Option<Marker>) -> DuplicationPolicy {
        DuplicationPolicy::new(include, exclude)
    }

    fn expect(p: &DuplicationPolicy, default: Disposition, on_a: Disposition, on_b: Disposition, on_c: Disposition) {
        p.validate().unwrap();
        assert_eq!(p.resolve(None), default, "default");
        assert_eq!(p.resolve(Some(a())), on_a, "A");
        assert_eq!(p.resolve(Some(b())), on_b, "B");
        assert_eq!(p.resolve(Some(c())), on_c, "C");
    }

    use Disposition::{Exclude as X, Include as I, Unspecified as U};

    #[test]
    fn no_markers() {
        expect(&policy(None, None), U, U, U, U);
    }

    #[test]
    fn include_unscoped() {
        expect(&policy(Some(Marker::unscoped()), None), I, I, I, I);
    }

    #[test]
    fn exclude_unscoped() {
        expect(&policy(None, Some(Marker::unscoped())), X, X, X, X);
    }

    #[test]
    fn include_on_a_only() {
        expect(&policy(Some(Marker::scoped([a()])), None), I, I, U, U);
    }

    #[test]
    fn exclude_on_a_only() {
        expect(&policy(None, Some(Marker::scoped([a()]))), X, X, U, U);
    }

    #[test]
    fn include_on_a_exclude_elsewhere() {
        expect(&policy(Some(Marker::scoped([a()])), Some(Marker::unscoped())), X, I, X, X);
    }

    #[test]
    fn exclude_on_a_include_elsewhere() {
        expect(&policy(Some(Marker::unscoped()), Some(Marker::scoped([a()]))), I, X, I, I);
    }

    #[test]
    fn include_on_a_exclude_on_b() {
        expect(&policy(Some(Marker::scoped([a()])), Some(Marker::scoped([b()]))), U, I, X, U);
    }

    #[test]
    fn both_unscoped_conflict() {
        let err = policy(Some(Marker::unscoped()), Some(Marker::unscoped()))
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            PolicyError::Conflict {
                reason: ConflictReason::BothUnscoped
            }
        );
    }

    #[test]
    fn overlapping_scopes_conflict() {
        let err = policy(Some(Marker::scoped([a()])), Some(Marker::scoped([b(), a()])))
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            PolicyError::Conflict {
                reason: ConflictReason::Overlapping(vec!["A"])
            }
        );
        assert!(err.to_string().contains("A"));
    }

    #[test]
    fn inbound_resolution() {
        let absent = InboundPolicy::new(None);
        assert_eq!(absent.resolve(None), InboundDisposition::Skip);
        assert_eq!(absent.resolve(Some(a())), InboundDisposition::Skip);

        let all = InboundPolicy::new(Some(Marker::unscoped()));
        assert_eq!(all.resolve(None), InboundDisposition::Copy);
        assert_eq!(all.resolve(Some(c())), InboundDisposition::Copy);

        let only_ab = InboundPolicy::new(Some(Marker::scoped([a(), b()])));
        assert_eq!(only_ab.resolve(None), InboundDisposition::Skip);
        assert_eq!(only_ab.resolve(Some(a())), InboundDisposition::Copy);
        assert_eq!(only_ab.resolve(Some(c())), InboundDisposition::Skip);
    }

    fn marker_strategy() -> impl Strategy<Value = Option<Marker>> {
        prop_oneof![
            Just(None),
            Just(Some(Marker::unscoped())),
            Just(Some(Marker::scoped([a()]))),
            Just(Some(Marker::scoped([b()]))),
            Just(Some(Marker::scoped([a(), b()]))),
        ]
    }

    fn projection_strategy() -> impl Strategy<Value = Option<Projection>> {
        prop_oneof![Just(None), Just(Some(a())), Just(Some(b())), Just(Some(c()))]
    }

    proptest! {
        #[test]
        fn prop_explicit_listing_wins(
            include in marker_strategy(),
            exclude in marker_strategy(),
            projection in projection_strategy(),
        ) {
            let p = policy(include.clone(), exclude.clone());
            prop_assume!(p.validate().is_ok());

            if include.as_ref().is_some_and(|m| m.lists(projection)) {
                prop_assert_eq!(p.resolve(projection), Disposition::Include);
            }
            if exclude.as_ref().is_some_and(|m| m.lists(projection)) {
                prop_assert_eq!(p.resolve(projection), Disposition::Exclude);
            }
        }

        #[test]
        fn prop_single_marker_governs_default(marker in marker_strategy()) {
            prop_assume!(marker.is_some());
            prop_assert_eq!(policy(marker.clone(), None).resolve(None), Disposition::Include);
            prop_assert_eq!(policy(None, marker).resolve(None), Disposition::Exclude);
        }

        #[test]
        fn prop_unlisted_third_projection_follows_unscoped(
            include in marker_strategy(),
            exclude in marker_strategy(),
        ) {
            let p = policy(include.clone(), exclude.clone());
            prop_assume!(p.validate().is_ok());

            let expected = if include.as_ref().is_some_and(Marker::is_unscoped) {
                Disposition::Include
            } else if exclude.as_ref().is_some_and(Marker::is_unscoped) {
                Disposition::Exclude
            } else {
                Disposition::Unspecified
            };
            prop_assert_eq!(p.resolve(Some(c())), expected);
        }
    }
}
