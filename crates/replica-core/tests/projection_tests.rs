use pretty_assertions::assert_eq;
use replica_core::Replicator;
use replica_model::{TypeKey, Value};
use replica_policy::{Disposition, Projection};
use replica_test_utils::fixtures::*;
use replica_test_utils::{field, fixture_registry, record};

fn projected() -> Value {
    record(Projected {
        summary_only: Some(1),
        detail_not_summary: Some(2),
        both: Some(3),
    })
}

fn copied_fields(replicator: &Replicator<'_>, projection: Option<Projection>) -> [Value; 3] {
    let copy = replicator.duplicate_with(&projected(), projection).unwrap();
    [
        field(&copy, "summary_only"),
        field(&copy, "detail_not_summary"),
        field(&copy, "both"),
    ]
}

#[test]
fn test_default_projection_copies_unscoped_and_lone_includes() {
    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);

    assert_eq!(
        copied_fields(&replicator, None),
        [Value::Null, Value::Null, Value::Int(3)]
    );
}

#[test]
fn test_summary_projection() {
    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);

    assert_eq!(
        copied_fields(&replicator, Some(summary())),
        [Value::Int(1), Value::Null, Value::Int(3)]
    );
}

#[test]
fn test_detail_projection() {
    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);

    assert_eq!(
        copied_fields(&replicator, Some(detail())),
        [Value::Null, Value::Int(2), Value::Int(3)]
    );
}

#[test]
fn test_unlisted_projection_copies_nothing_scoped() {
    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);

    assert_eq!(
        copied_fields(&replicator, Some(audit())),
        [Value::Null, Value::Null, Value::Null]
    );
}

#[test]
fn test_duplicate_as_matches_duplicate_with() {
    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);

    let copy = replicator.duplicate_as(&projected(), summary()).unwrap();
    assert_eq!(field(&copy, "summary_only"), Value::Int(1));
}

#[test]
fn test_necessity_depends_on_projection() {
    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);

    let only_shared = record(Projected {
        summary_only: None,
        detail_not_summary: None,
        both: Some(3),
    });
    for projection in [None, Some(summary()), Some(detail()), Some(audit())] {
        assert!(!replicator
            .needs_independent_copy(&only_shared, projection)
            .unwrap());
    }

    // excluded by default and under Detail, included under Summary
    let summary_state = record(Projected {
        summary_only: Some(1),
        detail_not_summary: None,
        both: None,
    });
    assert!(replicator.needs_independent_copy(&summary_state, None).unwrap());
    assert!(!replicator
        .needs_independent_copy(&summary_state, Some(summary()))
        .unwrap());
    assert!(replicator
        .needs_independent_copy(&summary_state, Some(detail()))
        .unwrap());

    // excluded only under Summary
    let detail_state = record(Projected {
        summary_only: None,
        detail_not_summary: Some(2),
        both: None,
    });
    assert!(!replicator.needs_independent_copy(&detail_state, None).unwrap());
    assert!(replicator
        .needs_independent_copy(&detail_state, Some(summary()))
        .unwrap());
    assert!(!replicator
        .needs_independent_copy(&detail_state, Some(detail()))
        .unwrap());
}

#[test]
fn test_reuse_or_duplicate_as_honors_projection() {
    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);

    let original = record(Projected {
        summary_only: Some(1),
        detail_not_summary: None,
        both: None,
    });

    let reused = replicator
        .reuse_or_duplicate_as(&original, summary())
        .unwrap();
    assert!(reused.same(&original));

    let copied = replicator.reuse_or_duplicate_as(&original, detail()).unwrap();
    assert!(!copied.same(&original));
    assert_eq!(field(&copied, "summary_only"), Value::Null);
}

#[test]
fn test_disposition_table() {
    use Disposition::{Exclude as E, Include as I, Unspecified as U};

    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);
    let key = TypeKey::of::<Dispositions>();

    // (field, default, Summary, Detail)
    let table = [
        ("plain", U, U, U),
        ("kept", I, I, I),
        ("dropped", E, E, E),
        ("kept_on_summary", I, I, U),
        ("dropped_on_summary", E, E, U),
        ("only_summary", E, I, E),
        ("all_but_summary", I, E, I),
        ("summary_not_detail", U, I, E),
    ];

    for (name, default, on_summary, on_detail) in table {
        let resolved = (
            replicator.disposition(key, name, None).unwrap(),
            replicator.disposition(key, name, Some(summary())).unwrap(),
            replicator.disposition(key, name, Some(detail())).unwrap(),
        );
        assert_eq!(resolved, (default, on_summary, on_detail), "field {name}");
    }

    assert_eq!(replicator.disposition(key, "missing", None).unwrap(), U);
}

#[test]
fn test_disposition_surfaces_introspection_errors() {
    let registry = fixture_registry();
    let replicator = Replicator::new(&registry);

    let err = replicator
        .disposition(TypeKey::of::<BothUnscoped>(), "field", None)
        .unwrap_err();
    assert!(err.is_policy_conflict());
}
