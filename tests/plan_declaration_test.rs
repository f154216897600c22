use stripe_plans::{plan, registry, Interval, MetadataValue, PlanError};

// Every test uses its own identifiers: they all share the process-wide registry.
stripe_plans::plan_keys! {
    PRIMO => "primo",
    DAILY => "daily",
    WEEKLY => "weekly",
    MONTHLY => "monthly",
    YEARLY => "yearly",
    DESCRIBED => "described",
}

#[test]
fn test_declared_plan_is_accessible_every_way() {
    let primo = plan("primo", |plan| {
        plan.name("Acme as a service PRIMO")
            .amount(699)
            .interval("month")
            .interval_count(3)
            .trial_period_days(30)
            .metadata_entry("number_of_awesome_things", 5)
            .statement_descriptor("Acme Primo");
    })
    .unwrap();

    // Fixed name
    assert_eq!(PRIMO.get().unwrap(), primo);
    assert_eq!(registry().lookup_constant("PRIMO").unwrap(), primo);

    // Ordered collection
    assert!(registry().all().contains(&primo));

    // Key lookup, textual or symbolic
    assert_eq!(registry().lookup("primo").unwrap(), primo);
    assert_eq!(registry().lookup("Primo").unwrap(), primo);
    assert_eq!(registry().lookup(PRIMO).unwrap(), primo);

    assert_eq!(primo.name(), "Acme as a service PRIMO");
    assert_eq!(primo.amount(), 699);
    assert_eq!(primo.interval(), Interval::Month);
    assert_eq!(primo.interval_count(), 3);
    assert_eq!(primo.trial_period_days(), 30);
    assert_eq!(
        primo.metadata().unwrap().get("number_of_awesome_things"),
        Some(&MetadataValue::Integer(5))
    );
    assert_eq!(primo.statement_descriptor(), Some("Acme Primo"));

    registry().remove(PRIMO);
    assert!(PRIMO.get().is_none());
}

#[test]
fn test_accepts_every_billing_interval() {
    let cases = [
        (DAILY, "Acme as a service daily", 100, "day", Interval::Day),
        (WEEKLY, "Acme as a service weekly", 100, "week", Interval::Week),
        (MONTHLY, "Acme as a service monthly", 400, "month", Interval::Month),
        (YEARLY, "Acme as a service yearly", 4800, "year", Interval::Year),
    ];

    for (key, name, amount, interval, expected) in cases {
        plan(key.identifier(), |plan| {
            plan.name(name).amount(amount).interval(interval);
        })
        .unwrap();

        let declared = key.get().unwrap();
        assert_eq!(declared.interval(), expected);
        assert_eq!(declared.currency(), "usd");
        registry().remove(key);
    }
}

#[test]
fn test_denies_arbitrary_billing_interval() {
    let err = plan("broken", |plan| {
        plan.name("Acme as a service BROKEN")
            .amount(999)
            .interval("anything");
    })
    .unwrap_err();

    assert!(err.is_invalid_configuration());
    assert_eq!(err.violations().len(), 1);
    assert_eq!(err.violations()[0].field, "interval");
    assert!(!registry().contains("broken"));
}

#[test]
fn test_statement_descriptor_limit() {
    let err = plan("described", |plan| {
        plan.name("Acme as a service")
            .amount(999)
            .interval("month")
            .statement_descriptor("ACME as a Service Monthly");
    })
    .unwrap_err();

    match &err {
        PlanError::InvalidConfiguration { plan, violations } => {
            assert_eq!(plan, "described");
            assert_eq!(violations[0].field, "statement_descriptor");
            assert!(violations[0].reason.contains("25 characters"));
        }
        other => panic!("expected InvalidConfiguration, got {other:?}"),
    }
    assert!(DESCRIBED.get().is_none());

    // The failed declaration left nothing behind, so the name is still free.
    let described = plan("described", |plan| {
        plan.name("Acme as a service")
            .amount(999)
            .interval("month")
            .statement_descriptor("ACME Monthly");
    })
    .unwrap();
    assert_eq!(described.statement_descriptor(), Some("ACME Monthly"));
    registry().remove(DESCRIBED);
}

#[test]
fn test_empty_declaration_reports_all_missing_fields() {
    let err = plan("empty_declaration", |_| {}).unwrap_err();

    let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
    assert_eq!(fields, vec!["name", "amount", "interval"]);
    assert!(!registry().contains("empty_declaration"));
}

#[test]
fn test_redeclaring_is_rejected() {
    plan("redeclared", |plan| {
        plan.name("First").amount(100).interval("month");
    })
    .unwrap();

    let err = plan("REDECLARED", |plan| {
        plan.name("Second").amount(200).interval("year");
    })
    .unwrap_err();

    assert!(err.is_duplicate());
    assert_eq!(registry().lookup("redeclared").unwrap().name(), "First");
    registry().remove("redeclared");
}
