//! Validation engine tests: a clean run must audit clean, and an
//! intentionally corrupted table must be reported with the right
//! severity and affected-row count.

use snowtwin_core::{
    audit::audit_all,
    config::GenConfig,
    cross_validate::cross_validate,
    pipeline::{DatasetBundle, Pipeline},
    report::Severity,
};

fn small_run(seed: u64) -> DatasetBundle {
    let mut cfg = GenConfig::default();
    cfg.zones = 500;
    cfg.total_customers = 2_000;
    Pipeline::new(cfg, seed).run().expect("pipeline run")
}

#[test]
fn clean_run_passes_the_audit() {
    let bundle = small_run(42);
    let report = audit_all(&bundle, &GenConfig::default());
    assert!(
        report.is_success(),
        "clean data failed the audit:\n{}",
        report.render()
    );
}

#[test]
fn clean_run_passes_cross_validation() {
    let bundle = small_run(42);
    let report = cross_validate(&bundle);
    assert!(
        report.is_success(),
        "clean data failed cross-validation:\n{}",
        report.render()
    );
}

#[test]
fn dangling_usage_rows_are_reported_with_row_counts() {
    let mut bundle = small_run(7);

    // Inject three usage rows pointing at a customer that does not
    // exist.
    let mut ghost = bundle.usage[0].clone();
    ghost.customer_id = "no-such-customer".to_string();
    for i in 0..3 {
        let mut row = ghost.clone();
        row.usage_id = format!("ghost-usage-{i}");
        bundle.usage.push(row);
    }

    let report = cross_validate(&bundle);
    assert!(!report.is_success(), "corruption was not detected");

    let finding = report
        .findings()
        .iter()
        .find(|f| f.check == "usage->customers" && f.severity == Severity::Failure)
        .expect("referential-integrity failure missing from the report");
    assert_eq!(
        finding.affected, 3,
        "affected-row count wrong: {}",
        finding.affected
    );
}

#[test]
fn duplicate_primary_keys_fail_the_audit() {
    let mut bundle = small_run(11);
    let clone = bundle.customers[0].clone();
    bundle.customers.push(clone);

    let report = audit_all(&bundle, &GenConfig::default());
    assert!(!report.is_success());
    assert!(
        report.findings().iter().any(|f| {
            f.table == "customers"
                && f.check == "uniqueness"
                && f.severity == Severity::Failure
        }),
        "duplicate customer_id not reported:\n{}",
        report.render()
    );
}

#[test]
fn out_of_domain_values_fail_the_audit() {
    let mut bundle = small_run(13);
    bundle.interactions[0].sentiment_score = 3.5;
    bundle.customers[0].plan_name = "Hailstorm".to_string();

    let report = audit_all(&bundle, &GenConfig::default());
    let failures: Vec<_> = report
        .findings()
        .iter()
        .filter(|f| f.severity == Severity::Failure)
        .collect();
    assert!(
        failures.iter().any(|f| f.table == "support_interactions" && f.check == "range"),
        "sentiment out-of-range not reported"
    );
    assert!(
        failures.iter().any(|f| f.table == "customers" && f.check == "categorical"),
        "unknown plan name not reported"
    );
}
