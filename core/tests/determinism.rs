//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Two pipelines, same seed, same record counts.
//! They must produce byte-identical output tables.
//! Any divergence is a blocker — do not merge until fixed.

use snowtwin_core::{config::GenConfig, pipeline::Pipeline, store::table_to_csv_bytes};

fn scenario_config() -> GenConfig {
    let mut cfg = GenConfig::default();
    cfg.zones = 1000;
    cfg.total_customers = 10_000;
    cfg.dmas = 210;
    cfg
}

#[test]
fn same_seed_produces_byte_identical_tables() {
    const SEED: u64 = 42;

    let bundle_a = Pipeline::new(scenario_config(), SEED).run().expect("run a");
    let bundle_b = Pipeline::new(scenario_config(), SEED).run().expect("run b");

    let customers_a = table_to_csv_bytes(&bundle_a.customers).expect("encode a");
    let customers_b = table_to_csv_bytes(&bundle_b.customers).expect("encode b");
    assert_eq!(
        customers_a, customers_b,
        "customer tables diverged under the same seed"
    );

    let usage_a = table_to_csv_bytes(&bundle_a.usage).expect("encode a");
    let usage_b = table_to_csv_bytes(&bundle_b.usage).expect("encode b");
    assert_eq!(usage_a, usage_b, "usage tables diverged under the same seed");

    // The remaining tables are covered by whole-bundle equality.
    assert_eq!(bundle_a, bundle_b, "bundles diverged under the same seed");
}

#[test]
fn different_seeds_produce_different_tables() {
    let bundle_a = Pipeline::new(scenario_config(), 42).run().expect("run a");
    let bundle_b = Pipeline::new(scenario_config(), 99).run().expect("run b");

    assert_ne!(
        bundle_a.customers, bundle_b.customers,
        "different seeds produced identical customers — seed is not being used"
    );
}
