//! Dataset-wide invariants over a full pipeline run: referential
//! integrity, key uniqueness, bounded domains, and the deterministic
//! business rules. These must hold for every seed.

use snowtwin_core::{config::GenConfig, pipeline::Pipeline};
use std::collections::HashSet;

fn run(seed: u64) -> snowtwin_core::pipeline::DatasetBundle {
    let mut cfg = GenConfig::default();
    cfg.zones = 1000;
    cfg.total_customers = 10_000;
    Pipeline::new(cfg, seed).run().expect("pipeline run")
}

#[test]
fn every_foreign_key_resolves() {
    let bundle = run(42);

    let zone_codes: HashSet<&str> =
        bundle.zones.iter().map(|z| z.zip_code.as_str()).collect();
    let market_codes: HashSet<&str> =
        bundle.markets.iter().map(|m| m.dma_code.as_str()).collect();
    let customer_ids: HashSet<&str> =
        bundle.customers.iter().map(|c| c.customer_id.as_str()).collect();

    for c in &bundle.customers {
        assert!(zone_codes.contains(c.zip_code.as_str()), "dangling zone {}", c.zip_code);
        assert!(market_codes.contains(c.dma_code.as_str()), "dangling DMA {}", c.dma_code);
    }
    for u in &bundle.usage {
        assert!(customer_ids.contains(u.customer_id.as_str()), "dangling usage customer");
    }
    for i in &bundle.interactions {
        assert!(customer_ids.contains(i.customer_id.as_str()), "dangling interaction customer");
    }
    for c in &bundle.campaigns {
        assert!(customer_ids.contains(c.customer_id.as_str()), "dangling campaign customer");
    }
}

#[test]
fn primary_keys_are_globally_unique() {
    let bundle = run(42);

    let unique = |ids: Vec<&str>| {
        let count = ids.len();
        let set: HashSet<&str> = ids.into_iter().collect();
        assert_eq!(set.len(), count);
    };
    unique(bundle.zones.iter().map(|z| z.zip_code.as_str()).collect());
    unique(bundle.markets.iter().map(|m| m.dma_code.as_str()).collect());
    unique(bundle.customers.iter().map(|c| c.customer_id.as_str()).collect());
    unique(bundle.usage.iter().map(|u| u.usage_id.as_str()).collect());
    unique(bundle.interactions.iter().map(|i| i.interaction_id.as_str()).collect());
    unique(bundle.campaigns.iter().map(|c| c.response_id.as_str()).collect());
}

#[test]
fn bounded_attributes_stay_in_their_domains() {
    let bundle = run(7);

    for c in &bundle.customers {
        assert!(
            (0.01..=0.99).contains(&c.churn_risk_score),
            "churn risk {} outside [0.01, 0.99]",
            c.churn_risk_score
        );
    }
    for i in &bundle.interactions {
        assert!((-1.0..=1.0).contains(&i.sentiment_score));
        assert!((1..=5).contains(&i.csat_score));
    }
    for z in &bundle.zones {
        let age_sum = z.pct_age_18_24 + z.pct_age_25_34 + z.pct_age_35_44
            + z.pct_age_45_54 + z.pct_age_55_64 + z.pct_age_65_plus;
        assert!(
            (age_sum - 100.0).abs() <= 0.1,
            "zone {} age buckets sum to {age_sum}",
            z.zip_code
        );
    }
}

#[test]
fn plan_business_rules_are_deterministic() {
    let bundle = run(42);

    for c in &bundle.customers {
        if c.plan_name == "Glacier" {
            assert_eq!(c.plan_category, "Prepaid", "lowest tier must be Prepaid");
        }
        if c.plan_name == "Avalanche" {
            assert!(
                c.lines_on_account >= 3,
                "family plan with {} lines",
                c.lines_on_account
            );
        }
    }
}

#[test]
fn campaign_funnels_are_monotone() {
    let bundle = run(11);

    for r in &bundle.campaigns {
        assert!(!r.clicked || r.opened, "clicked without open");
        assert!(!r.opened || r.delivered, "opened without delivery");
        assert!(!r.converted || r.responded, "converted without response");
    }
}
