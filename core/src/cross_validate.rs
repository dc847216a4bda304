//! Cross-table validation.
//!
//! Second validation pass: referential integrity between the eight
//! tables, the plan business rules, and the statistical sanity checks
//! that tie internal behavior to the external context (ARPU ordering,
//! usage-by-plan ordering, sentiment gaps, income→ARPU direction).
//! Read-only; findings only.

use crate::{
    audit::SHARE_SUM_TOLERANCE,
    pipeline::DatasetBundle,
    report::ValidationReport,
};
use std::collections::{HashMap, HashSet};

/// Run every cross-table check and return the combined report.
pub fn cross_validate(bundle: &DatasetBundle) -> ValidationReport {
    let mut report = ValidationReport::new("CROSS-FILE VALIDATION");
    check_customer_references(bundle, &mut report);
    check_zone_references(bundle, &mut report);
    check_dma_references(bundle, &mut report);
    check_plan_rules(bundle, &mut report);
    check_usage_correlation(bundle, &mut report);
    check_interaction_patterns(bundle, &mut report);
    check_campaign_patterns(bundle, &mut report);
    check_external_relevance(bundle, &mut report);
    check_market_share_sums(bundle, &mut report);
    report
}

// ── 1. Customer ID integrity ─────────────────────────────────────────────────

fn check_customer_references(bundle: &DatasetBundle, report: &mut ValidationReport) {
    let t = "referential";
    let customer_ids: HashSet<&str> =
        bundle.customers.iter().map(|c| c.customer_id.as_str()).collect();

    let dangling_usage = bundle
        .usage
        .iter()
        .filter(|u| !customer_ids.contains(u.customer_id.as_str()))
        .count();
    if dangling_usage == 0 {
        report.pass(t, "usage->customers", "all usage rows reference valid customers");
    } else {
        report.fail(
            t,
            "usage->customers",
            format!("{dangling_usage} usage rows reference unknown customers"),
            dangling_usage as u64,
        );
    }

    let dangling_interactions = bundle
        .interactions
        .iter()
        .filter(|i| !customer_ids.contains(i.customer_id.as_str()))
        .count();
    if dangling_interactions == 0 {
        report.pass(t, "interactions->customers", "all interaction rows reference valid customers");
    } else {
        report.fail(
            t,
            "interactions->customers",
            format!("{dangling_interactions} interaction rows reference unknown customers"),
            dangling_interactions as u64,
        );
    }

    let dangling_campaigns = bundle
        .campaigns
        .iter()
        .filter(|c| !customer_ids.contains(c.customer_id.as_str()))
        .count();
    if dangling_campaigns == 0 {
        report.pass(t, "campaigns->customers", "all campaign rows reference valid customers");
    } else {
        report.fail(
            t,
            "campaigns->customers",
            format!("{dangling_campaigns} campaign rows reference unknown customers"),
            dangling_campaigns as u64,
        );
    }

    let covered: HashSet<&str> =
        bundle.usage.iter().map(|u| u.customer_id.as_str()).collect();
    let coverage = covered.len() as f64 / customer_ids.len().max(1) as f64 * 100.0;
    if coverage > 95.0 {
        report.pass(t, "usage_coverage", format!("usage covers {coverage:.1}% of customers"));
    } else {
        report.warn(t, "usage_coverage", format!("usage covers only {coverage:.1}% of customers"));
    }
}

// ── 2. Zone / geography consistency ──────────────────────────────────────────

fn check_zone_references(bundle: &DatasetBundle, report: &mut ValidationReport) {
    let t = "geography";
    let zone_codes: HashSet<&str> =
        bundle.zones.iter().map(|z| z.zip_code.as_str()).collect();
    let econ_codes: HashSet<&str> =
        bundle.economics.iter().map(|e| e.zip_code.as_str()).collect();
    let lifestyle_codes: HashSet<&str> =
        bundle.lifestyles.iter().map(|l| l.zip_code.as_str()).collect();

    for (check, table_codes) in [
        ("customers->zones", &zone_codes),
        ("customers->economics", &econ_codes),
        ("customers->lifestyles", &lifestyle_codes),
    ] {
        let missing = bundle
            .customers
            .iter()
            .filter(|c| !table_codes.contains(c.zip_code.as_str()))
            .count();
        if missing == 0 {
            report.pass(t, check, "every customer zone resolves");
        } else {
            report.fail(
                t,
                check,
                format!("{missing} customers in zones missing from the target table"),
                missing as u64,
            );
        }
    }

    if zone_codes == econ_codes && zone_codes == lifestyle_codes {
        report.pass(
            t,
            "external_zone_coverage",
            format!("all 3 per-zone external tables cover the same {} zones", zone_codes.len()),
        );
    } else {
        report.warn(t, "external_zone_coverage", "per-zone external tables diverge in coverage");
    }

    let zone_state: HashMap<&str, &str> = bundle
        .zones
        .iter()
        .map(|z| (z.zip_code.as_str(), z.state_code.as_str()))
        .collect();
    let state_mismatches = bundle
        .customers
        .iter()
        .filter(|c| {
            zone_state
                .get(c.zip_code.as_str())
                .is_some_and(|s| *s != c.state_code)
        })
        .count();
    if state_mismatches == 0 {
        report.pass(t, "state_consistency", "customer state codes match zone demographics");
    } else {
        report.fail(
            t,
            "state_consistency",
            format!("{state_mismatches} customers disagree with their zone's state"),
            state_mismatches as u64,
        );
    }
}

// ── 3. DMA consistency ───────────────────────────────────────────────────────

fn check_dma_references(bundle: &DatasetBundle, report: &mut ValidationReport) {
    let t = "markets";
    let market_codes: HashSet<&str> =
        bundle.markets.iter().map(|m| m.dma_code.as_str()).collect();
    let customer_dmas: HashSet<&str> =
        bundle.customers.iter().map(|c| c.dma_code.as_str()).collect();

    let missing: Vec<&str> = customer_dmas
        .iter()
        .filter(|d| !market_codes.contains(**d))
        .copied()
        .collect();
    if missing.is_empty() {
        report.pass(
            t,
            "customers->markets",
            format!("all {} customer DMAs have competitive data", customer_dmas.len()),
        );
    } else {
        let pct = missing.len() as f64 / customer_dmas.len().max(1) as f64 * 100.0;
        let affected = bundle
            .customers
            .iter()
            .filter(|c| missing.contains(&c.dma_code.as_str()))
            .count();
        if pct < 5.0 {
            report.warn(
                t,
                "customers->markets",
                format!("{} customer DMAs ({pct:.1}%) missing competitive data", missing.len()),
            );
        } else {
            report.fail(
                t,
                "customers->markets",
                format!("{} customer DMAs ({pct:.1}%) missing competitive data", missing.len()),
                affected as u64,
            );
        }
    }
}

// ── 4. Plan business rules ───────────────────────────────────────────────────

fn check_plan_rules(bundle: &DatasetBundle, report: &mut ValidationReport) {
    let t = "plans";

    let glacier: Vec<_> =
        bundle.customers.iter().filter(|c| c.plan_name == "Glacier").collect();
    let non_prepaid = glacier.iter().filter(|c| c.plan_category != "Prepaid").count();
    if non_prepaid == 0 {
        report.pass(t, "prepaid_rule", "all Glacier customers are Prepaid");
    } else {
        report.fail(
            t,
            "prepaid_rule",
            format!("{non_prepaid} Glacier customers are not Prepaid"),
            non_prepaid as u64,
        );
    }

    let avalanche: Vec<_> =
        bundle.customers.iter().filter(|c| c.plan_name == "Avalanche").collect();
    let short_lines = avalanche.iter().filter(|c| c.lines_on_account < 3).count();
    if short_lines == 0 {
        report.pass(t, "family_lines_rule", "all Avalanche customers have 3+ lines");
    } else {
        report.fail(
            t,
            "family_lines_rule",
            format!("{short_lines} Avalanche customers below 3 lines"),
            short_lines as u64,
        );
    }

    // ARPU should rise with plan tier (single-line tiers).
    let tier_order = ["Glacier", "Flurry", "Powder", "Blizzard", "Summit"];
    let mean_arpu: Vec<f64> = tier_order
        .iter()
        .map(|plan| {
            let values: Vec<f64> = bundle
                .customers
                .iter()
                .filter(|c| c.plan_name == *plan)
                .map(|c| c.monthly_arpu)
                .collect();
            mean(&values)
        })
        .collect();
    let monotone = mean_arpu.windows(2).all(|w| w[0] < w[1] || w[1].is_nan());
    if monotone {
        report.pass(t, "arpu_by_tier", "mean ARPU increases with plan tier");
    } else {
        report.warn(
            t,
            "arpu_by_tier",
            format!("mean ARPU not monotone across tiers: {mean_arpu:.2?}"),
        );
    }
}

// ── 5. Usage ↔ customer correlation ──────────────────────────────────────────

fn check_usage_correlation(bundle: &DatasetBundle, report: &mut ValidationReport) {
    let t = "usage";

    let mut bills: HashMap<&str, (f64, f64)> = HashMap::new();
    let mut data: HashMap<&str, (f64, f64)> = HashMap::new();
    for u in &bundle.usage {
        let b = bills.entry(u.customer_id.as_str()).or_insert((0.0, 0.0));
        b.0 += u.total_bill;
        b.1 += 1.0;
        let d = data.entry(u.customer_id.as_str()).or_insert((0.0, 0.0));
        d.0 += u.data_usage_gb;
        d.1 += 1.0;
    }

    let mut arpu_series = Vec::new();
    let mut bill_series = Vec::new();
    for c in &bundle.customers {
        if let Some((total, n)) = bills.get(c.customer_id.as_str()) {
            arpu_series.push(c.monthly_arpu);
            bill_series.push(total / n);
        }
    }
    let r = pearson(&arpu_series, &bill_series);
    if r > 0.5 {
        report.pass(t, "arpu_bill_correlation", format!("ARPU tracks billed amounts (r={r:.2})"));
    } else {
        report.warn(t, "arpu_bill_correlation", format!("weak ARPU/bill correlation (r={r:.2})"));
    }

    // Heavier plans should use more data on average.
    let avg_data_for = |plan: &str| {
        let values: Vec<f64> = bundle
            .customers
            .iter()
            .filter(|c| c.plan_name == plan)
            .filter_map(|c| data.get(c.customer_id.as_str()).map(|(total, n)| total / n))
            .collect();
        mean(&values)
    };
    let flurry = avg_data_for("Flurry");
    let powder = avg_data_for("Powder");
    let blizzard = avg_data_for("Blizzard");
    if blizzard > powder && powder > flurry {
        report.pass(t, "data_by_plan", "data usage increases with plan tier");
    } else {
        report.warn(
            t,
            "data_by_plan",
            format!("data usage not ordered by tier: Flurry {flurry:.1}, Powder {powder:.1}, Blizzard {blizzard:.1}"),
        );
    }
}

// ── 6. Interaction patterns ──────────────────────────────────────────────────

fn check_interaction_patterns(bundle: &DatasetBundle, report: &mut ValidationReport) {
    let t = "interactions";

    let mut per_customer: HashMap<&str, usize> = HashMap::new();
    for i in &bundle.interactions {
        *per_customer.entry(i.customer_id.as_str()).or_default() += 1;
    }
    let cohort_mean = |lo: f64, hi: f64| {
        let counts: Vec<f64> = bundle
            .customers
            .iter()
            .filter(|c| c.churn_risk_score > lo && c.churn_risk_score < hi)
            .map(|c| *per_customer.get(c.customer_id.as_str()).unwrap_or(&0) as f64)
            .collect();
        mean(&counts)
    };
    let high_risk = cohort_mean(0.5, 1.0);
    let low_risk = cohort_mean(0.0, 0.3);
    if high_risk > low_risk {
        report.pass(
            t,
            "risk_interaction_volume",
            format!("high-risk customers interact more ({high_risk:.2} vs {low_risk:.2})"),
        );
    } else {
        report.warn(
            t,
            "risk_interaction_volume",
            format!("no interaction lift for high-risk cohort ({high_risk:.2} vs {low_risk:.2})"),
        );
    }

    let complaint_sentiment = mean(
        &bundle
            .interactions
            .iter()
            .filter(|i| i.category == "Complaint")
            .map(|i| i.sentiment_score)
            .collect::<Vec<_>>(),
    );
    let other_sentiment = mean(
        &bundle
            .interactions
            .iter()
            .filter(|i| i.category != "Complaint")
            .map(|i| i.sentiment_score)
            .collect::<Vec<_>>(),
    );
    if complaint_sentiment < other_sentiment {
        report.pass(
            t,
            "complaint_sentiment",
            format!("complaints read more negative ({complaint_sentiment:.2} vs {other_sentiment:.2})"),
        );
    } else {
        report.warn(
            t,
            "complaint_sentiment",
            format!("complaint sentiment not below other categories ({complaint_sentiment:.2} vs {other_sentiment:.2})"),
        );
    }
}

// ── 7. Campaign patterns ─────────────────────────────────────────────────────

fn check_campaign_patterns(bundle: &DatasetBundle, report: &mut ValidationReport) {
    let t = "campaigns";
    let conversion_for = |campaign_type: &str| {
        let rows: Vec<_> = bundle
            .campaigns
            .iter()
            .filter(|c| c.campaign_type == campaign_type)
            .collect();
        if rows.is_empty() {
            f64::NAN
        } else {
            rows.iter().filter(|c| c.converted).count() as f64 / rows.len() as f64
        }
    };

    let retention = conversion_for("Retention");
    let win_back = conversion_for("Win-back");
    if retention.is_nan() || win_back.is_nan() {
        report.warn(t, "retention_vs_winback", "not enough rows to compare conversion");
    } else if retention > win_back {
        report.pass(
            t,
            "retention_vs_winback",
            format!(
                "retention converts better ({:.2}% vs {:.2}%)",
                retention * 100.0,
                win_back * 100.0
            ),
        );
    } else {
        report.warn(
            t,
            "retention_vs_winback",
            format!(
                "retention does not out-convert win-back ({:.2}% vs {:.2}%)",
                retention * 100.0,
                win_back * 100.0
            ),
        );
    }
}

// ── 8. External data relevance ───────────────────────────────────────────────

fn check_external_relevance(bundle: &DatasetBundle, report: &mut ValidationReport) {
    let t = "external";
    let zone_income: HashMap<&str, i64> = bundle
        .zones
        .iter()
        .map(|z| (z.zip_code.as_str(), z.median_household_income))
        .collect();

    let arpu_where = |pred: &dyn Fn(i64) -> bool| {
        let values: Vec<f64> = bundle
            .customers
            .iter()
            .filter(|c| zone_income.get(c.zip_code.as_str()).is_some_and(|i| pred(*i)))
            .map(|c| c.monthly_arpu)
            .collect();
        mean(&values)
    };
    let high_income_arpu = arpu_where(&|i| i > 100_000);
    let low_income_arpu = arpu_where(&|i| i < 50_000);
    if high_income_arpu.is_nan() || low_income_arpu.is_nan() {
        report.warn(t, "income_arpu", "not enough rows in the income cohorts");
    } else if high_income_arpu > low_income_arpu {
        report.pass(
            t,
            "income_arpu",
            format!(
                "high-income zones carry higher ARPU (${high_income_arpu:.2} vs ${low_income_arpu:.2})"
            ),
        );
    } else {
        report.warn(
            t,
            "income_arpu",
            format!(
                "income→ARPU direction unexpected (${high_income_arpu:.2} vs ${low_income_arpu:.2})"
            ),
        );
    }
}

// ── 9. Market share sums ─────────────────────────────────────────────────────

fn check_market_share_sums(bundle: &DatasetBundle, report: &mut ValidationReport) {
    let t = "markets";
    let off = bundle
        .markets
        .iter()
        .filter(|m| {
            let total = m.snowmobile_market_share
                + m.vz_market_share
                + m.att_market_share
                + m.tmo_market_share
                + m.regional_market_share;
            (total - 100.0).abs() > SHARE_SUM_TOLERANCE
        })
        .count();
    if off == 0 {
        report.pass(
            t,
            "share_sum",
            format!("carrier shares sum to 100 ± {SHARE_SUM_TOLERANCE} in every market"),
        );
    } else {
        report.fail(
            t,
            "share_sum",
            format!("{off} markets with carrier shares off 100 ± {SHARE_SUM_TOLERANCE}"),
            off as u64,
        );
    }
}

// ── Small statistics helpers ─────────────────────────────────────────────────

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }
    if vx == 0.0 || vy == 0.0 {
        0.0
    } else {
        cov / (vx.sqrt() * vy.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pearson_detects_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_handles_degenerate_series() {
        assert_eq!(pearson(&[1.0, 1.0], &[2.0, 3.0]), 0.0);
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
    }
}
