//! Per-table data quality audit.
//!
//! First of the two validation passes: null/blank detection on
//! critical columns, numeric range checks against declared domains,
//! categorical domain membership, primary-key uniqueness, and the
//! per-table business rules. Read-only; findings only.
//!
//! Canonical tolerances (one per invariant):
//!   - zone percentage groups: 100 ± 0.1
//!   - market share sums:      100 ± 1.0
//!   - campaign conversion sanity band: 1%..15% (warning only)

use crate::{
    campaign::CampaignResponse,
    competitive::CompetitiveMarket,
    config::{GenConfig, UrbanClass, LIFESTYLE_CLUSTERS},
    customer::CustomerRecord,
    economic::EconomicRecord,
    geography::ZoneRecord,
    interaction::InteractionRecord,
    lifestyle::LifestyleRecord,
    pipeline::DatasetBundle,
    report::ValidationReport,
    usage::UsageRecord,
};
use std::collections::HashSet;

pub const PCT_GROUP_TOLERANCE: f64 = 0.1;
pub const SHARE_SUM_TOLERANCE: f64 = 1.0;

/// Audit all eight tables and roll the findings into one report.
pub fn audit_all(bundle: &DatasetBundle, cfg: &GenConfig) -> ValidationReport {
    let mut report = ValidationReport::new("DATA QUALITY AUDIT");
    audit_zones(&bundle.zones, &mut report);
    audit_economics(&bundle.economics, &mut report);
    audit_markets(&bundle.markets, &mut report);
    audit_lifestyles(&bundle.lifestyles, &mut report);
    audit_customers(&bundle.customers, cfg, &mut report);
    audit_usage(&bundle.usage, &mut report);
    audit_interactions(&bundle.interactions, &mut report);
    audit_campaigns(&bundle.campaigns, &mut report);
    report
}

// ── Generic column checks ────────────────────────────────────────────────────

fn check_blank<'a>(
    report: &mut ValidationReport,
    table: &str,
    column: &str,
    values: impl Iterator<Item = &'a str>,
) {
    let blanks = values.filter(|v| v.trim().is_empty()).count();
    if blanks == 0 {
        report.pass(table, "nulls", format!("{column}: no blank values"));
    } else {
        report.fail(
            table,
            "nulls",
            format!("{column}: {blanks} blank values in a critical column"),
            blanks as u64,
        );
    }
}

fn check_unique<'a>(
    report: &mut ValidationReport,
    table: &str,
    column: &str,
    values: impl Iterator<Item = &'a str>,
) {
    let mut seen = HashSet::new();
    let mut total = 0usize;
    let mut dupes = 0usize;
    for v in values {
        total += 1;
        if !seen.insert(v) {
            dupes += 1;
        }
    }
    if dupes == 0 {
        report.pass(table, "uniqueness", format!("{column}: all {total} values unique"));
    } else {
        report.fail(
            table,
            "uniqueness",
            format!("{column}: {dupes} duplicate values"),
            dupes as u64,
        );
    }
}

fn check_range(
    report: &mut ValidationReport,
    table: &str,
    column: &str,
    values: impl Iterator<Item = f64>,
    lo: f64,
    hi: f64,
) {
    let mut out_of_range = 0usize;
    let mut observed_min = f64::INFINITY;
    let mut observed_max = f64::NEG_INFINITY;
    for v in values {
        // NaN never satisfies the bounds, so it counts as out of range.
        if !(v >= lo && v <= hi) {
            out_of_range += 1;
        }
        observed_min = observed_min.min(v);
        observed_max = observed_max.max(v);
    }
    if out_of_range == 0 {
        report.pass(
            table,
            "range",
            format!("{column}: {observed_min:.2}..{observed_max:.2} within [{lo}, {hi}]"),
        );
    } else {
        report.fail(
            table,
            "range",
            format!(
                "{column}: {out_of_range} values outside [{lo}, {hi}] \
                 (observed {observed_min:.2}..{observed_max:.2})"
            ),
            out_of_range as u64,
        );
    }
}

fn check_categorical<'a>(
    report: &mut ValidationReport,
    table: &str,
    column: &str,
    values: impl Iterator<Item = &'a str>,
    domain: &[&str],
) {
    let mut invalid: HashSet<&str> = HashSet::new();
    let mut invalid_rows = 0usize;
    for v in values {
        if !domain.contains(&v) {
            invalid.insert(v);
            invalid_rows += 1;
        }
    }
    if invalid.is_empty() {
        report.pass(table, "categorical", format!("{column}: all values in domain"));
    } else {
        let mut labels: Vec<&str> = invalid.into_iter().collect();
        labels.sort_unstable();
        report.fail(
            table,
            "categorical",
            format!("{column}: invalid values {labels:?}"),
            invalid_rows as u64,
        );
    }
}

fn check_pct_group_sum(
    report: &mut ValidationReport,
    table: &str,
    group: &str,
    sums: impl Iterator<Item = f64>,
    failure: bool,
) {
    let off: Vec<f64> = sums.filter(|s| (s - 100.0).abs() > PCT_GROUP_TOLERANCE).collect();
    if off.is_empty() {
        report.pass(table, "pct_sum", format!("{group}: sums to 100 ± {PCT_GROUP_TOLERANCE}"));
    } else if failure {
        report.fail(
            table,
            "pct_sum",
            format!("{group}: {} rows off 100 ± {PCT_GROUP_TOLERANCE}", off.len()),
            off.len() as u64,
        );
    } else {
        report.warn(
            table,
            "pct_sum",
            format!("{group}: {} rows off 100 ± {PCT_GROUP_TOLERANCE}", off.len()),
        );
    }
}

// ── Per-table audits ─────────────────────────────────────────────────────────

pub fn audit_zones(zones: &[ZoneRecord], report: &mut ValidationReport) {
    let t = "zip_demographics";
    check_blank(report, t, "zip_code", zones.iter().map(|z| z.zip_code.as_str()));
    check_blank(report, t, "state_code", zones.iter().map(|z| z.state_code.as_str()));
    check_unique(report, t, "zip_code", zones.iter().map(|z| z.zip_code.as_str()));
    check_range(
        report, t, "median_household_income",
        zones.iter().map(|z| z.median_household_income as f64),
        20_000.0, 300_000.0,
    );
    check_range(
        report, t, "total_population",
        zones.iter().map(|z| z.total_population as f64),
        100.0, 1_000_000.0,
    );
    check_range(report, t, "median_age", zones.iter().map(|z| z.median_age), 20.0, 70.0);
    check_categorical(
        report, t, "urban_rural_class",
        zones.iter().map(|z| z.urban_rural_class.as_str()),
        &UrbanClass::ALL.map(|c| c.as_str()),
    );
    check_pct_group_sum(
        report, t, "age_buckets",
        zones.iter().map(|z| {
            z.pct_age_18_24 + z.pct_age_25_34 + z.pct_age_35_44
                + z.pct_age_45_54 + z.pct_age_55_64 + z.pct_age_65_plus
        }),
        true,
    );
    check_pct_group_sum(
        report, t, "income_brackets",
        zones.iter().map(|z| {
            z.pct_income_under_25k + z.pct_income_25k_50k + z.pct_income_50k_75k
                + z.pct_income_75k_100k + z.pct_income_100k_150k + z.pct_income_150k_plus
        }),
        false,
    );
    check_pct_group_sum(
        report, t, "race",
        zones.iter().map(|z| {
            z.pct_white + z.pct_black + z.pct_hispanic + z.pct_asian + z.pct_other_race
        }),
        false,
    );
}

pub fn audit_economics(economics: &[EconomicRecord], report: &mut ValidationReport) {
    let t = "economic_indicators";
    check_blank(report, t, "zip_code", economics.iter().map(|e| e.zip_code.as_str()));
    check_unique(report, t, "zip_code", economics.iter().map(|e| e.zip_code.as_str()));
    check_range(
        report, t, "cost_of_living_index",
        economics.iter().map(|e| e.cost_of_living_index),
        60.0, 200.0,
    );
    check_range(
        report, t, "unemployment_rate",
        economics.iter().map(|e| e.unemployment_rate),
        1.0, 15.0,
    );
    check_range(
        report, t, "avg_credit_score",
        economics.iter().map(|e| e.avg_credit_score as f64),
        550.0, 850.0,
    );
    check_range(report, t, "poverty_rate", economics.iter().map(|e| e.poverty_rate), 0.0, 50.0);
}

pub fn audit_markets(markets: &[CompetitiveMarket], report: &mut ValidationReport) {
    let t = "competitive_landscape";
    check_blank(report, t, "dma_code", markets.iter().map(|m| m.dma_code.as_str()));
    check_blank(report, t, "dma_name", markets.iter().map(|m| m.dma_name.as_str()));
    check_unique(report, t, "dma_code", markets.iter().map(|m| m.dma_code.as_str()));
    check_range(
        report, t, "snowmobile_market_share",
        markets.iter().map(|m| m.snowmobile_market_share),
        5.0, 40.0,
    );
    // Domains cover the post-normalization range: rescaling by
    // 100/sum can pull a raw share below its sampling floor.
    check_range(report, t, "vz_market_share", markets.iter().map(|m| m.vz_market_share), 10.0, 45.0);
    check_range(report, t, "att_market_share", markets.iter().map(|m| m.att_market_share), 10.0, 40.0);
    check_range(report, t, "tmo_market_share", markets.iter().map(|m| m.tmo_market_share), 10.0, 40.0);

    let off = markets
        .iter()
        .map(|m| {
            m.snowmobile_market_share + m.vz_market_share + m.att_market_share
                + m.tmo_market_share + m.regional_market_share
        })
        .filter(|total| (total - 100.0).abs() > SHARE_SUM_TOLERANCE)
        .count();
    if off == 0 {
        report.pass(t, "share_sum", format!("carrier shares sum to 100 ± {SHARE_SUM_TOLERANCE}"));
    } else {
        report.fail(
            t,
            "share_sum",
            format!("{off} markets with shares off 100 ± {SHARE_SUM_TOLERANCE}"),
            off as u64,
        );
    }
}

pub fn audit_lifestyles(lifestyles: &[LifestyleRecord], report: &mut ValidationReport) {
    let t = "lifestyle_segments";
    check_blank(report, t, "zip_code", lifestyles.iter().map(|l| l.zip_code.as_str()));
    check_blank(
        report, t, "primary_lifestyle",
        lifestyles.iter().map(|l| l.primary_lifestyle.as_str()),
    );
    check_unique(report, t, "zip_code", lifestyles.iter().map(|l| l.zip_code.as_str()));
    check_range(
        report, t, "tech_adoption_score",
        lifestyles.iter().map(|l| l.tech_adoption_score as f64),
        0.0, 100.0,
    );
    check_range(
        report, t, "price_sensitivity_index",
        lifestyles.iter().map(|l| l.price_sensitivity_index as f64),
        0.0, 100.0,
    );
    check_range(
        report, t, "brand_loyalty_index",
        lifestyles.iter().map(|l| l.brand_loyalty_index as f64),
        0.0, 100.0,
    );
    check_range(
        report, t, "switching_propensity",
        lifestyles.iter().map(|l| l.switching_propensity),
        0.0, 100.0,
    );
    check_categorical(
        report, t, "primary_lifestyle",
        lifestyles.iter().map(|l| l.primary_lifestyle.as_str()),
        &LIFESTYLE_CLUSTERS,
    );
    check_pct_group_sum(
        report, t, "channel_preferences",
        lifestyles.iter().map(|l| {
            l.pref_channel_digital + l.pref_channel_phone + l.pref_channel_store
                + l.pref_channel_chat
        }),
        false,
    );
}

pub fn audit_customers(
    customers: &[CustomerRecord],
    cfg: &GenConfig,
    report: &mut ValidationReport,
) {
    let t = "customers";
    for (column, values) in [
        ("customer_id", customers.iter().map(|c| c.customer_id.as_str()).collect::<Vec<_>>()),
        ("account_id", customers.iter().map(|c| c.account_id.as_str()).collect()),
        ("zip_code", customers.iter().map(|c| c.zip_code.as_str()).collect()),
        ("state_code", customers.iter().map(|c| c.state_code.as_str()).collect()),
        ("plan_name", customers.iter().map(|c| c.plan_name.as_str()).collect()),
    ] {
        check_blank(report, t, column, values.into_iter());
    }
    check_unique(report, t, "customer_id", customers.iter().map(|c| c.customer_id.as_str()));

    check_range(report, t, "age", customers.iter().map(|c| c.age as f64), 18.0, 100.0);
    check_range(
        report, t, "tenure_months",
        customers.iter().map(|c| c.tenure_months as f64),
        1.0, 120.0,
    );
    // Multi-line family accounts can run well past the plan ceiling.
    check_range(report, t, "monthly_arpu", customers.iter().map(|c| c.monthly_arpu), 10.0, 800.0);
    check_range(
        report, t, "churn_risk_score",
        customers.iter().map(|c| c.churn_risk_score),
        0.01, 0.99,
    );
    check_range(
        report, t, "app_engagement_score",
        customers.iter().map(|c| c.app_engagement_score),
        0.0, 1.0,
    );
    check_range(
        report, t, "lines_on_account",
        customers.iter().map(|c| c.lines_on_account as f64),
        1.0, 10.0,
    );

    let plan_names: Vec<&str> = cfg.plans.iter().map(|p| p.name).collect();
    let state_codes: Vec<&str> = cfg.states.iter().map(|s| s.code).collect();
    check_categorical(
        report, t, "gender",
        customers.iter().map(|c| c.gender.as_str()),
        &["M", "F", "Other", "Unknown"],
    );
    check_categorical(
        report, t, "plan_name",
        customers.iter().map(|c| c.plan_name.as_str()),
        &plan_names,
    );
    check_categorical(
        report, t, "plan_category",
        customers.iter().map(|c| c.plan_category.as_str()),
        &["Prepaid", "Postpaid"],
    );
    check_categorical(
        report, t, "device_os",
        customers.iter().map(|c| c.device_os.as_str()),
        &["iOS", "Android"],
    );
    check_categorical(
        report, t, "device_tier",
        customers.iter().map(|c| c.device_tier.as_str()),
        &["Flagship", "Mid", "Budget"],
    );
    check_categorical(
        report, t, "credit_class",
        customers.iter().map(|c| c.credit_class.as_str()),
        &["A", "B", "C", "D"],
    );
    check_categorical(
        report, t, "payment_method",
        customers.iter().map(|c| c.payment_method.as_str()),
        &["AutoPay", "Card", "Manual", "Cash"],
    );
    check_categorical(
        report, t, "state_code",
        customers.iter().map(|c| c.state_code.as_str()),
        &state_codes,
    );

    // Business rules are deterministic constraints, not tendencies.
    let bad_prepaid = customers
        .iter()
        .filter(|c| c.plan_name == "Glacier" && c.plan_category != "Prepaid")
        .count();
    if bad_prepaid == 0 {
        report.pass(t, "business_rules", "Glacier is always Prepaid");
    } else {
        report.fail(
            t,
            "business_rules",
            format!("{bad_prepaid} Glacier customers not marked Prepaid"),
            bad_prepaid as u64,
        );
    }

    let family_min = cfg.plan("Avalanche").min_lines as i64;
    let short_family = customers
        .iter()
        .filter(|c| c.plan_name == "Avalanche" && c.lines_on_account < family_min)
        .count();
    if short_family == 0 {
        report.pass(t, "business_rules", format!("Avalanche always has >= {family_min} lines"));
    } else {
        report.fail(
            t,
            "business_rules",
            format!("{short_family} Avalanche customers below {family_min} lines"),
            short_family as u64,
        );
    }

    // Optional columns carry expected nulls; note the rates only.
    let nps_nulls = customers.iter().filter(|c| c.nps_score.is_none()).count();
    report.pass(
        t,
        "nulls",
        format!(
            "nps_score: {} nulls ({:.1}%) expected for optional survey field",
            nps_nulls,
            nps_nulls as f64 / customers.len().max(1) as f64 * 100.0
        ),
    );
}

pub fn audit_usage(usage: &[UsageRecord], report: &mut ValidationReport) {
    let t = "monthly_usage";
    check_blank(report, t, "usage_id", usage.iter().map(|u| u.usage_id.as_str()));
    check_blank(report, t, "customer_id", usage.iter().map(|u| u.customer_id.as_str()));
    check_unique(report, t, "usage_id", usage.iter().map(|u| u.usage_id.as_str()));

    // The declared primary key is the (customer, billing month) pair.
    let mut seen = HashSet::new();
    let dupes = usage
        .iter()
        .filter(|u| !seen.insert((u.customer_id.as_str(), u.billing_month)))
        .count();
    if dupes == 0 {
        report.pass(t, "uniqueness", "(customer_id, billing_month): no duplicate pairs");
    } else {
        report.fail(
            t,
            "uniqueness",
            format!("(customer_id, billing_month): {dupes} duplicate pairs"),
            dupes as u64,
        );
    }

    check_range(report, t, "data_usage_gb", usage.iter().map(|u| u.data_usage_gb), 0.0, 200.0);
    check_range(
        report, t, "voice_minutes_onnet",
        usage.iter().map(|u| u.voice_minutes_onnet as f64),
        0.0, 5_000.0,
    );
    check_range(
        report, t, "voice_minutes_offnet",
        usage.iter().map(|u| u.voice_minutes_offnet as f64),
        0.0, 3_000.0,
    );
    check_range(report, t, "total_bill", usage.iter().map(|u| u.total_bill), 0.0, 800.0);
    check_range(
        report, t, "data_usage_4g_pct",
        usage.iter().map(|u| u.data_usage_4g_pct),
        0.0, 100.0,
    );
    check_range(
        report, t, "data_usage_5g_pct",
        usage.iter().map(|u| u.data_usage_5g_pct),
        0.0, 100.0,
    );
    check_categorical(
        report, t, "payment_status",
        usage.iter().map(|u| u.payment_status.as_str()),
        &["Paid", "Pending", "Late", "Failed", "Partial", "Unpaid"],
    );
}

pub fn audit_interactions(interactions: &[InteractionRecord], report: &mut ValidationReport) {
    let t = "support_interactions";
    check_blank(report, t, "interaction_id", interactions.iter().map(|i| i.interaction_id.as_str()));
    check_blank(report, t, "customer_id", interactions.iter().map(|i| i.customer_id.as_str()));
    check_blank(report, t, "channel", interactions.iter().map(|i| i.channel.as_str()));
    check_blank(report, t, "category", interactions.iter().map(|i| i.category.as_str()));
    check_unique(report, t, "interaction_id", interactions.iter().map(|i| i.interaction_id.as_str()));
    check_categorical(
        report, t, "channel",
        interactions.iter().map(|i| i.channel.as_str()),
        &["App", "Chat", "Call", "Email", "Store", "Social"],
    );
    check_categorical(
        report, t, "category",
        interactions.iter().map(|i| i.category.as_str()),
        &["Billing", "Technical", "Sales", "Complaint", "General", "Account"],
    );
    check_categorical(
        report, t, "resolution_status",
        interactions.iter().map(|i| i.resolution_status.as_str()),
        &["Resolved", "Pending", "Escalated", "Transferred", "Unresolved"],
    );
    check_range(
        report, t, "sentiment_score",
        interactions.iter().map(|i| i.sentiment_score),
        -1.0, 1.0,
    );
    check_range(
        report, t, "resolution_time_hours",
        interactions.iter().map(|i| i.resolution_time_hours),
        0.0, 500.0,
    );
    check_range(report, t, "csat_score", interactions.iter().map(|i| i.csat_score as f64), 1.0, 5.0);
}

pub fn audit_campaigns(campaigns: &[CampaignResponse], report: &mut ValidationReport) {
    let t = "campaign_responses";
    check_blank(report, t, "response_id", campaigns.iter().map(|c| c.response_id.as_str()));
    check_blank(report, t, "customer_id", campaigns.iter().map(|c| c.customer_id.as_str()));
    check_unique(report, t, "response_id", campaigns.iter().map(|c| c.response_id.as_str()));
    check_categorical(
        report, t, "campaign_type",
        campaigns.iter().map(|c| c.campaign_type.as_str()),
        &["Retention", "Upsell", "Cross-sell", "Win-back", "Loyalty", "Seasonal"],
    );
    check_categorical(
        report, t, "channel",
        campaigns.iter().map(|c| c.channel.as_str()),
        &["Email", "SMS", "App Push", "Direct Mail", "Call"],
    );
    check_categorical(
        report, t, "response_type",
        campaigns.iter().map(|c| c.response_type.as_str()),
        &[
            "Opened", "Clicked", "Converted", "Unsubscribed", "No Response",
            "Ignored", "Bounced", "Complained", "Declined", "Accepted",
        ],
    );

    // clicked ⇒ opened ⇒ delivered, and converted ⇒ responded.
    let broken_funnel = campaigns
        .iter()
        .filter(|c| {
            (c.opened && !c.delivered)
                || (c.clicked && !c.opened)
                || (c.responded && !c.clicked)
                || (c.converted && !c.responded)
        })
        .count();
    if broken_funnel == 0 {
        report.pass(t, "funnel", "funnel flags are monotone");
    } else {
        report.fail(
            t,
            "funnel",
            format!("{broken_funnel} rows violate funnel monotonicity"),
            broken_funnel as u64,
        );
    }

    let unresponded_with_value = campaigns
        .iter()
        .filter(|c| !c.responded && (c.converted || c.conversion_value != 0.0))
        .count();
    if unresponded_with_value == 0 {
        report.pass(t, "funnel", "non-responders carry no conversion value");
    } else {
        report.fail(
            t,
            "funnel",
            format!("{unresponded_with_value} non-responders with conversion data"),
            unresponded_with_value as u64,
        );
    }

    if !campaigns.is_empty() {
        let converted = campaigns.iter().filter(|c| c.converted).count();
        let rate = converted as f64 / campaigns.len() as f64 * 100.0;
        if (1.0..=15.0).contains(&rate) {
            report.pass(t, "conversion_rate", format!("overall conversion {rate:.2}%"));
        } else {
            report.warn(
                t,
                "conversion_rate",
                format!("overall conversion {rate:.2}% outside the 1%..15% sanity band"),
            );
        }
    }
}
