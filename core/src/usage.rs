//! Monthly usage and billing generator.
//!
//! Emits exactly min(configured months, customer tenure) records per
//! customer, one per billing month ending at the snapshot month. Each
//! customer carries a usage trend (up/stable/down) compounded per
//! month, and a fixed month-indexed seasonal multiplier applies on top.
//!
//! At full scale this is the largest table by an order of magnitude, so
//! the generator is written against a row sink: `generate` materializes
//! a Vec, `generate_with` streams rows to any consumer (e.g. the
//! store's batched CSV writer) without holding the table in memory.

use crate::{
    config::GenConfig,
    customer::{mint_uuid, CustomerRecord},
    error::{GenError, GenResult},
    rng::GeneratorRng,
    types::{round2, round3},
};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// One billing-month row; (customer_id, billing_month) is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub usage_id: String,
    pub customer_id: String,
    pub billing_month: NaiveDate,
    pub voice_minutes_onnet: i64,
    pub voice_minutes_offnet: i64,
    pub voice_minutes_intl: i64,
    pub voice_calls_count: i64,
    pub data_usage_gb: f64,
    pub data_usage_4g_pct: f64,
    pub data_usage_5g_pct: f64,
    pub data_throttled_days: i64,
    pub sms_sent: i64,
    pub mms_sent: i64,
    pub roaming_days: i64,
    pub roaming_data_gb: f64,
    pub roaming_voice_min: i64,
    pub base_charge: f64,
    pub overage_charges: f64,
    pub roaming_charges: f64,
    pub add_on_charges: f64,
    pub discounts_applied: f64,
    pub total_bill: f64,
    pub payment_status: String,
    pub days_to_payment: i64,
}

pub struct UsageGenerator<'a> {
    config: &'a GenConfig,
}

impl<'a> UsageGenerator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self { config }
    }

    pub fn generate(
        &self,
        customers: &[CustomerRecord],
        rng: &mut GeneratorRng,
    ) -> GenResult<Vec<UsageRecord>> {
        let mut records =
            Vec::with_capacity(customers.len() * self.config.months_of_usage as usize);
        self.generate_with(customers, rng, |r| records.push(r))?;
        log::info!("usage: generated {} monthly records", records.len());
        Ok(records)
    }

    /// Streaming variant: rows go straight to the sink in row order.
    pub fn generate_with<F: FnMut(UsageRecord)>(
        &self,
        customers: &[CustomerRecord],
        rng: &mut GeneratorRng,
        mut sink: F,
    ) -> GenResult<()> {
        if customers.is_empty() {
            return Err(GenError::EmptyInput { name: "customers" });
        }

        let months_window = self.config.months_of_usage as i64;
        let snapshot_month = first_of_month(self.config.snapshot_date);

        for customer in customers {
            let plan = self.config.plan(&customer.plan_name);
            let lines = customer.lines_on_account as f64;
            let n_months = months_window.min(customer.tenure_months);

            let trend = self.config.usage_trend.sample(rng);
            let trend_factor = match trend {
                "up" => 1.02,
                "down" => 0.98,
                _ => 1.0,
            };

            for offset in 0..n_months {
                let billing_month =
                    snapshot_month - Months::new((n_months - offset - 1) as u32);
                let seasonal =
                    self.config.seasonal_factors[billing_month.month0() as usize];
                let month_trend = trend_factor.powi(offset as i32);

                let base_data = rng.normal(plan.data_usage.mean, plan.data_usage.std).max(0.0);
                let data_usage = round3(
                    (base_data * seasonal * month_trend * lines).min(plan.data_usage.max),
                );

                let (data_5g_pct, data_4g_pct) = if customer.is_5g_capable {
                    let five_g = round2(rng.normal(40.0, 20.0).clamp(0.0, 80.0));
                    (five_g, round2(100.0 - five_g))
                } else {
                    (0.0, 100.0)
                };

                let data_throttled_days =
                    if plan.is_limited() && data_usage > plan.data_usage.max * 0.9 {
                        rng.int_in(0, 5)
                    } else {
                        0
                    };

                let (voice_mean, voice_std) = plan.voice_usage;
                let voice_total = (rng.normal(voice_mean, voice_std) * lines).max(0.0) as i64;
                let voice_onnet = (voice_total as f64 * rng.uniform(0.4, 0.6)) as i64;
                let voice_offnet = (voice_total as f64 * rng.uniform(0.3, 0.5)) as i64;
                let voice_intl = (voice_total as f64 * rng.uniform(0.0, 0.1)) as i64;
                let calls_count = (voice_total as f64 / rng.uniform(2.0, 5.0)) as i64;

                let sms_sent = (rng.exponential(50.0) * lines) as i64;
                let mms_sent = (rng.exponential(5.0) * lines) as i64;

                let (roaming_days, roaming_data, roaming_voice) =
                    if customer.has_intl_roaming && rng.chance(0.1) {
                        (rng.int_in(1, 14), round3(rng.uniform(0.5, 3.0)), rng.int_in(10, 100))
                    } else {
                        (0, 0.0, 0)
                    };

                let base_charge = customer.plan_price;

                // Overage accrues past the plan's data allowance on
                // limited plans; unlimited plans never see it.
                let allowance = plan.data_gb as f64;
                let overage = if plan.is_limited() && data_usage > allowance {
                    round2((data_usage - allowance) * 10.0)
                } else {
                    0.0
                };

                let roaming_charges = if roaming_days > 0 {
                    round2(roaming_days as f64 * 10.0 + roaming_data * 15.0)
                } else {
                    0.0
                };

                let mut addon_charges = 0.0;
                if customer.has_device_protection {
                    addon_charges += 15.0;
                }
                if customer.has_streaming_bundle {
                    addon_charges += 10.0;
                }

                let mut discounts = 0.0;
                if customer.autopay_enrolled {
                    discounts += 5.0;
                }
                if customer.tenure_months > 24 {
                    discounts += round2(base_charge * 0.05);
                }

                let total_bill = round2(
                    (base_charge + overage + roaming_charges + addon_charges - discounts)
                        .max(0.0),
                );

                let payment_status = self
                    .config
                    .payment_status_by_credit
                    .sample(&customer.credit_class, rng)
                    .to_string();
                let days_to_payment = match customer.credit_class.as_str() {
                    "A" => rng.int_in(1, 15),
                    "D" => rng.int_in(10, 45),
                    _ => rng.int_in(5, 25),
                };

                sink(UsageRecord {
                    usage_id: mint_uuid(rng),
                    customer_id: customer.customer_id.clone(),
                    billing_month,
                    voice_minutes_onnet: voice_onnet,
                    voice_minutes_offnet: voice_offnet,
                    voice_minutes_intl: voice_intl,
                    voice_calls_count: calls_count,
                    data_usage_gb: data_usage,
                    data_usage_4g_pct: data_4g_pct,
                    data_usage_5g_pct: data_5g_pct,
                    data_throttled_days,
                    sms_sent,
                    mms_sent,
                    roaming_days,
                    roaming_data_gb: roaming_data,
                    roaming_voice_min: roaming_voice,
                    base_charge,
                    overage_charges: overage,
                    roaming_charges,
                    add_on_charges: addon_charges,
                    discounts_applied: discounts,
                    total_bill,
                    payment_status,
                    days_to_payment,
                });
            }
        }

        Ok(())
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competitive::CompetitiveGenerator;
    use crate::customer::CustomerGenerator;
    use crate::geography::GeographyGenerator;
    use crate::lifestyle::LifestyleGenerator;
    use crate::rng::{GeneratorSlot, RngBank};

    fn sample_customers(n: usize, seed: u64) -> (GenConfig, Vec<CustomerRecord>) {
        let cfg = GenConfig::default();
        let bank = RngBank::new(seed);
        let mut geo_rng = bank.for_generator(GeneratorSlot::Geography);
        let zones = GeographyGenerator::new(&cfg).generate(300, &mut geo_rng).unwrap();
        let mut comp_rng = bank.for_generator(GeneratorSlot::Competitive);
        let markets = CompetitiveGenerator::new(&cfg).generate(90, &mut comp_rng).unwrap();
        let mut life_rng = bank.for_generator(GeneratorSlot::Lifestyle);
        let lifestyles = LifestyleGenerator::new(&cfg).generate(&zones, &mut life_rng).unwrap();
        let mut cust_rng = bank.for_generator(GeneratorSlot::Customer);
        let customers = CustomerGenerator::new(&cfg)
            .generate(n, &zones, &lifestyles, &markets, &mut cust_rng)
            .unwrap();
        (cfg, customers)
    }

    #[test]
    fn record_count_is_min_of_window_and_tenure() {
        let (cfg, mut customers) = sample_customers(20, 42);
        customers[0].tenure_months = 3;
        customers[1].tenure_months = 60;
        let mut rng = RngBank::new(42).for_generator(GeneratorSlot::Usage);
        let usage = UsageGenerator::new(&cfg).generate(&customers, &mut rng).unwrap();

        let count_short = usage.iter().filter(|u| u.customer_id == customers[0].customer_id).count();
        let count_long = usage.iter().filter(|u| u.customer_id == customers[1].customer_id).count();
        assert_eq!(count_short, 3, "tenure 3 under a 12-month window must give 3 rows");
        assert_eq!(count_long, 12, "long tenure is capped at the window");
    }

    #[test]
    fn billing_months_are_distinct_per_customer() {
        let (cfg, customers) = sample_customers(30, 7);
        let mut rng = RngBank::new(7).for_generator(GeneratorSlot::Usage);
        let usage = UsageGenerator::new(&cfg).generate(&customers, &mut rng).unwrap();

        let mut keys: Vec<(String, NaiveDate)> = usage
            .iter()
            .map(|u| (u.customer_id.clone(), u.billing_month))
            .collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before, "duplicate (customer, billing_month) pair");
    }

    #[test]
    fn bills_are_never_negative_and_pcts_bounded() {
        let (cfg, customers) = sample_customers(50, 9);
        let mut rng = RngBank::new(9).for_generator(GeneratorSlot::Usage);
        let usage = UsageGenerator::new(&cfg).generate(&customers, &mut rng).unwrap();
        for u in &usage {
            assert!(u.total_bill >= 0.0);
            assert!((0.0..=100.0).contains(&u.data_usage_4g_pct));
            assert!((0.0..=100.0).contains(&u.data_usage_5g_pct));
            assert!(u.data_usage_gb >= 0.0);
        }
    }

    #[test]
    fn streaming_sink_matches_materialized_output() {
        let (cfg, customers) = sample_customers(10, 11);
        let generator = UsageGenerator::new(&cfg);

        let mut rng_a = RngBank::new(11).for_generator(GeneratorSlot::Usage);
        let materialized = generator.generate(&customers, &mut rng_a).unwrap();

        let mut rng_b = RngBank::new(11).for_generator(GeneratorSlot::Usage);
        let mut streamed = Vec::new();
        generator
            .generate_with(&customers, &mut rng_b, |r| streamed.push(r))
            .unwrap();

        assert_eq!(materialized, streamed);
    }
}
