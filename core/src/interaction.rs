//! Support interaction generator.
//!
//! Variable-count records per customer: the Poisson base count is
//! boosted for high-churn-risk customers and topped up for new
//! accounts. Channel and category come from age- and risk-conditioned
//! decision tables; CSAT is drawn from a sentiment-conditioned table so
//! the sentiment→CSAT correlation holds by construction.

use crate::{
    catalog::WeightedTable,
    config::GenConfig,
    customer::{mint_uuid, CustomerRecord},
    error::{GenError, GenResult},
    rng::GeneratorRng,
    types::round2,
    verbatim::{SentimentBucket, VerbatimCatalog},
};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One support interaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub interaction_id: String,
    pub customer_id: String,
    pub interaction_date: NaiveDateTime,
    pub channel: String,
    pub category: String,
    pub subcategory: String,
    pub intent: String,
    pub resolution_status: String,
    pub resolution_time_hours: f64,
    pub first_contact_resolution: bool,
    pub sentiment_score: f64,
    pub csat_score: i64,
    pub interaction_summary: String,
    pub customer_verbatim: Option<String>,
}

fn subcategories(category: &str) -> &'static [&'static str] {
    match category {
        "Billing" => &["Payment Issue", "Bill Dispute", "Plan Change", "Refund Request", "Auto-pay Setup"],
        "Technical" => &["No Service", "Slow Data", "Call Quality", "Voicemail", "5G Issues"],
        "Sales" => &["Upgrade", "Add Line", "New Device", "Plan Comparison", "Promotion"],
        "Complaint" => &["Service Quality", "Billing Error", "Wait Time", "Staff Behavior", "Coverage"],
        "General" => &["Account Info", "Coverage Check", "Store Location", "App Help", "Other"],
        "Account" => &["Password Reset", "Name Change", "Address Update", "Account Access", "Transfer"],
        _ => &["General"],
    }
}

pub struct InteractionGenerator<'a> {
    config: &'a GenConfig,
    complaint_sentiment: WeightedTable,
}

impl<'a> InteractionGenerator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        let complaint_sentiment = WeightedTable::from_pairs(
            "complaint_sentiment",
            &[("-0.8", 0.5), ("-0.6", 0.3), ("-0.4", 0.2)],
        )
        .expect("static catalog table is non-empty");
        Self { config, complaint_sentiment }
    }

    pub fn generate(
        &self,
        customers: &[CustomerRecord],
        rng: &mut GeneratorRng,
    ) -> GenResult<Vec<InteractionRecord>> {
        if customers.is_empty() {
            return Err(GenError::EmptyInput { name: "customers" });
        }

        let avg = self.config.avg_interactions_per_customer;
        let mut records = Vec::with_capacity((customers.len() as f64 * avg) as usize);

        for customer in customers {
            let mut count = rng.poisson(avg) as i64;
            if customer.churn_risk_score > 0.5 {
                count = (count as f64 * 1.5) as i64;
            }
            if customer.tenure_months < 6 {
                count += rng.int_in(0, 2);
            }
            for _ in 0..count {
                records.push(self.generate_one(customer, rng));
            }
        }

        log::info!("interaction: generated {} support records", records.len());
        Ok(records)
    }

    fn generate_one(
        &self,
        customer: &CustomerRecord,
        rng: &mut GeneratorRng,
    ) -> InteractionRecord {
        let cfg = self.config;

        let days_ago = rng.int_in(0, 365);
        let interaction_date = (cfg.snapshot_date - Duration::days(days_ago))
            .and_hms_opt(rng.int_in(8, 21) as u32, rng.int_in(0, 60) as u32, 0)
            .expect("clock literals are in range");

        let channel = cfg.support_channels_by_age.sample(&customer.age, rng).to_string();
        let category = cfg
            .support_categories_by_risk
            .sample(&customer.churn_risk_score, rng)
            .to_string();
        let subcategory = (*rng.pick(subcategories(&category))).to_string();
        let intent = format!("{category} - {subcategory}");

        let sentiment_score = if category == "Complaint" {
            self.complaint_sentiment
                .sample(rng)
                .parse::<f64>()
                .expect("complaint sentiment labels are numeric")
        } else if (category == "Billing" || category == "Technical") && rng.chance(0.4) {
            round2(rng.uniform(-0.6, 0.0))
        } else {
            round2(rng.uniform(-0.2, 0.8))
        };

        let csat_score = cfg
            .csat_by_sentiment
            .sample(&sentiment_score, rng)
            .parse::<i64>()
            .expect("csat labels are 1..=5");

        let resolution_status = cfg.resolution_by_category.sample(&category, rng).to_string();
        let (resolution_time_hours, first_contact_resolution) = if category == "Complaint" {
            (round2(rng.uniform(2.0, 48.0)), rng.chance(0.3))
        } else {
            (round2(rng.uniform(0.1, 8.0)), rng.chance(0.65))
        };

        let bucket = SentimentBucket::from_score(sentiment_score);
        let customer_verbatim =
            VerbatimCatalog::verbatim(&category, bucket, rng).map(String::from);
        let interaction_summary = VerbatimCatalog::summary(&category, rng).to_string();

        InteractionRecord {
            interaction_id: mint_uuid(rng),
            customer_id: customer.customer_id.clone(),
            interaction_date,
            channel,
            category,
            subcategory,
            intent,
            resolution_status,
            resolution_time_hours,
            first_contact_resolution,
            sentiment_score,
            csat_score,
            interaction_summary,
            customer_verbatim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GeneratorSlot, RngBank};
    use chrono::NaiveDate;

    fn stub_customer(churn_risk: f64, age: i64, tenure: i64) -> CustomerRecord {
        CustomerRecord {
            customer_id: format!("cust-{churn_risk}-{age}-{tenure}"),
            account_id: "SNM10000000".into(),
            zip_code: "10001".into(),
            state_code: "CA".into(),
            dma_code: "803".into(),
            age,
            gender: "F".into(),
            customer_since: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            tenure_months: tenure,
            acquisition_channel: "Online".into(),
            plan_name: "Powder".into(),
            plan_category: "Postpaid".into(),
            plan_price: 55.0,
            lines_on_account: 1,
            contract_type: "12M".into(),
            contract_end_date: None,
            device_brand: "Apple".into(),
            device_model: "iPhone 15".into(),
            device_tier: "Mid".into(),
            device_os: "iOS".into(),
            device_age_months: 6,
            is_5g_capable: true,
            monthly_arpu: 60.0,
            lifetime_value: 600.0,
            total_revenue_12m: 600.0,
            payment_method: "AutoPay".into(),
            autopay_enrolled: true,
            paperless_billing: true,
            credit_class: "B".into(),
            has_device_protection: false,
            has_intl_roaming: false,
            has_streaming_bundle: false,
            rewards_member: false,
            rewards_tier: None,
            rewards_points_balance: 0,
            app_user: true,
            app_engagement_score: 0.4,
            last_app_login: None,
            nps_score: None,
            nps_survey_date: None,
            churn_risk_score: churn_risk,
            predicted_churn_reason: None,
            complaint_count_12m: 0,
        }
    }

    #[test]
    fn sentiment_and_csat_move_together() {
        let cfg = GenConfig::default();
        let generator = InteractionGenerator::new(&cfg);
        let mut rng = RngBank::new(42).for_generator(GeneratorSlot::Interaction);
        let customer = stub_customer(0.2, 40, 24);

        let mut negative_csat = Vec::new();
        let mut positive_csat = Vec::new();
        for _ in 0..2000 {
            let r = generator.generate_one(&customer, &mut rng);
            assert!((-1.0..=1.0).contains(&r.sentiment_score));
            assert!((1..=5).contains(&r.csat_score));
            if r.sentiment_score < -0.3 {
                negative_csat.push(r.csat_score);
            } else if r.sentiment_score > 0.3 {
                positive_csat.push(r.csat_score);
            }
        }
        let avg = |v: &[i64]| v.iter().sum::<i64>() as f64 / v.len().max(1) as f64;
        assert!(
            avg(&positive_csat) > avg(&negative_csat) + 1.0,
            "CSAT must track sentiment: pos {:.2} vs neg {:.2}",
            avg(&positive_csat),
            avg(&negative_csat)
        );
    }

    #[test]
    fn high_risk_customers_interact_more() {
        let cfg = GenConfig::default();
        let generator = InteractionGenerator::new(&cfg);
        let mut rng = RngBank::new(42).for_generator(GeneratorSlot::Interaction);

        let low: Vec<CustomerRecord> = (0..300).map(|_| stub_customer(0.1, 40, 36)).collect();
        let high: Vec<CustomerRecord> = (0..300).map(|_| stub_customer(0.8, 40, 36)).collect();

        let low_count = generator.generate(&low, &mut rng).unwrap().len();
        let high_count = generator.generate(&high, &mut rng).unwrap().len();
        assert!(
            high_count > low_count,
            "high-risk cohort produced {high_count} vs low-risk {low_count}"
        );
    }

    #[test]
    fn intent_is_category_plus_subcategory() {
        let cfg = GenConfig::default();
        let generator = InteractionGenerator::new(&cfg);
        let mut rng = RngBank::new(5).for_generator(GeneratorSlot::Interaction);
        let r = generator.generate_one(&stub_customer(0.3, 30, 12), &mut rng);
        assert_eq!(r.intent, format!("{} - {}", r.category, r.subcategory));
    }
}
