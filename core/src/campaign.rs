//! Campaign response generator.
//!
//! Variable-count records per customer, boosted for high-ARPU and
//! high-churn-risk accounts and capped. The engagement funnel is a
//! chain of Bernoulli gates, each conditioned on the previous gate
//! passing, so delivered ⊇ opened ⊇ clicked ⊇ responded ⊇ converted
//! holds by construction.

use crate::{
    config::{CampaignProfile, GenConfig},
    customer::{mint_uuid, CustomerRecord},
    error::{GenError, GenResult},
    rng::GeneratorRng,
    types::round2,
};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One curated campaign creative.
struct CampaignTemplate {
    name: &'static str,
    offer: &'static str,
    value: f64,
}

fn templates(campaign_type: &str) -> &'static [CampaignTemplate] {
    match campaign_type {
        "Retention" => &[
            CampaignTemplate { name: "Loyalty Thank You", offer: "10% off next 3 months", value: 30.0 },
            CampaignTemplate { name: "We Miss You", offer: "$50 bill credit", value: 50.0 },
            CampaignTemplate { name: "Stay With Us", offer: "Free device protection 6 months", value: 90.0 },
            CampaignTemplate { name: "Anniversary Reward", offer: "Double rewards points", value: 25.0 },
        ],
        "Upsell" => &[
            CampaignTemplate { name: "Upgrade to Unlimited", offer: "Blizzard plan at Powder price for 3 months", value: 60.0 },
            CampaignTemplate { name: "Premium Experience", offer: "Try Summit plan free for 1 month", value: 95.0 },
            CampaignTemplate { name: "More Data", offer: "Add 10GB for $10/month", value: 10.0 },
            CampaignTemplate { name: "Hotspot Add-On", offer: "Free hotspot for 3 months", value: 45.0 },
        ],
        "Cross-sell" => &[
            CampaignTemplate { name: "Protect Your Device", offer: "Snowpack Protection 50% off first 3 months", value: 22.0 },
            CampaignTemplate { name: "Stream More", offer: "Peak Streaming bundle at $5/month", value: 15.0 },
            CampaignTemplate { name: "Go International", offer: "Altitude Roaming first trip free", value: 30.0 },
            CampaignTemplate { name: "Add a Line", offer: "$0 activation for additional line", value: 35.0 },
        ],
        "Win-back" => &[
            CampaignTemplate { name: "Come Back Offer", offer: "$100 credit on return", value: 100.0 },
            CampaignTemplate { name: "Fresh Start", offer: "50% off for 6 months", value: 150.0 },
            CampaignTemplate { name: "We've Changed", offer: "Free month of service", value: 75.0 },
        ],
        "Loyalty" => &[
            CampaignTemplate { name: "Rewards Redemption", offer: "Double points weekend", value: 0.0 },
            CampaignTemplate { name: "Exclusive Access", offer: "Early upgrade eligibility", value: 50.0 },
            CampaignTemplate { name: "Thank You Gift", offer: "Free accessory credit $50", value: 50.0 },
            CampaignTemplate { name: "Gold Member Perk", offer: "Priority customer service", value: 20.0 },
        ],
        "Seasonal" => &[
            CampaignTemplate { name: "Back to School", offer: "Free tablet with new line", value: 300.0 },
            CampaignTemplate { name: "Holiday Special", offer: "BOGO device offer", value: 500.0 },
            CampaignTemplate { name: "Summer Savings", offer: "3 months free streaming", value: 30.0 },
            CampaignTemplate { name: "Black Friday", offer: "$400 off flagship phones", value: 400.0 },
        ],
        _ => &[CampaignTemplate { name: "General", offer: "Special offer", value: 25.0 }],
    }
}

/// One campaign response row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignResponse {
    pub response_id: String,
    pub customer_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub campaign_type: String,
    pub campaign_category: String,
    pub offer_type: String,
    pub offer_value: f64,
    pub channel: String,
    pub sent_at: NaiveDateTime,
    pub delivered: bool,
    pub opened: bool,
    pub clicked: bool,
    pub responded: bool,
    pub response_type: String,
    pub response_at: Option<NaiveDateTime>,
    pub converted: bool,
    pub conversion_value: f64,
}

pub struct CampaignGenerator<'a> {
    config: &'a GenConfig,
}

impl<'a> CampaignGenerator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self { config }
    }

    pub fn generate(
        &self,
        customers: &[CustomerRecord],
        rng: &mut GeneratorRng,
    ) -> GenResult<Vec<CampaignResponse>> {
        if customers.is_empty() {
            return Err(GenError::EmptyInput { name: "customers" });
        }

        let avg = self.config.avg_campaigns_per_customer;
        let mut records = Vec::with_capacity((customers.len() as f64 * avg) as usize);

        for customer in customers {
            let mut count = rng.poisson(avg) as i64;
            if customer.monthly_arpu > 70.0 {
                count = (count as f64 * 1.2) as i64;
            }
            if customer.churn_risk_score > 0.5 {
                count = (count as f64 * 1.3) as i64;
            }
            let count = count.clamp(1, 15);

            for _ in 0..count {
                records.push(self.generate_one(customer, rng));
            }
        }

        log::info!("campaign: generated {} response records", records.len());
        Ok(records)
    }

    fn generate_one(
        &self,
        customer: &CustomerRecord,
        rng: &mut GeneratorRng,
    ) -> CampaignResponse {
        let cfg = self.config;

        let response_id = mint_uuid(rng);
        let campaign_id = mint_uuid(rng)[..8].to_uppercase();

        let profile = CampaignProfile {
            churn_risk: customer.churn_risk_score,
            arpu: customer.monthly_arpu,
        };
        let campaign_type = cfg.campaign_type_by_profile.sample(&profile, rng).to_string();
        let type_spec = cfg.campaign_type(&campaign_type);
        let template = rng.pick(templates(&campaign_type));

        let horizon = 365i64.min(customer.tenure_months * 30);
        let days_ago = rng.int_in(0, horizon.max(1));
        let sent_at = (cfg.snapshot_date - Duration::days(days_ago))
            .and_hms_opt(rng.int_in(0, 24) as u32, rng.int_in(0, 60) as u32, 0)
            .expect("clock literals are in range");

        let channel = cfg.campaign_channels.sample(rng).to_string();

        let mut open_rate = type_spec.response_rate * 3.0;
        let mut response_rate = type_spec.response_rate;
        if customer.app_user && (channel == "App Push" || channel == "SMS") {
            open_rate *= 1.3;
        }
        if customer.churn_risk_score > 0.6 && campaign_type == "Retention" {
            response_rate *= 1.5;
        }

        // The funnel: each gate only fires if the previous one did.
        let delivered = rng.chance(0.95);
        let opened = delivered && rng.chance(open_rate.min(0.8));
        let clicked = opened && rng.chance(0.5);
        let responded = clicked && rng.chance((response_rate * 2.0).min(0.6));

        let (mut response_type, mut converted) = if responded {
            if rng.chance(type_spec.conversion_rate / response_rate) {
                ("Accepted".to_string(), true)
            } else if rng.chance(0.6) {
                ("Declined".to_string(), false)
            } else {
                ("Ignored".to_string(), false)
            }
        } else {
            ("Ignored".to_string(), false)
        };

        let response_at = if responded {
            let delay_hours = rng.exponential(48.0);
            Some(sent_at + Duration::minutes((delay_hours * 60.0) as i64))
        } else {
            None
        };

        let mut conversion_value = if converted {
            round2(template.value * rng.uniform(0.8, 1.2))
        } else {
            0.0
        };

        // A thin slice of responders complain instead.
        if responded && rng.chance(0.02) {
            response_type = "Complained".to_string();
            converted = false;
            conversion_value = 0.0;
        }

        CampaignResponse {
            response_id,
            customer_id: customer.customer_id.clone(),
            campaign_id,
            campaign_name: template.name.to_string(),
            campaign_type: campaign_type.clone(),
            campaign_category: campaign_type,
            offer_type: template.offer.to_string(),
            offer_value: template.value,
            channel,
            sent_at,
            delivered,
            opened,
            clicked,
            responded,
            response_type,
            response_at,
            converted,
            conversion_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GeneratorSlot, RngBank};
    use chrono::NaiveDate;

    fn stub_customer(churn_risk: f64, arpu: f64, tenure: i64) -> CustomerRecord {
        CustomerRecord {
            customer_id: format!("cust-{churn_risk}-{arpu}"),
            account_id: "SNM10000000".into(),
            zip_code: "10001".into(),
            state_code: "CA".into(),
            dma_code: "803".into(),
            age: 40,
            gender: "M".into(),
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
            monthly_arpu: arpu,
            lifetime_value: arpu * tenure as f64,
            total_revenue_12m: arpu * 12.0,
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
    fn funnel_flags_are_monotone() {
        let cfg = GenConfig::default();
        let generator = CampaignGenerator::new(&cfg);
        let mut rng = RngBank::new(42).for_generator(GeneratorSlot::Campaign);
        let customers: Vec<CustomerRecord> =
            (0..200).map(|_| stub_customer(0.4, 60.0, 24)).collect();
        let responses = generator.generate(&customers, &mut rng).unwrap();

        for r in &responses {
            assert!(!r.opened || r.delivered, "opened without delivery");
            assert!(!r.clicked || r.opened, "clicked without open");
            assert!(!r.responded || r.clicked, "responded without click");
            assert!(!r.converted || r.responded, "converted without response");
        }
    }

    #[test]
    fn non_responders_are_ignored_with_zero_value() {
        let cfg = GenConfig::default();
        let generator = CampaignGenerator::new(&cfg);
        let mut rng = RngBank::new(7).for_generator(GeneratorSlot::Campaign);
        let customers: Vec<CustomerRecord> =
            (0..100).map(|_| stub_customer(0.3, 50.0, 12)).collect();
        let responses = generator.generate(&customers, &mut rng).unwrap();

        for r in responses.iter().filter(|r| !r.responded) {
            assert_eq!(r.response_type, "Ignored");
            assert!(!r.converted);
            assert_eq!(r.conversion_value, 0.0);
            assert!(r.response_at.is_none());
        }
    }

    #[test]
    fn per_customer_count_stays_within_cap() {
        let cfg = GenConfig::default();
        let generator = CampaignGenerator::new(&cfg);
        let mut rng = RngBank::new(3).for_generator(GeneratorSlot::Campaign);
        let mut customers: Vec<CustomerRecord> =
            (0..200).map(|i| stub_customer(0.9, 150.0, 1 + (i % 60))).collect();
        for (i, c) in customers.iter_mut().enumerate() {
            c.customer_id = format!("cust-{i}");
        }
        let responses = generator.generate(&customers, &mut rng).unwrap();

        for c in &customers {
            let count = responses.iter().filter(|r| r.customer_id == c.customer_id).count();
            assert!((1..=15).contains(&count), "count {count} outside [1, 15]");
        }
    }

    #[test]
    fn at_risk_customers_skew_toward_retention() {
        let cfg = GenConfig::default();
        let generator = CampaignGenerator::new(&cfg);
        let mut rng = RngBank::new(11).for_generator(GeneratorSlot::Campaign);
        let at_risk: Vec<CustomerRecord> =
            (0..300).map(|_| stub_customer(0.8, 50.0, 24)).collect();
        let responses = generator.generate(&at_risk, &mut rng).unwrap();
        let retention_share = responses
            .iter()
            .filter(|r| r.campaign_type == "Retention")
            .count() as f64
            / responses.len() as f64;
        assert!(
            retention_share > 0.30,
            "retention share for at-risk cohort was {retention_share:.2}"
        );
    }
}
