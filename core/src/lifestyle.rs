//! Lifestyle segment generator.
//!
//! One psychographic record per zone, derived from the zone's
//! urbanity, income, age, and education. Cluster assignment is
//! geography-conditioned; the behavioral indices are linear blends of
//! the cluster baseline and zone demographics plus noise.

use crate::{
    catalog::{normalize_to_100, WeightedTable},
    config::{tech_adoption_params, GenConfig, UrbanClass},
    error::{GenError, GenResult},
    geography::ZoneRecord,
    rng::GeneratorRng,
    types::{round1, round2},
};
use serde::{Deserialize, Serialize};

/// One lifestyle row, keyed 1:1 by zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleRecord {
    pub zip_code: String,
    pub primary_lifestyle: String,
    pub secondary_lifestyle: String,
    pub lifestyle_diversity: f64,
    pub tech_adoption_score: i64,
    pub smartphone_penetration: f64,
    pub pct_iphone: f64,
    pub pct_android: f64,
    pub smart_home_adoption: f64,
    pub streaming_penetration: f64,
    pub cord_cutter_rate: f64,
    pub avg_daily_screen_time: f64,
    pub social_media_heavy_pct: f64,
    pub online_shopping_pct: f64,
    pub mobile_banking_pct: f64,
    pub streaming_hours_week: f64,
    pub gaming_hours_week: f64,
    pub news_consumption: String,
    pub primary_news_source: String,
    pub price_sensitivity_index: i64,
    pub brand_loyalty_index: i64,
    pub eco_consciousness: i64,
    pub early_adopter_index: i64,
    pub pref_channel_digital: f64,
    pub pref_channel_phone: f64,
    pub pref_channel_store: f64,
    pub pref_channel_chat: f64,
    pub avg_data_usage_gb: f64,
    pub avg_lines_per_account: f64,
    pub family_plan_propensity: f64,
    pub premium_plan_propensity: f64,
    pub prepaid_propensity: f64,
    pub deal_seeker_index: i64,
    pub switching_propensity: f64,
    pub competitor_awareness: f64,
}

pub struct LifestyleGenerator<'a> {
    config: &'a GenConfig,
    news_level: WeightedTable,
    news_source_young: WeightedTable,
    news_source_older: WeightedTable,
}

impl<'a> LifestyleGenerator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        let news_level = WeightedTable::from_pairs(
            "news_level",
            &[("Heavy", 0.25), ("Moderate", 0.50), ("Light", 0.25)],
        )
        .expect("static catalog table is non-empty");
        let news_source_young = WeightedTable::from_pairs(
            "news_source_young",
            &[("Social", 0.30), ("TV", 0.25), ("Online", 0.35), ("Print", 0.10)],
        )
        .expect("static catalog table is non-empty");
        let news_source_older = WeightedTable::from_pairs(
            "news_source_older",
            &[("Social", 0.15), ("TV", 0.40), ("Online", 0.30), ("Print", 0.15)],
        )
        .expect("static catalog table is non-empty");
        Self { config, news_level, news_source_young, news_source_older }
    }

    pub fn generate(
        &self,
        zones: &[ZoneRecord],
        rng: &mut GeneratorRng,
    ) -> GenResult<Vec<LifestyleRecord>> {
        if zones.is_empty() {
            return Err(GenError::EmptyInput { name: "zone_demographics" });
        }

        let records = zones.iter().map(|z| self.generate_one(z, rng)).collect::<Vec<_>>();
        log::info!("lifestyle: generated {} segment records", records.len());
        Ok(records)
    }

    fn generate_one(&self, zone: &ZoneRecord, rng: &mut GeneratorRng) -> LifestyleRecord {
        let cfg = self.config;
        let class = UrbanClass::from_str(&zone.urban_rural_class).unwrap_or(UrbanClass::Suburban);
        let income = zone.median_household_income as f64;
        let median_age = zone.median_age;
        let pct_bachelors = zone.pct_bachelors;

        let cluster_table = cfg.lifestyle_table(class);
        let primary = cluster_table.sample(rng).to_string();
        let secondary = cluster_table
            .without(&primary)
            .map(|t| t.sample(rng).to_string())
            .unwrap_or_else(|_| primary.clone());

        let diversity = round2(if class == UrbanClass::Urban {
            rng.uniform(0.3, 0.8)
        } else {
            rng.uniform(0.1, 0.5)
        });

        let (tech_mean, tech_std) = tech_adoption_params(&primary);
        let income_factor = (income - 75_000.0) / 50_000.0 * 10.0;
        let edu_factor = (pct_bachelors - 30.0) / 20.0 * 5.0;
        let age_factor = (40.0 - median_age) / 20.0 * 10.0;
        let tech_score = ((tech_mean + income_factor + edu_factor + age_factor
            + rng.normal(0.0, tech_std)) as i64)
            .clamp(10, 95);
        let tech = tech_score as f64;

        let smartphone = round2((85.0 + tech / 10.0 + rng.normal(0.0, 3.0)).clamp(70.0, 98.0));
        let iphone_base = 45.0 + (income - 75_000.0) / 10_000.0 + (tech - 50.0) / 10.0;
        let pct_iphone = round2((iphone_base + rng.normal(0.0, 8.0)).clamp(30.0, 70.0));
        let pct_android = round2(100.0 - pct_iphone);
        let smart_home = round2((tech * 0.5 + rng.normal(0.0, 10.0)).clamp(5.0, 60.0));
        let streaming = round2((70.0 + tech / 5.0 + rng.normal(0.0, 8.0)).clamp(50.0, 95.0));
        let cord_cutter = round2(
            (35.0 + tech / 5.0 - (median_age - 40.0) / 3.0 + rng.normal(0.0, 10.0))
                .clamp(15.0, 70.0),
        );
        let screen_time = round1(
            (6.0 + (tech - 50.0) / 20.0 - (median_age - 40.0) / 15.0 + rng.normal(0.0, 1.0))
                .clamp(3.0, 10.0),
        );
        let social_heavy = round2(
            (40.0 - (median_age - 35.0) / 2.0 + rng.normal(0.0, 12.0)).clamp(10.0, 70.0),
        );
        let online_shop = round2((60.0 + tech / 10.0 + rng.normal(0.0, 8.0)).clamp(40.0, 90.0));
        let mobile_bank = round2((55.0 + tech / 10.0 + rng.normal(0.0, 10.0)).clamp(30.0, 85.0));
        let streaming_hrs = round1(
            (20.0 + tech / 10.0 - (median_age - 40.0) / 5.0 + rng.normal(0.0, 5.0))
                .clamp(5.0, 40.0),
        );
        let gaming_hrs = round1(
            (8.0 - (median_age - 30.0) / 5.0 + rng.normal(0.0, 4.0)).clamp(0.0, 20.0),
        );

        let news_level = self.news_level.sample(rng).to_string();
        let news_source = if median_age < 45.0 {
            self.news_source_young.sample(rng)
        } else {
            self.news_source_older.sample(rng)
        }
        .to_string();

        let price_sens = ((60.0 - (income - 75_000.0) / 5_000.0 + rng.normal(0.0, 15.0)) as i64)
            .clamp(10, 90);
        let brand_loyalty = ((50.0 + (median_age - 40.0) / 3.0 + rng.normal(0.0, 12.0)) as i64)
            .clamp(20, 80);
        let eco = ((50.0 + (pct_bachelors - 30.0) / 3.0 + rng.normal(0.0, 15.0)) as i64)
            .clamp(15, 85);
        let early_adopter = ((tech * 0.8 - (median_age - 35.0) / 2.0 + rng.normal(0.0, 10.0))
            as i64)
            .clamp(10, 90);

        // Channel-preference mix: three draws age-banded, chat is the
        // remainder, then the group is renormalized to exactly 100.
        let (digital, phone, store) = if median_age < 35.0 {
            (rng.uniform(50.0, 70.0), rng.uniform(10.0, 20.0), rng.uniform(5.0, 15.0))
        } else if median_age > 55.0 {
            (rng.uniform(20.0, 35.0), rng.uniform(35.0, 50.0), rng.uniform(20.0, 35.0))
        } else {
            (rng.uniform(35.0, 50.0), rng.uniform(20.0, 35.0), rng.uniform(15.0, 25.0))
        };
        let mut prefs = [digital, phone, store, (100.0 - digital - phone - store).max(0.0)];
        normalize_to_100(&mut prefs, 2);

        let avg_data = round1(
            (15.0 + tech / 5.0 - (median_age - 40.0) / 3.0 + rng.normal(0.0, 8.0))
                .clamp(5.0, 50.0),
        );
        let suburban_bump = if class == UrbanClass::Suburban { 1.0 } else { 0.0 };
        let avg_lines =
            round1((1.5 + suburban_bump * 0.8 + rng.normal(0.0, 0.5)).clamp(1.0, 4.0));

        let family_prop =
            round2((30.0 + suburban_bump * 20.0 + rng.normal(0.0, 10.0)).clamp(10.0, 70.0));
        let premium_prop = round2(
            (20.0 + (income - 75_000.0) / 5_000.0 + tech / 5.0 + rng.normal(0.0, 10.0))
                .clamp(5.0, 50.0),
        );
        let prepaid_prop = round2(
            (25.0 - (income - 75_000.0) / 8_000.0 + rng.normal(0.0, 10.0)).clamp(5.0, 50.0),
        );

        let deal_seeker =
            ((price_sens as f64 * 0.8 + rng.normal(0.0, 10.0)) as i64).clamp(10, 90);
        let switching = round2(
            (15.0 + price_sens as f64 / 5.0 - brand_loyalty as f64 / 10.0
                + rng.normal(0.0, 5.0))
            .clamp(5.0, 40.0),
        );
        let competitor_aware = round2(
            (50.0 + deal_seeker as f64 / 5.0 + rng.normal(0.0, 10.0)).clamp(20.0, 80.0),
        );

        LifestyleRecord {
            zip_code: zone.zip_code.clone(),
            primary_lifestyle: primary,
            secondary_lifestyle: secondary,
            lifestyle_diversity: diversity,
            tech_adoption_score: tech_score,
            smartphone_penetration: smartphone,
            pct_iphone,
            pct_android,
            smart_home_adoption: smart_home,
            streaming_penetration: streaming,
            cord_cutter_rate: cord_cutter,
            avg_daily_screen_time: screen_time,
            social_media_heavy_pct: social_heavy,
            online_shopping_pct: online_shop,
            mobile_banking_pct: mobile_bank,
            streaming_hours_week: streaming_hrs,
            gaming_hours_week: gaming_hrs,
            news_consumption: news_level,
            primary_news_source: news_source,
            price_sensitivity_index: price_sens,
            brand_loyalty_index: brand_loyalty,
            eco_consciousness: eco,
            early_adopter_index: early_adopter,
            pref_channel_digital: prefs[0],
            pref_channel_phone: prefs[1],
            pref_channel_store: prefs[2],
            pref_channel_chat: prefs[3],
            avg_data_usage_gb: avg_data,
            avg_lines_per_account: avg_lines,
            family_plan_propensity: family_prop,
            premium_plan_propensity: premium_prop,
            prepaid_propensity: prepaid_prop,
            deal_seeker_index: deal_seeker,
            switching_propensity: switching,
            competitor_awareness: competitor_aware,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LIFESTYLE_CLUSTERS;
    use crate::geography::GeographyGenerator;
    use crate::rng::{GeneratorSlot, RngBank};

    fn small_run() -> Vec<LifestyleRecord> {
        let cfg = GenConfig::default();
        let bank = RngBank::new(42);
        let mut geo_rng = bank.for_generator(GeneratorSlot::Geography);
        let zones = GeographyGenerator::new(&cfg).generate(300, &mut geo_rng).unwrap();
        let mut rng = bank.for_generator(GeneratorSlot::Lifestyle);
        LifestyleGenerator::new(&cfg).generate(&zones, &mut rng).unwrap()
    }

    #[test]
    fn clusters_come_from_the_known_set() {
        for r in small_run() {
            assert!(LIFESTYLE_CLUSTERS.contains(&r.primary_lifestyle.as_str()));
            assert!(LIFESTYLE_CLUSTERS.contains(&r.secondary_lifestyle.as_str()));
        }
    }

    #[test]
    fn indices_stay_in_domain() {
        for r in small_run() {
            assert!((0..=100).contains(&r.tech_adoption_score));
            assert!((0..=100).contains(&r.price_sensitivity_index));
            assert!((0..=100).contains(&r.brand_loyalty_index));
            assert!((0.0..=100.0).contains(&r.switching_propensity));
        }
    }

    #[test]
    fn channel_preferences_sum_to_100() {
        for r in small_run() {
            let total = r.pref_channel_digital
                + r.pref_channel_phone
                + r.pref_channel_store
                + r.pref_channel_chat;
            assert!((total - 100.0).abs() < 0.1, "prefs sum to {total}");
        }
    }
}
