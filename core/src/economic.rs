//! Economic indicators generator.
//!
//! One record per zone, derived from the zone table plus noise. Every
//! derived index follows the same shape:
//!   value = base + regional_adjustment + urbanity_adjustment
//!         + linear(income) + gaussian_noise, clipped to its domain.

use crate::{
    config::{GenConfig, Region, UrbanClass},
    error::{GenError, GenResult},
    geography::ZoneRecord,
    rng::GeneratorRng,
    types::{round1, round2},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One economic-indicator row, keyed 1:1 by zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicRecord {
    pub zip_code: String,
    pub cost_of_living_index: f64,
    pub housing_cost_index: f64,
    pub utilities_cost_index: f64,
    pub transportation_index: f64,
    pub groceries_index: f64,
    pub healthcare_index: f64,
    pub unemployment_rate: f64,
    pub job_growth_rate_yoy: f64,
    pub poverty_rate: f64,
    pub food_insecurity_rate: f64,
    pub uninsured_rate: f64,
    pub home_price_growth_yoy: f64,
    pub rent_growth_yoy: f64,
    pub vacancy_rate: f64,
    pub avg_credit_score: i64,
    pub pct_prime_credit: f64,
    pub pct_subprime_credit: f64,
    pub avg_debt_to_income: f64,
    pub retail_sales_per_capita: i64,
    pub ecommerce_penetration: f64,
    pub data_as_of_date: NaiveDate,
}

pub struct EconomicGenerator<'a> {
    config: &'a GenConfig,
}

impl<'a> EconomicGenerator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self { config }
    }

    pub fn generate(
        &self,
        zones: &[ZoneRecord],
        rng: &mut GeneratorRng,
    ) -> GenResult<Vec<EconomicRecord>> {
        if zones.is_empty() {
            return Err(GenError::EmptyInput { name: "zone_demographics" });
        }

        let records = zones.iter().map(|z| self.generate_one(z, rng)).collect::<Vec<_>>();
        log::info!("economic: generated {} indicator records", records.len());
        Ok(records)
    }

    fn generate_one(&self, zone: &ZoneRecord, rng: &mut GeneratorRng) -> EconomicRecord {
        let cfg = self.config;
        let class = UrbanClass::from_str(&zone.urban_rural_class).unwrap_or(UrbanClass::Suburban);
        let region = region_from_str(&zone.region);
        let income = zone.median_household_income as f64;

        let col = &cfg.cost_of_living;
        let income_col = (income - 75_000.0) / 5_000.0;
        let col_index = round1(
            (col.mean + (region.cost_of_living_base() - 100.0)
                + class.cost_of_living_adjustment()
                + income_col
                + rng.normal(0.0, 10.0))
            .clamp(col.min.unwrap_or(f64::MIN), col.max.unwrap_or(f64::MAX)),
        );

        let housing_index = round1(col_index * rng.uniform(0.9, 1.3));
        let utilities_index = round1(col_index * rng.uniform(0.85, 1.1));
        let transport_index = round1(col_index * rng.uniform(0.9, 1.15));
        let groceries_index = round1(col_index * rng.uniform(0.9, 1.1));
        let healthcare_index = round1(col_index * rng.uniform(0.95, 1.15));

        let unemp = &cfg.unemployment;
        let income_unemp = (75_000.0 - income) / 30_000.0;
        let unemployment = round2(
            (unemp.mean + income_unemp + region.unemployment_adjustment() + rng.normal(0.0, 1.0))
                .clamp(unemp.min.unwrap_or(f64::MIN), unemp.max.unwrap_or(f64::MAX)),
        );

        let job_growth =
            round2((2.5 - unemployment * 0.3 + rng.normal(0.0, 2.0)).clamp(-5.0, 10.0));

        let poverty_base = 30.0 - income / 5_000.0;
        let poverty_rate = round2((poverty_base + rng.normal(0.0, 5.0)).clamp(2.0, 35.0));
        let food_insecurity = round2(poverty_rate * rng.uniform(0.3, 0.5));
        let uninsured = round2(
            (10.0 - (income - 50_000.0) / 15_000.0 + rng.normal(0.0, 3.0)).clamp(2.0, 25.0),
        );

        let home_growth = round2(rng.normal(5.0, 4.0));
        let rent_growth = round2(rng.normal(4.0, 3.0));
        let vacancy = round2((7.0 + rng.normal(0.0, 3.0)).clamp(2.0, 15.0));

        let credit = &cfg.credit_score;
        let income_credit = (income - 75_000.0) / 2_000.0;
        let avg_credit = ((credit.mean + income_credit + rng.normal(0.0, 30.0)) as i64)
            .clamp(credit.min.unwrap_or(0.0) as i64, credit.max.unwrap_or(850.0) as i64);

        let pct_prime = round2((50.0 + (avg_credit as f64 - 700.0) / 3.0).clamp(20.0, 80.0));
        let pct_subprime = round2((20.0 - (avg_credit as f64 - 700.0) / 5.0).clamp(5.0, 40.0));

        let avg_dti = round2((35.0 + rng.normal(0.0, 8.0)).clamp(15.0, 50.0));
        let retail_per_capita = (income * rng.uniform(0.15, 0.25)) as i64;
        let ecommerce = round2(
            (20.0 + (avg_credit as f64 - 680.0) / 10.0 + rng.normal(0.0, 5.0)).clamp(10.0, 40.0),
        );

        EconomicRecord {
            zip_code: zone.zip_code.clone(),
            cost_of_living_index: col_index,
            housing_cost_index: housing_index,
            utilities_cost_index: utilities_index,
            transportation_index: transport_index,
            groceries_index: groceries_index,
            healthcare_index: healthcare_index,
            unemployment_rate: unemployment,
            job_growth_rate_yoy: job_growth,
            poverty_rate,
            food_insecurity_rate: food_insecurity,
            uninsured_rate: uninsured,
            home_price_growth_yoy: home_growth,
            rent_growth_yoy: rent_growth,
            vacancy_rate: vacancy,
            avg_credit_score: avg_credit,
            pct_prime_credit: pct_prime,
            pct_subprime_credit: pct_subprime,
            avg_debt_to_income: avg_dti,
            retail_sales_per_capita: retail_per_capita,
            ecommerce_penetration: ecommerce,
            data_as_of_date: cfg.snapshot_date,
        }
    }
}

fn region_from_str(s: &str) -> Region {
    match s {
        "West" => Region::West,
        "Southwest" => Region::Southwest,
        "Northeast" => Region::Northeast,
        "Midwest" => Region::Midwest,
        _ => Region::Southeast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::GeographyGenerator;
    use crate::rng::{GeneratorSlot, RngBank};

    #[test]
    fn one_record_per_zone_with_bounded_indices() {
        let cfg = GenConfig::default();
        let bank = RngBank::new(42);
        let mut geo_rng = bank.for_generator(GeneratorSlot::Geography);
        let zones = GeographyGenerator::new(&cfg).generate(200, &mut geo_rng).unwrap();

        let mut rng = bank.for_generator(GeneratorSlot::Economic);
        let econ = EconomicGenerator::new(&cfg).generate(&zones, &mut rng).unwrap();

        assert_eq!(econ.len(), zones.len());
        for e in &econ {
            assert!((70.0..=180.0).contains(&e.cost_of_living_index));
            assert!((1.5..=12.0).contains(&e.unemployment_rate));
            assert!((580..=800).contains(&e.avg_credit_score));
            assert!((2.0..=35.0).contains(&e.poverty_rate));
        }
    }

    #[test]
    fn empty_zone_table_is_fatal() {
        let cfg = GenConfig::default();
        let mut rng = RngBank::new(42).for_generator(GeneratorSlot::Economic);
        assert!(EconomicGenerator::new(&cfg).generate(&[], &mut rng).is_err());
    }
}
