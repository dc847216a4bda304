//! Zone demographics generator.
//!
//! Produces one record per ZIP-equivalent zone: state, region, market
//! assignment, urban/rural class, population, and the demographic
//! percentage groups. Runs first — every other generator joins against
//! this table.
//!
//! Zone codes are a sequential counter starting at 10001, so key
//! uniqueness is structural, not probabilistic. Zone counts are
//! allocated to states proportionally to the population-share table,
//! with the remainder assigned to the last state so the total matches
//! the requested count exactly.

use crate::{
    catalog::normalize_to_100,
    config::{GenConfig, UrbanClass},
    error::{GenError, GenResult},
    rng::GeneratorRng,
    types::{round1, round2},
};
use serde::{Deserialize, Serialize};

/// One zone row. Field order is the CSV column order — the wire
/// contract consumed by the dashboard and the validation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub zip_code: String,
    pub zip_name: String,
    pub state_code: String,
    pub state_name: String,
    pub region: String,
    pub dma_code: String,
    pub dma_name: String,
    pub total_population: i64,
    pub population_density: f64,
    pub land_area_sq_miles: f64,
    pub urban_rural_class: String,
    pub pct_age_18_24: f64,
    pub pct_age_25_34: f64,
    pub pct_age_35_44: f64,
    pub pct_age_45_54: f64,
    pub pct_age_55_64: f64,
    pub pct_age_65_plus: f64,
    pub median_age: f64,
    pub median_household_income: i64,
    pub mean_household_income: i64,
    pub per_capita_income: i64,
    pub pct_income_under_25k: f64,
    pub pct_income_25k_50k: f64,
    pub pct_income_50k_75k: f64,
    pub pct_income_75k_100k: f64,
    pub pct_income_100k_150k: f64,
    pub pct_income_150k_plus: f64,
    pub pct_high_school: f64,
    pub pct_some_college: f64,
    pub pct_bachelors: f64,
    pub pct_graduate_degree: f64,
    pub pct_owner_occupied: f64,
    pub pct_renter_occupied: f64,
    pub median_home_value: i64,
    pub median_rent: i64,
    pub avg_household_size: f64,
    pub pct_family_households: f64,
    pub pct_married_couples: f64,
    pub pct_single_parent: f64,
    pub pct_living_alone: f64,
    pub labor_force_participation: f64,
    pub pct_white_collar: f64,
    pub pct_blue_collar: f64,
    pub pct_service_industry: f64,
    pub pct_white: f64,
    pub pct_black: f64,
    pub pct_hispanic: f64,
    pub pct_asian: f64,
    pub pct_other_race: f64,
}

pub struct GeographyGenerator<'a> {
    config: &'a GenConfig,
}

impl<'a> GeographyGenerator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, n_zones: usize, rng: &mut GeneratorRng) -> GenResult<Vec<ZoneRecord>> {
        if n_zones == 0 {
            return Err(GenError::EmptyInput { name: "zones" });
        }

        let allocations = self.allocate_by_state(n_zones);
        let mut records = Vec::with_capacity(n_zones);
        let mut zip_counter: u64 = 10_001;

        for (state_idx, count) in allocations {
            let state = &self.config.states[state_idx];
            for _ in 0..count {
                let zip_code = format!("{zip_counter:05}");
                records.push(self.generate_zone(&zip_code, state_idx, rng));
                zip_counter += 1;
            }
            log::debug!("geography: {} zones for {}", count, state.code);
        }

        log::info!("geography: generated {} zone records", records.len());
        Ok(records)
    }

    /// Floor-allocate zone counts per state; the last state absorbs
    /// the remainder so the total equals the target exactly.
    fn allocate_by_state(&self, n_zones: usize) -> Vec<(usize, usize)> {
        let states = &self.config.states;
        let mut allocations = Vec::with_capacity(states.len());
        let mut remaining = n_zones;
        for (i, state) in states.iter().enumerate() {
            let count = if i == states.len() - 1 {
                remaining
            } else {
                ((n_zones as f64 * state.weight) as usize).min(remaining)
            };
            allocations.push((i, count));
            remaining -= count;
        }
        allocations
    }

    fn generate_zone(&self, zip_code: &str, state_idx: usize, rng: &mut GeneratorRng) -> ZoneRecord {
        let cfg = self.config;
        let state = &cfg.states[state_idx];
        let region = state.region;

        let dma_code = (*rng.pick(state.dmas)).to_string();
        let dma_name = cfg
            .dma_seeds
            .iter()
            .find(|d| d.code == dma_code)
            .map(|d| d.name.to_string())
            .unwrap_or_else(|| format!("{} Metro", state.code));

        let class_label = cfg.urban_rural.sample(rng).to_string();
        let class = UrbanClass::from_str(&class_label).unwrap_or(UrbanClass::Suburban);

        let (pop_mean, pop_std) = class.population_params();
        let total_population = (rng.normal(pop_mean, pop_std) as i64).max(100);

        let (area_mean, area_std) = class.land_area_params();
        let land_area = rng.normal(area_mean, area_std).max(0.5);
        let population_density = round2(total_population as f64 / land_area);

        // Age mix: five under-65 buckets drawn independently, the 65+
        // remainder floored, then the whole group renormalized so the
        // six percentages sum to exactly 100.
        let mut ages = [
            rng.normal(12.0, 4.0).clamp(5.0, 25.0),
            rng.normal(15.0, 4.0).clamp(8.0, 25.0),
            rng.normal(14.0, 3.0).clamp(8.0, 20.0),
            rng.normal(13.0, 3.0).clamp(8.0, 20.0),
            rng.normal(13.0, 3.0).clamp(8.0, 20.0),
            0.0,
        ];
        let under_65: f64 = ages[..5].iter().sum();
        ages[5] = (100.0 - under_65).max(5.0);
        normalize_to_100(&mut ages, 2);

        let median_age = round1(
            (35.0 + (ages[5] - 15.0) * 0.5 + rng.normal(0.0, 3.0)).clamp(25.0, 55.0),
        );

        let income_base = cfg.national_median_income;
        let raw_income = income_base
            * class.income_multiplier()
            * region.income_multiplier()
            * rng.uniform(0.7, 1.5);
        let (income_lo, income_hi) = cfg.income_clamp;
        let median_income = (raw_income as i64).clamp(income_lo as i64, income_hi as i64);
        let mean_income = (median_income as f64 * rng.uniform(1.1, 1.4)) as i64;
        let per_capita = (median_income as f64 / rng.uniform(2.0, 3.5)) as i64;

        let mi = median_income as f64;
        let mut brackets = [
            (30.0 - (mi - 50_000.0) / 5_000.0).clamp(5.0, 40.0),
            (25.0 - (mi - 75_000.0) / 10_000.0).clamp(10.0, 35.0),
            20.0,
            15.0,
            ((mi - 60_000.0) / 5_000.0).clamp(5.0, 20.0),
            0.0,
        ];
        let bracket_head: f64 = brackets[..5].iter().sum();
        brackets[5] = (100.0 - bracket_head).max(2.0);
        normalize_to_100(&mut brackets, 2);

        // Education tracks income but is not a sum-to-100 group.
        let income_factor = (mi - 50_000.0) / 100_000.0;
        let pct_high_school = round2((88.0 + income_factor * 5.0).clamp(70.0, 98.0));
        let pct_some_college = round2((60.0 + income_factor * 10.0).clamp(30.0, 80.0));
        let pct_bachelors = round2((33.0 + income_factor * 20.0).clamp(10.0, 70.0));
        let pct_graduate = round2((13.0 + income_factor * 15.0).clamp(3.0, 40.0));

        let suburban = class == UrbanClass::Suburban;
        let urban = class == UrbanClass::Urban;
        let pct_owner = round2(
            (65.0 + if suburban { 15.0 } else { 0.0 } - if urban { 20.0 } else { 0.0 })
                .clamp(20.0, 90.0),
        );
        let pct_renter = round2(100.0 - pct_owner);
        let median_home_value = (mi * rng.uniform(3.0, 6.0)) as i64;
        let median_rent = (mi * rng.uniform(0.015, 0.025)) as i64;

        let avg_household_size = round1(rng.uniform(2.0, 3.2));
        let pct_family = round2((60.0 + if suburban { 15.0 } else { 0.0 }).clamp(40.0, 80.0));
        let pct_married = round2(pct_family * rng.uniform(0.6, 0.8));
        let pct_single_parent = round2(rng.normal(12.0, 5.0).clamp(5.0, 25.0));
        let pct_alone = round2((100.0 - pct_family - 10.0).clamp(15.0, 45.0));

        let labor_force = round2(rng.normal(63.0, 8.0).clamp(50.0, 80.0));
        let pct_white_collar = round2((45.0 + income_factor * 30.0).clamp(20.0, 80.0));
        let pct_blue_collar = round2((100.0 - pct_white_collar - 25.0).clamp(10.0, 50.0));
        let pct_service = round2(100.0 - pct_white_collar - pct_blue_collar);

        let mut race = [
            rng.normal(60.0, 20.0).clamp(20.0, 95.0),
            rng.exponential(13.0).clamp(1.0, 50.0),
            rng.exponential(18.0).clamp(1.0, 60.0),
            rng.exponential(6.0).clamp(0.5, 40.0),
            0.0,
        ];
        let race_head: f64 = race[..4].iter().sum();
        race[4] = (100.0 - race_head).max(0.0);
        normalize_to_100(&mut race, 2);

        ZoneRecord {
            zip_code: zip_code.to_string(),
            zip_name: format!("{} {}", state.code, zip_code.parse::<u64>().unwrap_or(0) % 1000),
            state_code: state.code.to_string(),
            state_name: state.code.to_string(),
            region: region.as_str().to_string(),
            dma_code,
            dma_name,
            total_population,
            population_density,
            land_area_sq_miles: round2(land_area),
            urban_rural_class: class_label,
            pct_age_18_24: ages[0],
            pct_age_25_34: ages[1],
            pct_age_35_44: ages[2],
            pct_age_45_54: ages[3],
            pct_age_55_64: ages[4],
            pct_age_65_plus: ages[5],
            median_age,
            median_household_income: median_income,
            mean_household_income: mean_income,
            per_capita_income: per_capita,
            pct_income_under_25k: brackets[0],
            pct_income_25k_50k: brackets[1],
            pct_income_50k_75k: brackets[2],
            pct_income_75k_100k: brackets[3],
            pct_income_100k_150k: brackets[4],
            pct_income_150k_plus: brackets[5],
            pct_high_school,
            pct_some_college,
            pct_bachelors,
            pct_graduate_degree: pct_graduate,
            pct_owner_occupied: pct_owner,
            pct_renter_occupied: pct_renter,
            median_home_value,
            median_rent,
            avg_household_size,
            pct_family_households: pct_family,
            pct_married_couples: pct_married,
            pct_single_parent,
            pct_living_alone: pct_alone,
            labor_force_participation: labor_force,
            pct_white_collar,
            pct_blue_collar,
            pct_service_industry: pct_service,
            pct_white: race[0],
            pct_black: race[1],
            pct_hispanic: race[2],
            pct_asian: race[3],
            pct_other_race: race[4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GeneratorSlot, RngBank};

    #[test]
    fn allocation_totals_match_exactly() {
        let cfg = GenConfig::default();
        let generator = GeographyGenerator::new(&cfg);
        for target in [37, 1000, 4211] {
            let total: usize = generator
                .allocate_by_state(target)
                .iter()
                .map(|(_, n)| n)
                .sum();
            assert_eq!(total, target, "allocation drifted for target {target}");
        }
    }

    #[test]
    fn zone_codes_are_sequential_and_unique() {
        let cfg = GenConfig::default();
        let mut rng = RngBank::new(42).for_generator(GeneratorSlot::Geography);
        let zones = GeographyGenerator::new(&cfg).generate(500, &mut rng).unwrap();
        assert_eq!(zones.len(), 500);
        let mut codes: Vec<&str> = zones.iter().map(|z| z.zip_code.as_str()).collect();
        codes.dedup();
        assert_eq!(codes.len(), 500, "duplicate zone codes");
        assert_eq!(zones[0].zip_code, "10001");
    }

    #[test]
    fn zero_zones_is_a_fatal_input_error() {
        let cfg = GenConfig::default();
        let mut rng = RngBank::new(42).for_generator(GeneratorSlot::Geography);
        assert!(GeographyGenerator::new(&cfg).generate(0, &mut rng).is_err());
    }
}
