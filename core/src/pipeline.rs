//! The generation pipeline — the heart of the dataset synthesizer.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Geography     (zone demographics)
//!   2. Economic      (indicators per zone)
//!   3. Competitive   (markets per DMA)
//!   4. Lifestyle     (segments per zone)
//!   5. Customer      (reads zones + lifestyle + competitive)
//!   6. Usage         (reads customers)
//!   7. Interaction   (reads customers)
//!   8. Campaign      (reads customers)
//!
//! RULES:
//!   - External tables are fully materialized before any internal
//!     generator runs; downstream stages see read-only lookups.
//!   - Each stage draws from its own RNG stream out of the RngBank.
//!   - No stage mutates another stage's output.

use crate::{
    campaign::{CampaignGenerator, CampaignResponse},
    competitive::{CompetitiveGenerator, CompetitiveMarket},
    config::GenConfig,
    customer::{CustomerGenerator, CustomerRecord},
    economic::{EconomicGenerator, EconomicRecord},
    error::GenResult,
    geography::{GeographyGenerator, ZoneRecord},
    interaction::{InteractionGenerator, InteractionRecord},
    lifestyle::{LifestyleGenerator, LifestyleRecord},
    rng::{GeneratorSlot, RngBank},
    usage::{UsageGenerator, UsageRecord},
};

/// All eight tables of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBundle {
    pub zones: Vec<ZoneRecord>,
    pub economics: Vec<EconomicRecord>,
    pub markets: Vec<CompetitiveMarket>,
    pub lifestyles: Vec<LifestyleRecord>,
    pub customers: Vec<CustomerRecord>,
    pub usage: Vec<UsageRecord>,
    pub interactions: Vec<InteractionRecord>,
    pub campaigns: Vec<CampaignResponse>,
}

impl DatasetBundle {
    pub fn total_records(&self) -> usize {
        self.zones.len()
            + self.economics.len()
            + self.markets.len()
            + self.lifestyles.len()
            + self.customers.len()
            + self.usage.len()
            + self.interactions.len()
            + self.campaigns.len()
    }
}

pub struct Pipeline {
    config: GenConfig,
    rng_bank: RngBank,
}

impl Pipeline {
    pub fn new(config: GenConfig, seed: u64) -> Self {
        Self { config, rng_bank: RngBank::new(seed) }
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Run the full pipeline, materializing every table in memory.
    pub fn run(&self) -> GenResult<DatasetBundle> {
        let mut usage = Vec::new();
        let mut bundle = self.run_with_usage_sink(|r| usage.push(r))?;
        bundle.usage = usage;
        Ok(bundle)
    }

    /// Run the pipeline, streaming usage rows to `sink` instead of
    /// materializing them (the bundle's usage table is left empty).
    /// This is the scalability escape hatch for the largest table.
    pub fn run_with_usage_sink<F: FnMut(UsageRecord)>(
        &self,
        sink: F,
    ) -> GenResult<DatasetBundle> {
        let cfg = &self.config;
        log::info!(
            "pipeline: seed={} customers={} zones={} dmas={}",
            self.seed(),
            cfg.total_customers,
            cfg.zones,
            cfg.dmas
        );

        // The seeded DMA list is the coverage floor: geography only
        // hands out seeded codes, so every customer's market resolves.
        let n_dmas = if cfg.dmas < cfg.dma_seeds.len() {
            log::warn!(
                "pipeline: raising dma count {} to the seeded minimum {}",
                cfg.dmas,
                cfg.dma_seeds.len()
            );
            cfg.dma_seeds.len()
        } else {
            cfg.dmas
        };

        let mut rng = self.rng_bank.for_generator(GeneratorSlot::Geography);
        let zones = GeographyGenerator::new(cfg).generate(cfg.zones, &mut rng)?;

        let mut rng = self.rng_bank.for_generator(GeneratorSlot::Economic);
        let economics = EconomicGenerator::new(cfg).generate(&zones, &mut rng)?;

        let mut rng = self.rng_bank.for_generator(GeneratorSlot::Competitive);
        let markets = CompetitiveGenerator::new(cfg).generate(n_dmas, &mut rng)?;

        let mut rng = self.rng_bank.for_generator(GeneratorSlot::Lifestyle);
        let lifestyles = LifestyleGenerator::new(cfg).generate(&zones, &mut rng)?;

        let mut rng = self.rng_bank.for_generator(GeneratorSlot::Customer);
        let customers = CustomerGenerator::new(cfg).generate(
            cfg.total_customers,
            &zones,
            &lifestyles,
            &markets,
            &mut rng,
        )?;

        let mut rng = self.rng_bank.for_generator(GeneratorSlot::Usage);
        UsageGenerator::new(cfg).generate_with(&customers, &mut rng, sink)?;

        let mut rng = self.rng_bank.for_generator(GeneratorSlot::Interaction);
        let interactions = InteractionGenerator::new(cfg).generate(&customers, &mut rng)?;

        let mut rng = self.rng_bank.for_generator(GeneratorSlot::Campaign);
        let campaigns = CampaignGenerator::new(cfg).generate(&customers, &mut rng)?;

        Ok(DatasetBundle {
            zones,
            economics,
            markets,
            lifestyles,
            customers,
            usage: Vec::new(),
            interactions,
            campaigns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GenConfig {
        let mut cfg = GenConfig::default();
        cfg.zones = 200;
        cfg.dmas = 90;
        cfg.total_customers = 300;
        cfg
    }

    #[test]
    fn all_eight_tables_are_populated() {
        let bundle = Pipeline::new(small_config(), 42).run().unwrap();
        assert_eq!(bundle.zones.len(), 200);
        assert_eq!(bundle.economics.len(), 200);
        assert_eq!(bundle.markets.len(), 90);
        assert_eq!(bundle.lifestyles.len(), 200);
        assert_eq!(bundle.customers.len(), 300);
        assert!(!bundle.usage.is_empty());
        assert!(!bundle.interactions.is_empty());
        assert!(!bundle.campaigns.is_empty());
    }

    #[test]
    fn dma_count_is_floored_at_the_seeded_list() {
        let mut cfg = small_config();
        cfg.dmas = 10;
        let bundle = Pipeline::new(cfg, 42).run().unwrap();
        let seeded = GenConfig::default().dma_seeds.len();
        assert_eq!(bundle.markets.len(), seeded);
    }
}
