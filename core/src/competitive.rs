//! Competitive landscape generator.
//!
//! One record per designated market area: market size, per-carrier
//! share/price/coverage/NPS, and the HHI concentration index. The five
//! carrier shares are sampled independently and bounded, then rescaled
//! by 100/sum with the last share absorbing rounding residue — the
//! canonical correction for every sum-to-100 group in the pipeline.

use crate::{
    catalog::normalize_to_100,
    config::GenConfig,
    error::{GenError, GenResult},
    rng::GeneratorRng,
    types::round2,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Active competitor promotions rotated across markets.
const COMPETITOR_PROMOS: [&str; 10] = [
    "Unlimited plan at $50/month for new customers",
    "Free iPhone 15 with trade-in",
    "Buy one get one free on all smartphones",
    "3 months free when you switch",
    "$200 prepaid card for switchers",
    "50% off family plans first year",
    "Free Netflix subscription included",
    "No activation fees limited time",
    "Double data on all plans",
    "Student discount 25% off",
];

/// One market row, keyed by DMA code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveMarket {
    pub dma_code: String,
    pub dma_name: String,
    pub total_wireless_subs: i64,
    pub market_size_revenue: f64,
    pub yoy_market_growth: f64,
    pub snowmobile_subs: i64,
    pub snowmobile_market_share: f64,
    pub snowmobile_nps: i64,
    pub snowmobile_coverage_pct: f64,
    pub snowmobile_5g_pct: f64,
    pub vz_market_share: f64,
    pub vz_avg_price: f64,
    pub vz_nps: i64,
    pub vz_coverage_pct: f64,
    pub att_market_share: f64,
    pub att_avg_price: f64,
    pub att_nps: i64,
    pub att_coverage_pct: f64,
    pub tmo_market_share: f64,
    pub tmo_avg_price: f64,
    pub tmo_nps: i64,
    pub tmo_coverage_pct: f64,
    pub regional_market_share: f64,
    pub regional_avg_price: f64,
    pub market_concentration: f64,
    pub price_war_intensity: String,
    pub recent_competitor_promo: Option<String>,
    pub promo_end_date: Option<NaiveDate>,
}

pub struct CompetitiveGenerator<'a> {
    config: &'a GenConfig,
}

impl<'a> CompetitiveGenerator<'a> {
    pub fn new(config: &'a GenConfig) -> Self {
        Self { config }
    }

    pub fn generate(
        &self,
        n_dmas: usize,
        rng: &mut GeneratorRng,
    ) -> GenResult<Vec<CompetitiveMarket>> {
        if n_dmas == 0 {
            return Err(GenError::EmptyInput { name: "dmas" });
        }

        let seeds = &self.config.dma_seeds;
        if n_dmas < seeds.len() {
            log::warn!(
                "competitive: {} markets requested, below the {} seeded DMAs — \
                 zone DMA references may not all resolve",
                n_dmas,
                seeds.len()
            );
        }

        let mut markets = Vec::with_capacity(n_dmas);
        for seed in seeds.iter().take(n_dmas) {
            markets.push(self.generate_market(seed.code, seed.name, seed.base_subs, rng));
        }

        // Beyond the seeded list, synthesize small markets with fresh
        // codes from 700 upward (skipping any code already used).
        let mut next_code = 700u32;
        while markets.len() < n_dmas {
            let code = next_code.to_string();
            next_code += 1;
            if seeds.iter().any(|d| d.code == code) {
                continue;
            }
            let name = format!("Market {code}");
            let base_subs = rng.uniform(100_000.0, 800_000.0) as u64;
            markets.push(self.generate_market(&code, &name, base_subs, rng));
        }

        log::info!("competitive: generated {} market records", markets.len());
        Ok(markets)
    }

    fn generate_market(
        &self,
        dma_code: &str,
        dma_name: &str,
        base_subs: u64,
        rng: &mut GeneratorRng,
    ) -> CompetitiveMarket {
        let cfg = self.config;

        let total_subs = (base_subs as f64 * rng.uniform(0.8, 1.2)) as i64;
        let avg_revenue_per_sub = rng.uniform(55.0, 75.0);
        let market_revenue = round2(total_subs as f64 * avg_revenue_per_sub * 12.0 / 1e6);
        let market_growth = round2(rng.normal(2.5, 2.0));

        let share_mean = |carrier: &str| {
            cfg.carrier_share
                .iter()
                .find(|(c, _)| *c == carrier)
                .map(|(_, d)| d.mean)
                .unwrap_or(20.0)
        };

        // House carrier is stronger in western markets, weaker in the
        // NY/NJ corridor.
        let snow_base = if dma_name.contains("CA") || dma_name.contains("WA") || dma_name.contains("CO") {
            22.0
        } else if dma_name.contains("NY") || dma_name.contains("NJ") {
            14.0
        } else {
            18.0
        };

        let vz = (share_mean("Verizon") + rng.normal(0.0, 5.0)).clamp(15.0, 40.0);
        let att = (share_mean("AT&T") + rng.normal(0.0, 5.0)).clamp(15.0, 35.0);
        let tmo = (share_mean("T-Mobile") + rng.normal(0.0, 4.0)).clamp(15.0, 35.0);
        let snow = (snow_base + rng.normal(0.0, 4.0)).clamp(10.0, 30.0);
        let regional = (100.0 - (vz + att + tmo + snow)).max(2.0);

        let mut shares = [vz, att, tmo, snow, regional];
        normalize_to_100(&mut shares, 2);
        let [vz_share, att_share, tmo_share, snow_share, regional_share] = shares;

        let snow_subs = (total_subs as f64 * snow_share / 100.0) as i64;

        let snow_nps = rng.normal(32.0, 8.0) as i64;
        let vz_nps = rng.normal(28.0, 10.0) as i64;
        let att_nps = rng.normal(22.0, 10.0) as i64;
        let tmo_nps = rng.normal(35.0, 12.0) as i64;

        let snow_coverage = round2(rng.normal_clamped(96.0, 3.0, 85.0, 99.0));
        let snow_5g = round2(rng.normal_clamped(82.0, 8.0, 60.0, 95.0));
        let vz_coverage = round2(rng.normal_clamped(97.0, 2.0, 90.0, 99.0));
        let att_coverage = round2(rng.normal_clamped(96.0, 2.0, 88.0, 99.0));
        let tmo_coverage = round2(rng.normal_clamped(95.0, 3.0, 85.0, 99.0));

        let price_mean = |carrier: &str| {
            cfg.carrier_price
                .iter()
                .find(|(c, _)| *c == carrier)
                .map(|(_, d)| d.mean)
                .unwrap_or(60.0)
        };
        let vz_price = round2(price_mean("Verizon") + rng.normal(0.0, 5.0));
        let att_price = round2(price_mean("AT&T") + rng.normal(0.0, 5.0));
        let tmo_price = round2(price_mean("T-Mobile") + rng.normal(0.0, 5.0));
        let regional_price = round2(price_mean("Regional") + rng.normal(0.0, 8.0));

        let hhi = round2(
            (vz_share.powi(2)
                + att_share.powi(2)
                + tmo_share.powi(2)
                + snow_share.powi(2)
                + regional_share.powi(2))
                / 100.0,
        );
        let price_war_intensity = if hhi < 20.0 {
            "High"
        } else if hhi < 25.0 {
            "Medium"
        } else {
            "Low"
        };

        let (promo, promo_end) = if rng.chance(0.7) {
            let promo = (*rng.pick(&COMPETITOR_PROMOS)).to_string();
            let end = cfg.snapshot_date + Duration::days(rng.int_in(7, 60));
            (Some(promo), Some(end))
        } else {
            (None, None)
        };

        CompetitiveMarket {
            dma_code: dma_code.to_string(),
            dma_name: dma_name.to_string(),
            total_wireless_subs: total_subs,
            market_size_revenue: market_revenue,
            yoy_market_growth: market_growth,
            snowmobile_subs: snow_subs,
            snowmobile_market_share: snow_share,
            snowmobile_nps: snow_nps,
            snowmobile_coverage_pct: snow_coverage,
            snowmobile_5g_pct: snow_5g,
            vz_market_share: vz_share,
            vz_avg_price: vz_price,
            vz_nps,
            vz_coverage_pct: vz_coverage,
            att_market_share: att_share,
            att_avg_price: att_price,
            att_nps,
            att_coverage_pct: att_coverage,
            tmo_market_share: tmo_share,
            tmo_avg_price: tmo_price,
            tmo_nps,
            tmo_coverage_pct: tmo_coverage,
            regional_market_share: regional_share,
            regional_avg_price: regional_price,
            market_concentration: hhi,
            price_war_intensity: price_war_intensity.to_string(),
            recent_competitor_promo: promo,
            promo_end_date: promo_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GeneratorSlot, RngBank};

    #[test]
    fn shares_sum_to_exactly_100() {
        let cfg = GenConfig::default();
        let mut rng = RngBank::new(42).for_generator(GeneratorSlot::Competitive);
        let markets = CompetitiveGenerator::new(&cfg).generate(210, &mut rng).unwrap();
        assert_eq!(markets.len(), 210);
        for m in &markets {
            let total = m.snowmobile_market_share
                + m.vz_market_share
                + m.att_market_share
                + m.tmo_market_share
                + m.regional_market_share;
            assert!(
                (total - 100.0).abs() <= 1.0,
                "market {} shares sum to {total}",
                m.dma_code
            );
        }
    }

    #[test]
    fn synthesized_codes_never_collide_with_seeds() {
        let cfg = GenConfig::default();
        let mut rng = RngBank::new(7).for_generator(GeneratorSlot::Competitive);
        let markets = CompetitiveGenerator::new(&cfg).generate(210, &mut rng).unwrap();
        let mut codes: Vec<&str> = markets.iter().map(|m| m.dma_code.as_str()).collect();
        codes.sort();
        let before = codes.len();
        codes.dedup();
        assert_eq!(codes.len(), before, "duplicate DMA codes");
    }

    #[test]
    fn price_war_intensity_tracks_concentration() {
        let cfg = GenConfig::default();
        let mut rng = RngBank::new(3).for_generator(GeneratorSlot::Competitive);
        let markets = CompetitiveGenerator::new(&cfg).generate(100, &mut rng).unwrap();
        for m in &markets {
            let expected = if m.market_concentration < 20.0 {
                "High"
            } else if m.market_concentration < 25.0 {
                "Medium"
            } else {
                "Low"
            };
            assert_eq!(m.price_war_intensity, expected);
        }
    }
}
