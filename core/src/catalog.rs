//! Distribution catalog primitives.
//!
//! RULE: Every weighted or parametric draw in the pipeline goes through
//! one of these types. Weights need not pre-sum to 1 — sampling
//! normalizes. The only fatal construction error is a table with no
//! labels; everything else is clipped or rescaled, never rejected.

use crate::{
    error::{GenError, GenResult},
    rng::GeneratorRng,
};

// ── Weighted categorical tables ──────────────────────────────────────────────

/// An ordered label → weight table. Order is part of the contract:
/// sampling walks entries in declaration order, so two runs with the
/// same seed always resolve ties identically.
#[derive(Debug, Clone)]
pub struct WeightedTable {
    name: String,
    entries: Vec<(String, f64)>,
    total: f64,
}

impl WeightedTable {
    pub fn new(name: &str, entries: Vec<(String, f64)>) -> GenResult<Self> {
        if entries.is_empty() {
            return Err(GenError::EmptyTable { name: name.to_string() });
        }
        let total: f64 = entries.iter().map(|(_, w)| w.max(0.0)).sum();
        Ok(Self {
            name: name.to_string(),
            entries,
            total,
        })
    }

    /// Convenience constructor from static label/weight pairs.
    pub fn from_pairs(name: &str, pairs: &[(&str, f64)]) -> GenResult<Self> {
        Self::new(
            name,
            pairs.iter().map(|(l, w)| (l.to_string(), *w)).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Weighted draw. Normalization happens here, so callers may supply
    /// raw weights, percentages, or probabilities interchangeably.
    pub fn sample<'a>(&'a self, rng: &mut GeneratorRng) -> &'a str {
        let roll = rng.next_f64() * self.total;
        let mut cumulative = 0.0;
        for (label, weight) in &self.entries {
            cumulative += weight.max(0.0);
            if roll < cumulative {
                return label;
            }
        }
        // Float residue lands on the last label.
        &self.entries[self.entries.len() - 1].0
    }

    /// Same table minus one label, reweighted. Used for "secondary pick
    /// must differ from primary" draws.
    pub fn without(&self, excluded: &str) -> GenResult<Self> {
        let remaining: Vec<(String, f64)> = self
            .entries
            .iter()
            .filter(|(l, _)| l != excluded)
            .cloned()
            .collect();
        if remaining.is_empty() {
            // Single-label table: the caller keeps the primary.
            return Self::new(&self.name, self.entries.clone());
        }
        Self::new(&self.name, remaining)
    }
}

// ── Parametric distributions ─────────────────────────────────────────────────

/// A mean/std pair with optional hard bounds. Draws are normal and
/// silently clipped into [min, max]; no error is signaled for
/// out-of-range raw draws.
#[derive(Debug, Clone, Copy)]
pub struct ParamDist {
    pub mean: f64,
    pub std: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ParamDist {
    pub const fn new(mean: f64, std: f64) -> Self {
        Self { mean, std, min: None, max: None }
    }

    pub const fn bounded(mean: f64, std: f64, min: f64, max: f64) -> Self {
        Self { mean, std, min: Some(min), max: Some(max) }
    }

    pub fn sample(&self, rng: &mut GeneratorRng) -> f64 {
        let mut x = rng.normal(self.mean, self.std);
        if let Some(lo) = self.min {
            x = x.max(lo);
        }
        if let Some(hi) = self.max {
            x = x.min(hi);
        }
        x
    }
}

// ── Decision tables ──────────────────────────────────────────────────────────

/// One arm of a decision table: a predicate over the caller's context
/// plus the weight table that applies when it matches.
pub struct DecisionArm<C> {
    pub when: fn(&C) -> bool,
    pub table: WeightedTable,
}

/// An ordered set of (predicate, weight-table) pairs, first match wins,
/// with an unconditional fallback. This replaces per-row procedural
/// branching over conditional weight tables and makes the selection
/// logic independently testable.
pub struct DecisionTable<C> {
    arms: Vec<DecisionArm<C>>,
    fallback: WeightedTable,
}

impl<C> DecisionTable<C> {
    pub fn new(arms: Vec<DecisionArm<C>>, fallback: WeightedTable) -> Self {
        Self { arms, fallback }
    }

    /// The table the first matching arm selects, or the fallback.
    pub fn select(&self, ctx: &C) -> &WeightedTable {
        self.arms
            .iter()
            .find(|arm| (arm.when)(ctx))
            .map(|arm| &arm.table)
            .unwrap_or(&self.fallback)
    }

    /// Select then sample in one step.
    pub fn sample<'a>(&'a self, ctx: &C, rng: &mut GeneratorRng) -> &'a str {
        self.select(ctx).sample(rng)
    }
}

// ── Sum-to-100 normalization ─────────────────────────────────────────────────

/// The canonical correction for any "must sum to 100" attribute group:
/// rescale every entry by 100 / sum, round to `decimals`, then force the
/// last entry to absorb the rounding residue so the total is exactly 100.
pub fn normalize_to_100(values: &mut [f64], decimals: u32) {
    if values.is_empty() {
        return;
    }
    let factor = 10f64.powi(decimals as i32);
    let sum: f64 = values.iter().sum();
    if sum <= 0.0 {
        // Degenerate group: spread evenly.
        let even = (100.0 / values.len() as f64 * factor).round() / factor;
        for v in values.iter_mut() {
            *v = even;
        }
    } else {
        let scale = 100.0 / sum;
        for v in values.iter_mut() {
            *v = (*v * scale * factor).round() / factor;
        }
    }
    let head: f64 = values[..values.len() - 1].iter().sum();
    let last = values.len() - 1;
    values[last] = ((100.0 - head) * factor).round() / factor;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{GeneratorSlot, RngBank};

    fn test_rng() -> GeneratorRng {
        RngBank::new(42).for_generator(GeneratorSlot::Geography)
    }

    #[test]
    fn empty_table_is_a_construction_error() {
        let err = WeightedTable::new("empty", vec![]);
        assert!(err.is_err());
    }

    #[test]
    fn unnormalized_weights_sample_proportionally() {
        // Weights sum to 40, not 1 — sampling must still respect ratios.
        let table = WeightedTable::from_pairs("t", &[("a", 30.0), ("b", 10.0)]).unwrap();
        let mut rng = test_rng();
        let a_hits = (0..10_000).filter(|_| table.sample(&mut rng) == "a").count();
        let share = a_hits as f64 / 10_000.0;
        assert!((share - 0.75).abs() < 0.03, "a sampled at {share}, expected ~0.75");
    }

    #[test]
    fn without_drops_only_the_excluded_label() {
        let table =
            WeightedTable::from_pairs("t", &[("a", 1.0), ("b", 1.0), ("c", 1.0)]).unwrap();
        let reduced = table.without("b").unwrap();
        let labels: Vec<&str> = reduced.labels().collect();
        assert_eq!(labels, vec!["a", "c"]);
    }

    #[test]
    fn decision_table_first_match_wins() {
        let older = WeightedTable::from_pairs("older", &[("x", 1.0)]).unwrap();
        let younger = WeightedTable::from_pairs("younger", &[("y", 1.0)]).unwrap();
        let fallback = WeightedTable::from_pairs("fallback", &[("z", 1.0)]).unwrap();
        let dt: DecisionTable<i64> = DecisionTable::new(
            vec![
                DecisionArm { when: |age| *age >= 55, table: older },
                DecisionArm { when: |age| *age <= 28, table: younger },
            ],
            fallback,
        );
        assert_eq!(dt.select(&60).name(), "older");
        assert_eq!(dt.select(&20).name(), "younger");
        assert_eq!(dt.select(&40).name(), "fallback");
    }

    #[test]
    fn normalize_to_100_is_exact() {
        let mut shares = vec![28.4, 25.1, 24.9, 17.8, 6.2];
        normalize_to_100(&mut shares, 2);
        let total: f64 = shares.iter().sum();
        assert!((total - 100.0).abs() < 1e-9, "total was {total}");
    }

    #[test]
    fn normalize_to_100_handles_degenerate_groups() {
        let mut zeros = vec![0.0, 0.0, 0.0, 0.0];
        normalize_to_100(&mut zeros, 2);
        let total: f64 = zeros.iter().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn param_dist_clips_silently() {
        let dist = ParamDist::bounded(100.0, 50.0, 70.0, 180.0);
        let mut rng = test_rng();
        for _ in 0..5000 {
            let x = dist.sample(&mut rng);
            assert!((70.0..=180.0).contains(&x));
        }
    }
}
