//! Deterministic random number generation.
//!
//! RULE: Nothing in the pipeline may call any platform RNG.
//! All randomness flows through GeneratorRng instances derived
//! from the single master seed supplied at the CLI.
//!
//! Each generator gets its own RNG stream, seeded deterministically
//! from (master_seed XOR generator_slot). This means:
//!   - Adding a new generator never changes existing generators' streams.
//!   - Each generator's stream is fully reproducible in isolation.
//!   - A sharded implementation can derive per-shard sub-streams the
//!     same way (master XOR shard index) without shared mutable state.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single generator stage.
pub struct GeneratorRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl GeneratorRng {
    /// Create a generator RNG from the master seed and a stable
    /// slot index. The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Fill a byte buffer. Used to mint deterministic UUIDs.
    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        use rand::RngCore;
        self.inner.fill_bytes(buf);
    }

    /// Roll a u64 in [0, n).
    pub fn below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an i64 in [lo, hi) — half-open like the original decision tables.
    pub fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(hi > lo, "empty integer range");
        lo + self.below((hi - lo) as u64) as i64
    }

    /// Uniform float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Standard normal via Box-Muller. Consumes exactly two uniforms.
    pub fn standard_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    /// Normal with the given mean and standard deviation.
    pub fn normal(&mut self, mean: f64, std: f64) -> f64 {
        mean + std * self.standard_normal()
    }

    /// Normal draw clamped to [lo, hi]. Out-of-range raw draws are
    /// silently clipped; the validation engine treats clipping as expected.
    pub fn normal_clamped(&mut self, mean: f64, std: f64, lo: f64, hi: f64) -> f64 {
        self.normal(mean, std).clamp(lo, hi)
    }

    /// Exponential with the given mean (inverse-CDF draw).
    pub fn exponential(&mut self, mean: f64) -> f64 {
        let u = self.next_f64();
        -mean * (1.0 - u).ln()
    }

    /// Poisson count via Knuth's method. Suitable for the small
    /// lambdas used here (interaction/campaign counts).
    pub fn poisson(&mut self, lambda: f64) -> u64 {
        let l = (-lambda).exp();
        let mut k = 0u64;
        let mut p = 1.0;
        loop {
            p *= self.next_f64();
            if p <= l {
                return k;
            }
            k += 1;
        }
    }

    /// Beta(a, b) for integer shape parameters, sampled as the a-th
    /// smallest of (a + b - 1) uniforms.
    pub fn beta_int(&mut self, a: u32, b: u32) -> f64 {
        assert!(a >= 1 && b >= 1, "beta shape parameters must be >= 1");
        let n = (a + b - 1) as usize;
        let mut draws: Vec<f64> = (0..n).map(|_| self.next_f64()).collect();
        draws.sort_by(|x, y| x.partial_cmp(y).expect("uniform draws are finite"));
        draws[(a - 1) as usize]
    }

    /// Pick a uniformly random element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "pick() on empty slice");
        &items[self.below(items.len() as u64) as usize]
    }
}

/// All generator RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_generator(&self, slot: GeneratorSlot) -> GeneratorRng {
        GeneratorRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable generator slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every generator's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum GeneratorSlot {
    Geography = 0,
    Economic = 1,
    Competitive = 2,
    Lifestyle = 3,
    Customer = 4,
    Usage = 5,
    Interaction = 6,
    Campaign = 7,
    // Add new generators here — append only.
}

impl GeneratorSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Geography => "geography",
            Self::Economic => "economic",
            Self::Competitive => "competitive",
            Self::Lifestyle => "lifestyle",
            Self::Customer => "customer",
            Self::Usage => "usage",
            Self::Interaction => "interaction",
            Self::Campaign => "campaign",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_seeds_produce_identical_streams() {
        let bank_a = RngBank::new(42);
        let bank_b = RngBank::new(42);
        let mut a = bank_a.for_generator(GeneratorSlot::Customer);
        let mut b = bank_b.for_generator(GeneratorSlot::Customer);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn slots_produce_independent_streams() {
        let bank = RngBank::new(42);
        let mut geo = bank.for_generator(GeneratorSlot::Geography);
        let mut cust = bank.for_generator(GeneratorSlot::Customer);
        let same = (0..100).filter(|_| geo.next_u64() == cust.next_u64()).count();
        assert_eq!(same, 0, "distinct slots must not share a stream");
    }

    #[test]
    fn normal_clamped_respects_bounds() {
        let bank = RngBank::new(7);
        let mut rng = bank.for_generator(GeneratorSlot::Economic);
        for _ in 0..10_000 {
            let x = rng.normal_clamped(100.0, 50.0, 70.0, 180.0);
            assert!((70.0..=180.0).contains(&x), "clamped draw escaped bounds: {x}");
        }
    }

    #[test]
    fn poisson_mean_is_close_to_lambda() {
        let bank = RngBank::new(99);
        let mut rng = bank.for_generator(GeneratorSlot::Interaction);
        let n = 20_000;
        let total: u64 = (0..n).map(|_| rng.poisson(2.0)).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - 2.0).abs() < 0.1, "poisson mean drifted: {mean}");
    }

    #[test]
    fn beta_int_stays_in_unit_interval() {
        let bank = RngBank::new(3);
        let mut rng = bank.for_generator(GeneratorSlot::Customer);
        for _ in 0..1000 {
            let x = rng.beta_int(2, 3);
            assert!((0.0..=1.0).contains(&x));
        }
    }
}
