//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! Every draw flows through the run's single SimRng, seeded from a
//! caller-supplied master seed, so a forecast is fully reproducible
//! from (inputs, seed).

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// The deterministic RNG stream for one simulation run.
pub struct SimRng {
    inner: Pcg64Mcg,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.next_u64() % n
    }

    /// Roll a whole percent in [1, 100] — the sampler's band die.
    pub fn roll_percent(&mut self) -> u32 {
        (self.next_u64_below(100) + 1) as u32
    }
}
