//! Seedable source of the organic variation used throughout the tree

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Bounded pseudorandom distortions.
///
/// Every random decision of the simulation goes through one `Distortion`,
/// so a fixed seed replays a tree exactly.
#[derive(Debug, Clone)]
pub struct Distortion {
    rng: SmallRng,
}

impl Distortion {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[lo, hi)`. An empty or inverted range yields `lo`.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if hi > lo {
            self.rng.gen_range(lo..hi)
        } else {
            lo
        }
    }

    /// Uniform float in `[0, max)`
    pub fn upto(&mut self, max: f32) -> f32 {
        self.uniform(0.0, max)
    }

    /// Uniform index in `[0, n)`; 0 when `n == 0`
    pub fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            0
        } else {
            self.rng.gen_range(0..n)
        }
    }

    /// Sample of the standard normal distribution (Box-Muller)
    pub fn standard_normal(&mut self) -> f32 {
        // 1 - u keeps the log argument in (0, 1]
        let u1 = 1.0 - self.rng.gen::<f32>();
        let u2 = self.rng.gen::<f32>();
        (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
    }

    /// Roll `U(lo, hi)` and report whether it beat `cutoff`.
    /// The chance grows as `lo` approaches `hi`.
    pub fn chance_above(&mut self, lo: f32, hi: f32, cutoff: f32) -> bool {
        self.uniform(lo, hi) > cutoff
    }
}
