//! Random sources for the simulation.
//!
//! Every random draw in the engine goes through [`RandomSource`], so a game
//! can be replayed from a seed ([`SimRng`]) or driven by a fixed script of
//! values in tests ([`ScriptedRng`]).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

/// Uniform random numbers in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `0..n` (0 when `n` is 0).
    fn below(&mut self, n: u32) -> u32 {
        let idx = (self.next_f64() * n as f64).floor() as u32;
        idx.min(n.saturating_sub(1))
    }
}

/// Deterministic RNG backed by `ChaCha8Rng`.
#[derive(Debug, Clone)]
pub struct SimRng(ChaCha8Rng);

impl SimRng {
    /// Create a new `SimRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seeded from OS entropy, for interactive play.
    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::from_seed_u64(DEFAULT_SEED)
    }
}

impl RandomSource for SimRng {
    fn next_f64(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Replays a fixed cycle of values. Handy for pinning down which branch a
/// stochastic stage takes.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRng {
    /// Cycle through `values` forever. An empty script always yields 0.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Always return `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
