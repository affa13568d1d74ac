//! Coherent noise sources for idle jitter.
//!
//! When no well is active every particle receives a small drift sampled
//! from a smooth noise field over (x, y, time). The source is injected so
//! runs are reproducible and tests can switch jitter off entirely.

use noise::{NoiseFn, Perlin};

/// A smooth, deterministic scalar noise field.
///
/// Implementations return values in [-1, 1]; same inputs, same output.
pub trait IdleNoise: Send + Sync {
    fn sample(&self, x: f64, y: f64, t: f64) -> f64;
}

/// 3D Perlin noise (x, y, time) from the `noise` crate.
pub struct PerlinNoise {
    noise: Perlin,
}

impl PerlinNoise {
    /// Only the low 32 bits of `seed` select the permutation table.
    pub fn new(seed: u64) -> Self {
        Self {
            noise: Perlin::new(seed as u32),
        }
    }
}

impl IdleNoise for PerlinNoise {
    fn sample(&self, x: f64, y: f64, t: f64) -> f64 {
        self.noise.get([x, y, t]).clamp(-1.0, 1.0)
    }
}

/// Always zero. Disables idle jitter while keeping the home spring.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNoise;

impl IdleNoise for SilentNoise {
    fn sample(&self, _x: f64, _y: f64, _t: f64) -> f64 {
        0.0
    }
}
