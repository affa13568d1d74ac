//! Particle population and per-tick integration.
//!
//! Each tick every particle either drifts idly (noise jitter plus a weak
//! spring toward home) when no well is active, or accelerates under the
//! [`ForceField`] when at least one is. Then, unconditionally: damping,
//! per-component speed clamp, axis-dominance damping, Euler integration,
//! and toroidal wrap.

use crate::config::SimConfig;
use crate::error::SwarmError;
use crate::force::ForceField;
use crate::idle::{IdleNoise, PerlinNoise};
use crate::particle::{Particle, RenderPoint};
use crate::prng::{RandomSource, Xorshift64};
use crate::well::Well;
use glam::DVec2;

/// Owns the swarm and advances it one frame at a time.
pub struct ParticleSimulator {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    tick: u64,
    config: SimConfig,
    field: ForceField,
    rng: Box<dyn RandomSource>,
    noise: Box<dyn IdleNoise>,
}

impl ParticleSimulator {
    /// Creates a simulator with `config.particle_count` particles scattered
    /// uniformly over the canvas, using seeded Xorshift64 scatter and Perlin
    /// idle noise.
    pub fn new(width: f64, height: f64, config: SimConfig, seed: u64) -> Result<Self, SwarmError> {
        Self::with_sources(
            width,
            height,
            config,
            Box::new(Xorshift64::new(seed)),
            Box::new(PerlinNoise::new(seed)),
        )
    }

    /// Creates a simulator drawing scatter from `rng` and idle jitter from `noise`.
    ///
    /// Returns `SwarmError::InvalidDimensions` for a degenerate canvas and
    /// `SwarmError::InvalidParameter` for an out-of-range config.
    pub fn with_sources(
        width: f64,
        height: f64,
        config: SimConfig,
        rng: Box<dyn RandomSource>,
        noise: Box<dyn IdleNoise>,
    ) -> Result<Self, SwarmError> {
        validate_dimensions(width, height)?;
        config.validate()?;
        let mut sim = Self {
            width,
            height,
            particles: Vec::new(),
            tick: 0,
            config,
            field: ForceField::from_config(&config),
            rng,
            noise,
        };
        sim.reset_population(config.particle_count);
        Ok(sim)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Ticks advanced since construction.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn force_field(&self) -> &ForceField {
        &self.field
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Per-particle `(x, y, hue)` for a renderer.
    pub fn render_points(&self) -> impl Iterator<Item = RenderPoint> + '_ {
        self.particles.iter().map(Particle::render_point)
    }

    /// Replaces the whole population with `count` fresh particles at rest.
    ///
    /// Positions and hues continue the random stream, so a reset after N
    /// ticks gives a different but still reproducible layout.
    pub fn reset_population(&mut self, count: usize) {
        let (w, h) = (self.width, self.height);
        self.config.particle_count = count;
        self.particles = (0..count)
            .map(|_| {
                let x = wrap_coord(self.rng.next_range(0.0, w), w);
                let y = wrap_coord(self.rng.next_range(0.0, h), h);
                let hue = self.rng.next_range(0.0, 360.0);
                Particle::at_rest(DVec2::new(x, y), hue)
            })
            .collect();
        log::debug!("population reset to {count} particles on {w}x{h}");
    }

    /// Rescales every live position to a new canvas size.
    ///
    /// Home positions are not touched: after a resize the idle spring still
    /// pulls toward the layout of the original canvas.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), SwarmError> {
        validate_dimensions(width, height)?;
        let scale = DVec2::new(width / self.width, height / self.height);
        for p in &mut self.particles {
            let scaled = p.position * scale;
            p.position = DVec2::new(wrap_coord(scaled.x, width), wrap_coord(scaled.y, height));
        }
        log::debug!(
            "canvas resized from {}x{} to {width}x{height}",
            self.width,
            self.height
        );
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Advances every particle by one tick under `wells`.
    pub fn step(&mut self, wells: &[Well]) {
        let cfg = self.config;
        let idle = wells.is_empty();
        let ns = cfg.noise_scale;
        let t = self.tick as f64 * ns;
        let max = DVec2::splat(cfg.max_speed);

        for p in &mut self.particles {
            if idle {
                let n = self.noise.sample(p.position.x * ns, p.position.y * ns, t);
                p.velocity += DVec2::splat(n.clamp(-1.0, 1.0) * cfg.jitter_amplitude);

                let to_home = p.home() - p.position;
                if to_home.length_squared() > cfg.home_threshold_sq {
                    p.velocity += to_home * cfg.spring_k;
                }
            } else {
                p.velocity += self.field.acceleration_at(p.position, wells);
            }

            p.velocity *= cfg.damping;
            p.velocity = p.velocity.clamp(-max, max);
            p.velocity = damp_dominant_axis(p.velocity, &cfg);

            p.position += p.velocity;
            p.position = DVec2::new(
                wrap_coord(p.position.x, self.width),
                wrap_coord(p.position.y, self.height),
            );
            p.age += 1;
        }

        self.tick += 1;
    }

    /// Aggregate state of the swarm.
    pub fn stats(&self) -> SwarmStats {
        let n = self.particles.len();
        let max_speed = self
            .particles
            .iter()
            .map(|p| p.velocity.abs().max_element())
            .fold(0.0, f64::max);
        let mean_home = if n == 0 {
            0.0
        } else {
            self.particles
                .iter()
                .map(Particle::distance_to_home)
                .sum::<f64>()
                / n as f64
        };
        SwarmStats {
            particles: n,
            tick: self.tick,
            mean_distance_to_home: mean_home,
            max_speed_component: max_speed,
        }
    }

    /// Mean Euclidean distance from every particle to `point`.
    pub fn mean_distance_to(&self, point: DVec2) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        self.particles
            .iter()
            .map(|p| p.position.distance(point))
            .sum::<f64>()
            / self.particles.len() as f64
    }
}

/// Summary of the swarm at one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmStats {
    pub particles: usize,
    pub tick: u64,
    pub mean_distance_to_home: f64,
    /// Largest |vx| or |vy| in the population.
    pub max_speed_component: f64,
}

fn validate_dimensions(width: f64, height: f64) -> Result<(), SwarmError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(SwarmError::InvalidDimensions)
    }
}

/// Shrinks whichever component dominates the other by more than
/// `axis_ratio` while moving faster than `axis_min_speed`.
fn damp_dominant_axis(v: DVec2, cfg: &SimConfig) -> DVec2 {
    let (ax, ay) = (v.x.abs(), v.y.abs());
    let mut out = v;
    if ax > ay * cfg.axis_ratio && ax > cfg.axis_min_speed {
        out.x *= cfg.axis_factor;
    }
    if ay > ax * cfg.axis_ratio && ay > cfg.axis_min_speed {
        out.y *= cfg.axis_factor;
    }
    out
}

/// Maps `v` into `[0, size)`.
///
/// One add or subtract covers every step the speed clamp allows; the
/// `rem_euclid` path handles larger jumps and the rounding case where
/// `v + size` lands exactly on `size`.
fn wrap_coord(v: f64, size: f64) -> f64 {
    let mut w = v;
    if w < 0.0 {
        w += size;
    } else if w >= size {
        w -= size;
    }
    if !(0.0..size).contains(&w) {
        w = w.rem_euclid(size);
        if w >= size {
            w = 0.0;
        }
    }
    w
}
