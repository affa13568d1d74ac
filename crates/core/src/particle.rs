//! Particle state and the views handed to renderers.

use glam::DVec2;

/// One point of the swarm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    home: DVec2,
    /// Degrees in [0, 360). Cosmetic only.
    pub hue: f64,
    /// Ticks survived. Not read by the simulation.
    pub age: u64,
}

impl Particle {
    /// A particle at rest whose home is its starting position.
    pub fn at_rest(position: DVec2, hue: f64) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            home: position,
            hue,
            age: 0,
        }
    }

    /// Where the idle spring pulls this particle. Fixed at creation.
    pub fn home(&self) -> DVec2 {
        self.home
    }

    pub fn distance_to_home(&self) -> f64 {
        self.position.distance(self.home)
    }

    pub fn render_point(&self) -> RenderPoint {
        RenderPoint {
            x: self.position.x,
            y: self.position.y,
            hue: self.hue,
        }
    }
}

/// What a renderer needs to draw one dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPoint {
    pub x: f64,
    pub y: f64,
    pub hue: f64,
}
