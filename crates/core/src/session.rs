//! Reproducible description of a simulation run.
//!
//! A [`Session`] captures everything needed to rebuild the same swarm:
//! canvas size, population, PRNG seed, tick count, and parameter overrides.
//! Two identical sessions fed the same input script produce bit-identical
//! particle states.

use crate::config::SimConfig;
use crate::error::SwarmError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub width: f64,
    pub height: f64,
    pub particles: usize,
    pub seed: u64,
    pub steps: usize,
    /// Overrides applied on top of [`SimConfig::default`].
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Session {
    /// A session with no overrides and zero steps.
    pub fn new(width: f64, height: f64, particles: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            particles,
            seed,
            steps: 0,
            params: empty_params(),
        }
    }

    /// The effective config: defaults, then `params`, then `particles`.
    pub fn config(&self) -> SimConfig {
        SimConfig {
            particle_count: self.particles,
            ..SimConfig::from_json(&self.params)
        }
    }

    pub fn validate(&self) -> Result<(), SwarmError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(SwarmError::InvalidDimensions);
        }
        self.config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_has_empty_params_and_zero_steps() {
        let s = Session::new(800.0, 600.0, 600, 42);
        assert_eq!(s.steps, 0);
        assert_eq!(s.params, json!({}));
        assert_eq!(s.config(), SimConfig::default());
    }

    #[test]
    fn particles_override_params() {
        let mut s = Session::new(800.0, 600.0, 200, 1);
        s.params = json!({"particle_count": 1000, "max_wells": 3});
        let c = s.config();
        assert_eq!(c.particle_count, 200);
        assert_eq!(c.max_wells, 3);
    }

    #[test]
    fn json_round_trip_with_overrides() {
        let mut s = Session::new(1024.0, 768.0, 400, 8675309);
        s.params = json!({"swirl_factor": 0.6, "damping": 0.99});
        s.steps = 300;
        let text = serde_json::to_string_pretty(&s).unwrap();
        let back: Session = serde_json::from_str(&text).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn missing_params_deserialize_as_empty() {
        let s: Session = serde_json::from_str(
            r#"{"width": 800, "height": 600, "particles": 600, "seed": 3, "steps": 10}"#,
        )
        .unwrap();
        assert_eq!(s.params, json!({}));
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(Session::new(800.0, 600.0, 600, 42).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_canvas() {
        assert!(Session::new(0.0, 600.0, 600, 42).validate().is_err());
        assert!(Session::new(800.0, f64::INFINITY, 600, 42).validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_params() {
        let mut s = Session::new(800.0, 600.0, 600, 42);
        s.params = json!({"max_speed": 0.0});
        assert!(matches!(
            s.validate(),
            Err(SwarmError::InvalidParameter { .. })
        ));
    }
}
