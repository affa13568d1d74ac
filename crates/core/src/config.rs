//! Simulation tunables.
//!
//! [`SimConfig`] bundles every constant the well model and the integrator
//! use. [`Default`] gives the reference feel; [`SimConfig::from_json`]
//! applies partial overrides on top of it.

use crate::error::SwarmError;
use crate::params::{param_f64, param_usize};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Selectable population sizes.
pub const PARTICLE_COUNT_PRESETS: [usize; 4] = [200, 400, 600, 1000];

const DEFAULT_MAX_WELLS: usize = 6;
const DEFAULT_PARTICLE_COUNT: usize = 600;
const DEFAULT_SOFTENING: f64 = 400.0;
const DEFAULT_RADIAL_SCALE: f64 = 150.0;
const DEFAULT_SWIRL_SCALE: f64 = 40.0;
const DEFAULT_SWIRL_FACTOR: f64 = 0.45;
const DEFAULT_SPRING_K: f64 = 0.0002;
const DEFAULT_HOME_THRESHOLD_SQ: f64 = 0.01;
const DEFAULT_DAMPING: f64 = 0.995;
const DEFAULT_MAX_SPEED: f64 = 2.0;
const DEFAULT_AXIS_RATIO: f64 = 1.6;
const DEFAULT_AXIS_MIN_SPEED: f64 = 0.4;
const DEFAULT_AXIS_FACTOR: f64 = 0.55;
const DEFAULT_NOISE_SCALE: f64 = 0.002;
const DEFAULT_JITTER_AMPLITUDE: f64 = 0.02;
const DEFAULT_BASE_STRENGTH: f64 = 2.0;
const DEFAULT_DURATION_GAIN: f64 = 2.5;
const DEFAULT_DURATION_CAP: f64 = 4.0;
const DEFAULT_PRESSURE_GAIN: f64 = 3.0;
const DEFAULT_POINTER_STRENGTH: f64 = 4.0;

/// Every tunable of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Cap on simultaneously active wells.
    pub max_wells: usize,
    /// Population size on construction and reset.
    pub particle_count: usize,
    /// Added to squared distance so force stays finite at a well's center.
    pub softening: f64,
    /// Multiplier on the radial (inward) force term.
    pub radial_scale: f64,
    /// Multiplier on the perpendicular (swirl) force term.
    pub swirl_scale: f64,
    pub swirl_factor: f64,
    /// Idle pull back toward home, per unit of displacement.
    pub spring_k: f64,
    /// Squared home distance below which the spring is idle.
    pub home_threshold_sq: f64,
    /// Per-tick velocity multiplier.
    pub damping: f64,
    /// Cap on |vx| and |vy|.
    pub max_speed: f64,
    pub axis_ratio: f64,
    pub axis_min_speed: f64,
    pub axis_factor: f64,
    /// Spatial and temporal scale of the idle noise lookup.
    pub noise_scale: f64,
    /// Half-width of the idle jitter range.
    pub jitter_amplitude: f64,
    pub base_strength: f64,
    /// Strength gained per second of press.
    pub duration_gain: f64,
    /// Upper bound on the duration term.
    pub duration_cap: f64,
    /// Strength gained at full pressure.
    pub pressure_gain: f64,
    /// Fixed strength of the mouse/pointer well.
    pub pointer_strength: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_wells: DEFAULT_MAX_WELLS,
            particle_count: DEFAULT_PARTICLE_COUNT,
            softening: DEFAULT_SOFTENING,
            radial_scale: DEFAULT_RADIAL_SCALE,
            swirl_scale: DEFAULT_SWIRL_SCALE,
            swirl_factor: DEFAULT_SWIRL_FACTOR,
            spring_k: DEFAULT_SPRING_K,
            home_threshold_sq: DEFAULT_HOME_THRESHOLD_SQ,
            damping: DEFAULT_DAMPING,
            max_speed: DEFAULT_MAX_SPEED,
            axis_ratio: DEFAULT_AXIS_RATIO,
            axis_min_speed: DEFAULT_AXIS_MIN_SPEED,
            axis_factor: DEFAULT_AXIS_FACTOR,
            noise_scale: DEFAULT_NOISE_SCALE,
            jitter_amplitude: DEFAULT_JITTER_AMPLITUDE,
            base_strength: DEFAULT_BASE_STRENGTH,
            duration_gain: DEFAULT_DURATION_GAIN,
            duration_cap: DEFAULT_DURATION_CAP,
            pressure_gain: DEFAULT_PRESSURE_GAIN,
            pointer_strength: DEFAULT_POINTER_STRENGTH,
        }
    }
}

impl SimConfig {
    /// Builds a config from a JSON object, falling back to defaults per key.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            max_wells: param_usize(params, "max_wells", d.max_wells),
            particle_count: param_usize(params, "particle_count", d.particle_count),
            softening: param_f64(params, "softening", d.softening),
            radial_scale: param_f64(params, "radial_scale", d.radial_scale),
            swirl_scale: param_f64(params, "swirl_scale", d.swirl_scale),
            swirl_factor: param_f64(params, "swirl_factor", d.swirl_factor),
            spring_k: param_f64(params, "spring_k", d.spring_k),
            home_threshold_sq: param_f64(params, "home_threshold_sq", d.home_threshold_sq),
            damping: param_f64(params, "damping", d.damping),
            max_speed: param_f64(params, "max_speed", d.max_speed),
            axis_ratio: param_f64(params, "axis_ratio", d.axis_ratio),
            axis_min_speed: param_f64(params, "axis_min_speed", d.axis_min_speed),
            axis_factor: param_f64(params, "axis_factor", d.axis_factor),
            noise_scale: param_f64(params, "noise_scale", d.noise_scale),
            jitter_amplitude: param_f64(params, "jitter_amplitude", d.jitter_amplitude),
            base_strength: param_f64(params, "base_strength", d.base_strength),
            duration_gain: param_f64(params, "duration_gain", d.duration_gain),
            duration_cap: param_f64(params, "duration_cap", d.duration_cap),
            pressure_gain: param_f64(params, "pressure_gain", d.pressure_gain),
            pointer_strength: param_f64(params, "pointer_strength", d.pointer_strength),
        }
    }

    /// Checks the ranges the integrator relies on.
    ///
    /// A positive softening constant is what keeps the force finite, and a
    /// positive `max_speed` is what bounds velocity, so both are enforced.
    pub fn validate(&self) -> Result<(), SwarmError> {
        let finite = [
            ("softening", self.softening),
            ("radial_scale", self.radial_scale),
            ("swirl_scale", self.swirl_scale),
            ("swirl_factor", self.swirl_factor),
            ("spring_k", self.spring_k),
            ("home_threshold_sq", self.home_threshold_sq),
            ("damping", self.damping),
            ("max_speed", self.max_speed),
            ("axis_ratio", self.axis_ratio),
            ("axis_min_speed", self.axis_min_speed),
            ("axis_factor", self.axis_factor),
            ("noise_scale", self.noise_scale),
            ("jitter_amplitude", self.jitter_amplitude),
            ("base_strength", self.base_strength),
            ("duration_gain", self.duration_gain),
            ("duration_cap", self.duration_cap),
            ("pressure_gain", self.pressure_gain),
            ("pointer_strength", self.pointer_strength),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SwarmError::invalid(name, "must be finite"));
        }
        if self.softening <= 0.0 {
            return Err(SwarmError::invalid("softening", "must be positive"));
        }
        if self.max_speed <= 0.0 {
            return Err(SwarmError::invalid("max_speed", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(SwarmError::invalid("damping", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.axis_factor) {
            return Err(SwarmError::invalid("axis_factor", "must be in [0, 1]"));
        }
        let non_negative = [
            ("base_strength", self.base_strength),
            ("duration_gain", self.duration_gain),
            ("duration_cap", self.duration_cap),
            ("pressure_gain", self.pressure_gain),
            ("pointer_strength", self.pointer_strength),
            ("jitter_amplitude", self.jitter_amplitude),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, v)| *v < 0.0) {
            return Err(SwarmError::invalid(name, "must be non-negative"));
        }
        Ok(())
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Type, default, range, and description of every tunable.
    pub fn param_schema() -> Value {
        json!({
            "max_wells": {
                "type": "integer",
                "default": DEFAULT_MAX_WELLS,
                "min": 0,
                "max": 16,
                "description": "Maximum number of simultaneous wells"
            },
            "particle_count": {
                "type": "integer",
                "default": DEFAULT_PARTICLE_COUNT,
                "presets": PARTICLE_COUNT_PRESETS,
                "description": "Number of particles in the swarm"
            },
            "softening": {
                "type": "number",
                "default": DEFAULT_SOFTENING,
                "min": 1.0,
                "max": 10000.0,
                "description": "Added to squared distance to bound force near a well"
            },
            "radial_scale": {
                "type": "number",
                "default": DEFAULT_RADIAL_SCALE,
                "min": 0.0,
                "max": 1000.0,
                "description": "Scale of the inward force toward each well"
            },
            "swirl_scale": {
                "type": "number",
                "default": DEFAULT_SWIRL_SCALE,
                "min": 0.0,
                "max": 200.0,
                "description": "Scale of the perpendicular force around each well"
            },
            "swirl_factor": {
                "type": "number",
                "default": DEFAULT_SWIRL_FACTOR,
                "min": 0.0,
                "max": 2.0,
                "description": "Multiplier applied on top of swirl_scale"
            },
            "spring_k": {
                "type": "number",
                "default": DEFAULT_SPRING_K,
                "min": 0.0,
                "max": 0.01,
                "description": "Idle pull toward each particle's home position"
            },
            "home_threshold_sq": {
                "type": "number",
                "default": DEFAULT_HOME_THRESHOLD_SQ,
                "min": 0.0,
                "max": 100.0,
                "description": "Squared distance from home under which the spring rests"
            },
            "damping": {
                "type": "number",
                "default": DEFAULT_DAMPING,
                "min": 0.0,
                "max": 1.0,
                "description": "Velocity multiplier applied every tick"
            },
            "max_speed": {
                "type": "number",
                "default": DEFAULT_MAX_SPEED,
                "min": 0.1,
                "max": 20.0,
                "description": "Maximum magnitude of each velocity component"
            },
            "axis_ratio": {
                "type": "number",
                "default": DEFAULT_AXIS_RATIO,
                "min": 1.0,
                "max": 10.0,
                "description": "Component ratio above which axis damping applies"
            },
            "axis_min_speed": {
                "type": "number",
                "default": DEFAULT_AXIS_MIN_SPEED,
                "min": 0.0,
                "max": 20.0,
                "description": "Component speed above which axis damping applies"
            },
            "axis_factor": {
                "type": "number",
                "default": DEFAULT_AXIS_FACTOR,
                "min": 0.0,
                "max": 1.0,
                "description": "Multiplier on the dominant velocity component"
            },
            "noise_scale": {
                "type": "number",
                "default": DEFAULT_NOISE_SCALE,
                "min": 0.0,
                "max": 0.1,
                "description": "Spatial and temporal scale of idle noise"
            },
            "jitter_amplitude": {
                "type": "number",
                "default": DEFAULT_JITTER_AMPLITUDE,
                "min": 0.0,
                "max": 1.0,
                "description": "Half-width of the idle jitter range"
            },
            "base_strength": {
                "type": "number",
                "default": DEFAULT_BASE_STRENGTH,
                "min": 0.0,
                "max": 20.0,
                "description": "Strength of a touch well at the moment of press"
            },
            "duration_gain": {
                "type": "number",
                "default": DEFAULT_DURATION_GAIN,
                "min": 0.0,
                "max": 20.0,
                "description": "Strength gained per second of press"
            },
            "duration_cap": {
                "type": "number",
                "default": DEFAULT_DURATION_CAP,
                "min": 0.0,
                "max": 20.0,
                "description": "Maximum strength contributed by press duration"
            },
            "pressure_gain": {
                "type": "number",
                "default": DEFAULT_PRESSURE_GAIN,
                "min": 0.0,
                "max": 20.0,
                "description": "Strength contributed at full pressure"
            },
            "pointer_strength": {
                "type": "number",
                "default": DEFAULT_POINTER_STRENGTH,
                "min": 0.0,
                "max": 20.0,
                "description": "Fixed strength of the mouse/pointer well"
            }
        })
    }
}
