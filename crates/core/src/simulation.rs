//! The `Simulation` trait hosts drive once per frame.
//!
//! The trait is object-safe so a host can hold `Box<dyn Simulation>` and
//! swap implementations without knowing their concrete type.

use crate::particle::Particle;
use crate::well::Well;
use serde_json::Value;

/// A frame-stepped particle simulation with a JSON parameter surface.
pub trait Simulation {
    /// Advance by one tick. Never fails; all numeric paths are bounded.
    fn step(&mut self);

    /// Current particle states.
    fn particles(&self) -> &[Particle];

    /// Wells acting on the next tick, in id order.
    fn wells(&self) -> &[Well];

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Type, default, range, and description of every parameter.
    fn param_schema(&self) -> Value;
}
