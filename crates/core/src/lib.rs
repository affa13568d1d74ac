#![deny(unsafe_code)]
//! Core simulation for well-swarm.
//!
//! A swarm of point particles drifts around a home layout until touch or
//! pointer input creates gravity wells; wells pull particles in on swirling
//! paths. Provides the `WellTracker` (well lifecycle and strength model),
//! the `ForceField` (softened attraction plus swirl), the
//! `ParticleSimulator` (idle drift, damping, clamping, wrap), and the
//! `Swarm` context that ties them together behind the `Simulation` trait.

pub mod config;
pub mod error;
pub mod force;
pub mod idle;
pub mod params;
pub mod particle;
pub mod prng;
pub mod session;
pub mod simulation;
pub mod simulator;
pub mod swarm;
pub mod voice;
pub mod well;

pub use config::{SimConfig, PARTICLE_COUNT_PRESETS};
pub use error::SwarmError;
pub use force::ForceField;
pub use idle::{IdleNoise, PerlinNoise, SilentNoise};
pub use particle::{Particle, RenderPoint};
pub use prng::{RandomSource, Xorshift64};
pub use session::Session;
pub use simulation::Simulation;
pub use simulator::{ParticleSimulator, SwarmStats};
pub use swarm::Swarm;
pub use voice::VoiceParams;
pub use well::{PointerInput, TouchPoint, Well, WellEvent, WellId, WellObserver, WellTracker};
