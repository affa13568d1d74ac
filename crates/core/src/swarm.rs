//! The simulation context: one well tracker plus one particle population.
//!
//! A [`Swarm`] is the unit a host owns. Input events go in through
//! [`Swarm::begin_input`], [`Swarm::update_inputs`], and [`Swarm::end_input`];
//! [`Swarm::step`] advances the particles under whatever wells the last
//! update left active. Instances share nothing, so tests and hosts can run
//! as many side by side as they like.
//!
//! Inputs and ticks must not interleave within a tick. A host that captures
//! input on another thread should wrap the whole `Swarm` in one `Mutex`.

use crate::config::SimConfig;
use crate::error::SwarmError;
use crate::idle::IdleNoise;
use crate::particle::Particle;
use crate::prng::Xorshift64;
use crate::session::Session;
use crate::simulation::Simulation;
use crate::simulator::{ParticleSimulator, SwarmStats};
use crate::well::{PointerInput, TouchPoint, Well, WellEvent, WellId, WellObserver, WellTracker};
use serde_json::Value;
use std::collections::BTreeMap;

pub struct Swarm {
    tracker: WellTracker,
    simulator: ParticleSimulator,
    /// Wells in id order, refreshed whenever the tracker changes.
    wells: Vec<Well>,
}

impl Swarm {
    /// A swarm seeded for scatter and idle noise.
    pub fn new(width: f64, height: f64, config: SimConfig, seed: u64) -> Result<Self, SwarmError> {
        let simulator = ParticleSimulator::new(width, height, config, seed)?;
        Ok(Self::from_simulator(simulator))
    }

    /// A swarm with a caller-supplied idle noise source.
    pub fn with_noise(
        width: f64,
        height: f64,
        config: SimConfig,
        seed: u64,
        noise: Box<dyn IdleNoise>,
    ) -> Result<Self, SwarmError> {
        Ok(Self::from_simulator(ParticleSimulator::with_sources(
            width,
            height,
            config,
            Box::new(Xorshift64::new(seed)),
            noise,
        )?))
    }

    pub fn from_session(session: &Session) -> Result<Self, SwarmError> {
        session.validate()?;
        Self::new(session.width, session.height, session.config(), session.seed)
    }

    pub fn from_simulator(simulator: ParticleSimulator) -> Self {
        Self {
            tracker: WellTracker::new(*simulator.config()),
            simulator,
            wells: Vec::new(),
        }
    }

    pub fn tracker(&self) -> &WellTracker {
        &self.tracker
    }

    pub fn simulator(&self) -> &ParticleSimulator {
        &self.simulator
    }

    /// Active wells keyed by input id.
    pub fn current_wells(&self) -> &BTreeMap<WellId, Well> {
        self.tracker.current_wells()
    }

    /// Effective config, including the tracker's current well cap.
    pub fn config(&self) -> SimConfig {
        SimConfig {
            max_wells: self.tracker.max_wells(),
            ..*self.simulator.config()
        }
    }

    pub fn begin_input(&mut self, id: WellId, timestamp: f64) {
        self.tracker.begin_input(id, timestamp);
    }

    pub fn end_input(&mut self, id: WellId) {
        self.tracker.end_input(id);
    }

    /// Reconciles this frame's inputs and returns the resulting transitions.
    pub fn update_inputs(
        &mut self,
        touches: &[TouchPoint],
        pointer: PointerInput,
        now: f64,
    ) -> Vec<WellEvent> {
        let events = self.tracker.reconcile(touches, pointer, now);
        self.wells = self.tracker.snapshot();
        events
    }

    /// Like [`update_inputs`](Self::update_inputs), delivering each
    /// transition to `observer` as well.
    pub fn update_inputs_with(
        &mut self,
        touches: &[TouchPoint],
        pointer: PointerInput,
        now: f64,
        observer: &mut dyn WellObserver,
    ) -> Vec<WellEvent> {
        let events = self.update_inputs(touches, pointer, now);
        for event in &events {
            event.dispatch(observer);
        }
        events
    }

    /// Changes the well cap. Evicted wells come back as removal events.
    pub fn set_max_wells(&mut self, max_wells: usize) -> Vec<WellEvent> {
        let events = self.tracker.set_max_wells(max_wells);
        self.wells = self.tracker.snapshot();
        events
    }

    /// Replaces the population. Call between ticks.
    pub fn set_particle_count(&mut self, count: usize) {
        self.simulator.reset_population(count);
    }

    /// Rescales live positions to a new canvas. Homes keep their old layout.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), SwarmError> {
        self.simulator.resize(width, height)
    }

    pub fn stats(&self) -> SwarmStats {
        self.simulator.stats()
    }
}

impl Simulation for Swarm {
    fn step(&mut self) {
        self.simulator.step(&self.wells);
    }

    fn particles(&self) -> &[Particle] {
        self.simulator.particles()
    }

    fn wells(&self) -> &[Well] {
        &self.wells
    }

    fn params(&self) -> Value {
        self.config().to_json()
    }

    fn param_schema(&self) -> Value {
        SimConfig::param_schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idle::SilentNoise;
    use glam::DVec2;

    fn quiet_swarm(count: usize) -> Swarm {
        let config = SimConfig {
            particle_count: count,
            ..SimConfig::default()
        };
        Swarm::with_noise(800.0, 600.0, config, 42, Box::new(SilentNoise)).unwrap()
    }

    #[test]
    fn one_well_gathers_the_swarm() {
        let mut swarm = quiet_swarm(600);
        let center = DVec2::new(400.0, 300.0);
        // 2.0 base + one third of full pressure
        let touch = TouchPoint::new(1, 400.0, 300.0).with_pressure(1.0 / 3.0);
        swarm.update_inputs(&[touch], PointerInput::default(), 0.0);
        assert!((swarm.wells()[0].strength - 3.0).abs() < 1e-12);

        let before = swarm.simulator().mean_distance_to(center);
        for _ in 0..100 {
            swarm.step();
        }
        let after = swarm.simulator().mean_distance_to(center);
        assert!(after < before, "mean distance {before} -> {after}");
    }

    #[test]
    fn releasing_input_returns_swarm_to_idle() {
        let mut swarm = quiet_swarm(50);
        swarm.begin_input(WellId::Touch(1), 0.0);
        swarm.update_inputs(&[TouchPoint::new(1, 100.0, 100.0)], PointerInput::default(), 0.0);
        for _ in 0..20 {
            swarm.step();
        }
        swarm.end_input(WellId::Touch(1));
        assert_eq!(swarm.wells().len(), 1);
        let events = swarm.update_inputs(&[], PointerInput::default(), 0.5);
        assert!(matches!(events[0], WellEvent::Removed(_)));
        assert!(swarm.wells().is_empty());
        let displaced = swarm.stats().mean_distance_to_home;
        assert!(displaced > 0.0);
    }

    #[test]
    fn observer_sees_lifecycle() {
        #[derive(Default)]
        struct Count {
            updates: usize,
            removals: usize,
        }
        impl WellObserver for Count {
            fn on_well_updated(&mut self, _id: WellId, _well: &Well) {
                self.updates += 1;
            }
            fn on_well_removed(&mut self, _id: WellId, _last: &Well) {
                self.removals += 1;
            }
        }

        let mut swarm = quiet_swarm(1);
        let mut count = Count::default();
        let p = PointerInput::pressed_at(10.0, 10.0);
        swarm.update_inputs_with(&[], p, 0.0, &mut count);
        swarm.update_inputs_with(&[], p, 0.1, &mut count);
        swarm.update_inputs_with(&[], PointerInput::default(), 0.2, &mut count);
        assert_eq!(count.updates, 2);
        assert_eq!(count.removals, 1);
    }

    #[test]
    fn set_max_wells_updates_tick_snapshot() {
        let mut swarm = quiet_swarm(1);
        let touches: Vec<TouchPoint> = (0..4)
            .map(|i| TouchPoint::new(i, 10.0 * i as f64, 10.0))
            .collect();
        swarm.update_inputs(&touches, PointerInput::default(), 0.0);
        assert_eq!(swarm.wells().len(), 4);
        let evicted = swarm.set_max_wells(1);
        assert_eq!(evicted.len(), 3);
        assert_eq!(swarm.wells().len(), 1);
        assert_eq!(swarm.config().max_wells, 1);
        assert_eq!(swarm.params()["max_wells"], 1);
    }

    #[test]
    fn particle_presets_resize_population() {
        let mut swarm = quiet_swarm(200);
        for count in crate::config::PARTICLE_COUNT_PRESETS {
            swarm.set_particle_count(count);
            assert_eq!(swarm.particles().len(), count);
            assert_eq!(swarm.config().particle_count, count);
        }
    }

    #[test]
    fn from_session_applies_overrides() {
        let mut session = Session::new(320.0, 240.0, 100, 5);
        session.params = serde_json::json!({"max_wells": 2});
        let swarm = Swarm::from_session(&session).unwrap();
        assert_eq!(swarm.particles().len(), 100);
        assert_eq!(swarm.config().max_wells, 2);
        assert_eq!(swarm.simulator().width(), 320.0);
    }

    #[test]
    fn from_session_rejects_invalid() {
        let session = Session::new(0.0, 240.0, 100, 5);
        assert!(Swarm::from_session(&session).is_err());
    }

    #[test]
    fn independent_instances_do_not_share_state() {
        let mut a = quiet_swarm(10);
        let b = quiet_swarm(10);
        a.update_inputs(&[TouchPoint::new(0, 1.0, 1.0)], PointerInput::default(), 0.0);
        a.step();
        assert!(b.wells().is_empty());
        assert_eq!(b.simulator().tick(), 0);
        assert_eq!(a.simulator().tick(), 1);
    }

    #[test]
    fn swarm_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Swarm>();
    }

    #[test]
    fn swarm_works_as_dyn_simulation() {
        let mut swarm: Box<dyn Simulation> = Box::new(quiet_swarm(3));
        swarm.step();
        assert_eq!(swarm.particles().len(), 3);
        assert!(swarm.param_schema().get("softening").is_some());
    }
}
