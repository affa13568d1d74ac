//! Input-driven gravity wells.
//!
//! A [`WellTracker`] turns the raw per-frame list of touch points and the
//! single pointer source into a set of [`Well`]s. Touch wells grow stronger
//! the longer and harder they are pressed; the pointer well has a fixed
//! strength. At most `max_wells` wells exist at once.
//!
//! Lifecycle: absent → active (first reconcile that sees the id) → active
//! (updated in place each reconcile) → removed (missing from a reconcile, or
//! evicted by a lowered cap). Every transition is returned as a
//! [`WellEvent`] so an outside adapter (audio, haptics) can follow along.

use crate::config::SimConfig;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Identity of an input contact.
///
/// Ordering is total so wells iterate in a fixed order and force sums are
/// reproducible bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WellId {
    /// Stable numeric id reported by the touch source.
    Touch(u64),
    /// Fallback for contacts without an id: rounded coordinates plus the
    /// contact's position in the frame's list.
    Synthetic { x: i64, y: i64, index: usize },
    /// The single mouse/pointer source.
    Pointer,
}

impl WellId {
    /// Resolves the id of the `index`-th touch point of a frame.
    pub fn for_touch(point: &TouchPoint, index: usize) -> Self {
        match point.id {
            Some(id) => WellId::Touch(id),
            None => WellId::Synthetic {
                x: point.x.round() as i64,
                y: point.y.round() as i64,
                index,
            },
        }
    }
}

/// One active touch contact as reported for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    #[serde(default)]
    pub id: Option<u64>,
    pub x: f64,
    pub y: f64,
    /// Normalized pressure in [0, 1], when the device reports it.
    #[serde(default)]
    pub pressure: Option<f64>,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: Some(id),
            x,
            y,
            pressure: None,
        }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }
}

/// State of the mouse/pointer source for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerInput {
    pub pressed: bool,
    pub x: f64,
    pub y: f64,
}

impl PointerInput {
    pub fn pressed_at(x: f64, y: f64) -> Self {
        Self {
            pressed: true,
            x,
            y,
        }
    }
}

/// A point source of attractive, swirling force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Well {
    pub id: WellId,
    pub position: DVec2,
    /// Always >= 0.
    pub strength: f64,
    /// Caller clock, seconds.
    pub start_time: f64,
}

/// A lifecycle transition produced by [`WellTracker::reconcile`] or
/// [`WellTracker::set_max_wells`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WellEvent {
    Created(Well),
    Updated(Well),
    /// Carries the last known state of the well.
    Removed(Well),
}

impl WellEvent {
    pub fn well(&self) -> &Well {
        match self {
            WellEvent::Created(w) | WellEvent::Updated(w) | WellEvent::Removed(w) => w,
        }
    }

    /// Delivers this event to an observer. Creation arrives as the first update.
    pub fn dispatch(&self, observer: &mut dyn WellObserver) {
        match self {
            WellEvent::Created(w) | WellEvent::Updated(w) => observer.on_well_updated(w.id, w),
            WellEvent::Removed(w) => observer.on_well_removed(w.id, w),
        }
    }
}

/// Receiver for well transitions, implemented by platform adapters.
pub trait WellObserver {
    fn on_well_updated(&mut self, id: WellId, well: &Well);
    fn on_well_removed(&mut self, id: WellId, last: &Well);
}

/// Touch well strength from press duration (seconds) and pressure.
///
/// `base + clamp(duration * duration_gain, 0, duration_cap) + pressure * pressure_gain`,
/// with pressure clamped to [0, 1]. Missing data is passed in as 0.
pub fn touch_strength(duration: f64, pressure: f64, config: &SimConfig) -> f64 {
    let duration_term = (duration * config.duration_gain)
        .max(0.0)
        .min(config.duration_cap.max(0.0));
    let pressure = if pressure.is_finite() {
        pressure.clamp(0.0, 1.0)
    } else {
        0.0
    };
    config.base_strength + duration_term + pressure * config.pressure_gain
}

/// Owns the active wells and the press start times behind them.
#[derive(Debug, Clone)]
pub struct WellTracker {
    wells: BTreeMap<WellId, Well>,
    start_times: HashMap<WellId, f64>,
    config: SimConfig,
}

impl WellTracker {
    pub fn new(config: SimConfig) -> Self {
        Self {
            wells: BTreeMap::new(),
            start_times: HashMap::new(),
            config,
        }
    }

    pub fn max_wells(&self) -> usize {
        self.config.max_wells
    }

    /// Records when `id` was pressed. A second call for the same id is ignored.
    pub fn begin_input(&mut self, id: WellId, timestamp: f64) {
        self.start_times.entry(id).or_insert(timestamp);
    }

    /// Forgets the press start of `id`.
    ///
    /// The well itself stays until the next [`reconcile`](Self::reconcile)
    /// no longer lists the id.
    pub fn end_input(&mut self, id: WellId) {
        self.start_times.remove(&id);
    }

    /// The press start recorded for `id`, if any.
    pub fn start_time(&self, id: WellId) -> Option<f64> {
        self.start_times.get(&id).copied()
    }

    /// Read-only view of the active wells, in id order.
    pub fn current_wells(&self) -> &BTreeMap<WellId, Well> {
        &self.wells
    }

    /// Copies the active wells into a flat list for the force pass.
    pub fn snapshot(&self) -> Vec<Well> {
        self.wells.values().copied().collect()
    }

    /// Rebuilds the well set from this frame's inputs.
    ///
    /// Touches are taken in list order up to `max_wells`; the rest are
    /// ignored this frame. Two touches resolving to the same id collapse to
    /// the later one. The pointer well, while pressed, only takes a slot the
    /// touches left free. Wells that were active but are not rebuilt are
    /// returned as [`WellEvent::Removed`].
    pub fn reconcile(
        &mut self,
        touches: &[TouchPoint],
        pointer: PointerInput,
        now: f64,
    ) -> Vec<WellEvent> {
        let cap = self.config.max_wells;
        if touches.len() > cap {
            log::trace!(
                "{} touch inputs exceed the cap of {cap}, ignoring the rest",
                touches.len()
            );
        }

        let mut previous = std::mem::take(&mut self.wells);
        let mut next: BTreeMap<WellId, Well> = BTreeMap::new();

        for (index, point) in touches.iter().enumerate().take(cap) {
            let id = WellId::for_touch(point, index);
            let recorded = self.start_times.get(&id).copied();
            let duration = recorded.map_or(0.0, |start| now - start);
            let strength = touch_strength(duration, point.pressure.unwrap_or(0.0), &self.config);
            let position = DVec2::new(point.x, point.y);
            let start_time = next
                .get(&id)
                .or_else(|| previous.get(&id))
                .map_or_else(|| recorded.unwrap_or(now), |w| w.start_time);
            next.insert(
                id,
                Well {
                    id,
                    position,
                    strength,
                    start_time,
                },
            );
        }

        if pointer.pressed && next.len() < cap {
            let id = WellId::Pointer;
            let start_time = previous
                .get(&id)
                .map(|w| w.start_time)
                .or_else(|| self.start_times.get(&id).copied())
                .unwrap_or(now);
            next.insert(
                id,
                Well {
                    id,
                    position: DVec2::new(pointer.x, pointer.y),
                    strength: self.config.pointer_strength,
                    start_time,
                },
            );
        }

        let mut events = Vec::with_capacity(next.len() + previous.len());
        for (id, well) in &next {
            match previous.remove(id) {
                Some(_) => events.push(WellEvent::Updated(*well)),
                None => {
                    log::debug!("well {id:?} created at {:?}", well.position);
                    events.push(WellEvent::Created(*well));
                }
            }
        }
        for (id, last) in previous {
            log::debug!("well {id:?} removed");
            events.push(WellEvent::Removed(last));
        }

        self.wells = next;
        events
    }

    /// Changes the well cap, evicting the most recently started wells if the
    /// active set no longer fits.
    pub fn set_max_wells(&mut self, max_wells: usize) -> Vec<WellEvent> {
        self.config.max_wells = max_wells;
        let excess = self.wells.len().saturating_sub(max_wells);
        if excess == 0 {
            return Vec::new();
        }

        let mut by_age: Vec<Well> = self.wells.values().copied().collect();
        by_age.sort_by(|a, b| {
            b.start_time
                .total_cmp(&a.start_time)
                .then_with(|| b.id.cmp(&a.id))
        });
        by_age
            .into_iter()
            .take(excess)
            .filter_map(|w| self.wells.remove(&w.id))
            .inspect(|w| log::debug!("well {:?} evicted by cap {max_wells}", w.id))
            .map(WellEvent::Removed)
            .collect()
    }

    /// Drops every well, reporting each as removed. Start times are kept.
    pub fn clear(&mut self) -> Vec<WellEvent> {
        std::mem::take(&mut self.wells)
            .into_values()
            .map(WellEvent::Removed)
            .collect()
    }
}
