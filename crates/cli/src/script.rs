//! Scripted input for headless runs.
//!
//! A script is a list of frames, each holding the touches and pointer state
//! that stay in effect from its `step` until the next frame's `step`. The
//! player stands in for a device input layer: it reports press and release
//! of every identifier to the swarm and hands over the active contacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use well_swarm_core::{PointerInput, Swarm, TouchPoint, WellId};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Script {
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScriptFrame {
    /// First tick this frame applies to.
    pub step: usize,
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
    #[serde(default)]
    pub pointer: PointerInput,
}

impl Script {
    /// Parses a script and orders its frames by step.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut script: Script = serde_json::from_str(text)?;
        script.frames.sort_by_key(|f| f.step);
        Ok(script)
    }

    /// The frame in effect at `step`, if any has started.
    pub fn frame_at(&self, step: usize) -> Option<&ScriptFrame> {
        self.frames.iter().take_while(|f| f.step <= step).last()
    }
}

/// Replays a [`Script`] into a [`Swarm`], one tick at a time.
pub struct ScriptPlayer {
    script: Script,
    held: BTreeSet<WellId>,
}

impl ScriptPlayer {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            held: BTreeSet::new(),
        }
    }

    /// Issues press/release notifications for `step` and returns the
    /// contacts to reconcile.
    pub fn inputs_at(
        &mut self,
        swarm: &mut Swarm,
        step: usize,
        now: f64,
    ) -> (Vec<TouchPoint>, PointerInput) {
        let (touches, pointer) = match self.script.frame_at(step) {
            Some(frame) => (frame.touches.clone(), frame.pointer),
            None => (Vec::new(), PointerInput::default()),
        };

        let mut active: BTreeSet<WellId> = touches
            .iter()
            .enumerate()
            .map(|(i, p)| WellId::for_touch(p, i))
            .collect();
        if pointer.pressed {
            active.insert(WellId::Pointer);
        }

        for id in active.difference(&self.held) {
            swarm.begin_input(*id, now);
        }
        for id in self.held.difference(&active) {
            swarm.end_input(*id);
        }
        self.held = active;

        (touches, pointer)
    }
}
