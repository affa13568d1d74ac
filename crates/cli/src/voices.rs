//! A silent audio adapter that follows well transitions.
//!
//! [`VoiceBank`] keeps one voice per well, retunes it on every update, and
//! on removal fades its amplitude linearly to zero over the release time
//! before dropping it. It stands where an oscillator bank would sit in an
//! interactive host.

use std::collections::BTreeMap;
use well_swarm_core::voice::VoiceParams;
use well_swarm_core::{Well, WellId, WellObserver};

/// Release time used when none is given, in seconds.
pub const DEFAULT_RELEASE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceState {
    Playing,
    /// Seconds left before the voice is dropped, and the amplitude the fade
    /// started from.
    Releasing { remaining: f64, from: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub frequency: f64,
    pub amplitude: f64,
    pub state: VoiceState,
}

pub struct VoiceBank {
    width: f64,
    height: f64,
    release: f64,
    voices: BTreeMap<WellId, Voice>,
    released: usize,
}

impl VoiceBank {
    pub fn new(width: f64, height: f64, release: f64) -> Self {
        Self {
            width,
            height,
            release: release.max(0.0),
            voices: BTreeMap::new(),
            released: 0,
        }
    }

    pub fn voices(&self) -> &BTreeMap<WellId, Voice> {
        &self.voices
    }

    pub fn playing(&self) -> usize {
        self.voices
            .values()
            .filter(|v| v.state == VoiceState::Playing)
            .count()
    }

    pub fn releasing(&self) -> usize {
        self.voices.len() - self.playing()
    }

    /// Voices fully faded and dropped so far.
    pub fn released(&self) -> usize {
        self.released
    }

    /// Advances every fade by `dt` seconds, dropping finished voices.
    pub fn advance(&mut self, dt: f64) {
        let release = self.release;
        let mut finished = Vec::new();
        for (id, voice) in &mut self.voices {
            if let VoiceState::Releasing { remaining, from } = voice.state {
                let left = remaining - dt;
                if left <= 0.0 || release == 0.0 {
                    finished.push(*id);
                } else {
                    voice.amplitude = from * left / release;
                    voice.state = VoiceState::Releasing {
                        remaining: left,
                        from,
                    };
                }
            }
        }
        for id in finished {
            self.voices.remove(&id);
            self.released += 1;
            log::trace!("voice {id:?} released");
        }
    }
}

impl WellObserver for VoiceBank {
    fn on_well_updated(&mut self, id: WellId, well: &Well) {
        let params = VoiceParams::for_well(well, self.width, self.height);
        self.voices.insert(
            id,
            Voice {
                frequency: params.frequency,
                amplitude: params.amplitude,
                state: VoiceState::Playing,
            },
        );
    }

    fn on_well_removed(&mut self, id: WellId, last: &Well) {
        let params = VoiceParams::for_well(last, self.width, self.height);
        let from = self
            .voices
            .get(&id)
            .map_or(params.amplitude, |v| v.amplitude);
        self.voices.insert(
            id,
            Voice {
                frequency: params.frequency,
                amplitude: from,
                state: VoiceState::Releasing {
                    remaining: self.release,
                    from,
                },
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use well_swarm_core::{PointerInput, SimConfig, WellTracker};

    fn well(x: f64, y: f64) -> Well {
        let mut t = WellTracker::new(SimConfig::default());
        t.reconcile(&[], PointerInput::pressed_at(x, y), 0.0);
        t.current_wells()[&WellId::Pointer]
    }

    #[test]
    fn update_starts_a_playing_voice() {
        let mut bank = VoiceBank::new(800.0, 600.0, DEFAULT_RELEASE);
        bank.on_well_updated(WellId::Pointer, &well(400.0, 300.0));
        let v = bank.voices()[&WellId::Pointer];
        assert_eq!(v.state, VoiceState::Playing);
        assert!((v.frequency - 660.0).abs() < 1e-9);
        // pointer strength 4.0
        assert!((v.amplitude - 0.4).abs() < 1e-12);
    }

    #[test]
    fn removal_fades_then_releases() {
        let mut bank = VoiceBank::new(800.0, 600.0, 0.2);
        let w = well(400.0, 300.0);
        bank.on_well_updated(WellId::Pointer, &w);
        bank.on_well_removed(WellId::Pointer, &w);
        assert_eq!(bank.releasing(), 1);

        bank.advance(0.1);
        let v = bank.voices()[&WellId::Pointer];
        assert!((v.amplitude - 0.2).abs() < 1e-9, "half faded: {}", v.amplitude);

        bank.advance(0.1);
        assert!(bank.voices().is_empty());
        assert_eq!(bank.released(), 1);
    }

    #[test]
    fn playing_voices_ignore_advance() {
        let mut bank = VoiceBank::new(800.0, 600.0, 0.2);
        bank.on_well_updated(WellId::Pointer, &well(10.0, 10.0));
        bank.advance(5.0);
        assert_eq!(bank.playing(), 1);
        assert_eq!(bank.released(), 0);
    }

    #[test]
    fn zero_release_drops_on_next_advance() {
        let mut bank = VoiceBank::new(800.0, 600.0, 0.0);
        let w = well(10.0, 10.0);
        bank.on_well_updated(WellId::Pointer, &w);
        bank.on_well_removed(WellId::Pointer, &w);
        bank.advance(0.0);
        assert!(bank.voices().is_empty());
    }
}
