//! Mapping from well state to voice parameters.
//!
//! Pure numbers only: an audio adapter turns these into oscillator
//! frequency and gain. Nothing here produces sound.

use crate::well::Well;

const FREQ_LOW: f64 = 120.0;
const FREQ_HIGH: f64 = 1200.0;
const FREQ_MIN: f64 = 80.0;
const FREQ_MAX: f64 = 2000.0;
const PITCH_LOW: f64 = 0.8;
const PITCH_HIGH: f64 = 1.2;
const STRENGTH_SPAN: f64 = 6.0;
const AMP_AT_SPAN: f64 = 0.6;
const AMP_MAX: f64 = 0.8;

/// Frequency (Hz) and amplitude for one well's voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParams {
    pub frequency: f64,
    pub amplitude: f64,
}

impl VoiceParams {
    pub fn for_well(well: &Well, width: f64, height: f64) -> Self {
        Self {
            frequency: frequency_for(well.position.x, well.position.y, width, height),
            amplitude: amplitude_for(well.strength),
        }
    }
}

/// Linear remap of `v` from `[in_lo, in_hi]` to `[out_lo, out_hi]`, unclamped.
/// An empty input range maps everything to `out_lo`.
pub fn remap(v: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    let span = in_hi - in_lo;
    if span == 0.0 {
        return out_lo;
    }
    out_lo + (v - in_lo) / span * (out_hi - out_lo)
}

/// Horizontal position picks the base pitch, vertical position bends it.
pub fn frequency_for(x: f64, y: f64, width: f64, height: f64) -> f64 {
    let base = remap(x, 0.0, width, FREQ_LOW, FREQ_HIGH).clamp(FREQ_MIN, FREQ_MAX);
    base * remap(y, 0.0, height, PITCH_LOW, PITCH_HIGH)
}

pub fn amplitude_for(strength: f64) -> f64 {
    remap(strength, 0.0, STRENGTH_SPAN, 0.0, AMP_AT_SPAN).clamp(0.0, AMP_MAX)
}
