use motorway_common::{AudioConfig, PlayerConfig};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Waveform {
    Sawtooth,
}

/// What the engine should sound like for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineTone {
    pub frequency: f32,
    pub gain: f32,
    pub waveform: Waveform,
}

impl EngineTone {
    pub const SILENT: EngineTone = EngineTone {
        frequency: 0.0,
        gain: 0.0,
        waveform: Waveform::Sawtooth,
    };
}

/// Map player speed to an engine tone.
///
/// Pitch rises linearly with `|speed| / max_speed` across the configured band
/// and is clamped to it. The engine is silent until the session runs.
pub fn engine_tone(
    speed: f32,
    running: bool,
    player: &PlayerConfig,
    audio: &AudioConfig,
) -> EngineTone {
    let ratio = if player.max_speed > 0.0 && speed.is_finite() {
        (speed.abs() / player.max_speed).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let band = audio.max_frequency - audio.min_frequency;
    EngineTone {
        frequency: audio.min_frequency + ratio * band,
        gain: if running { audio.running_gain } else { 0.0 },
        waveform: Waveform::Sawtooth,
    }
}
