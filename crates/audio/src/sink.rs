use std::time::Duration;

use crate::oscillator::Oscillator;
use crate::tone::EngineTone;

/// Audio collaborator contract: play the given tone until told otherwise.
pub trait AudioSink {
    fn apply(&mut self, tone: EngineTone);
}

/// Logs tone changes instead of producing sound.
///
/// Only logs when the tone changes by more than `threshold_hz` or the gain
/// changes, so a steady cruise stays quiet.
#[derive(Debug, Clone)]
pub struct TracingAudioSink {
    last: Option<EngineTone>,
    threshold_hz: f32,
}

impl TracingAudioSink {
    pub fn new(threshold_hz: f32) -> Self {
        Self {
            last: None,
            threshold_hz,
        }
    }

    pub fn last(&self) -> Option<EngineTone> {
        self.last
    }
}

impl Default for TracingAudioSink {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl AudioSink for TracingAudioSink {
    fn apply(&mut self, tone: EngineTone) {
        let changed = match self.last {
            None => true,
            Some(prev) => {
                prev.gain != tone.gain
                    || (prev.frequency - tone.frequency).abs() >= self.threshold_hz
            }
        };
        if changed {
            tracing::debug!(
                frequency = tone.frequency,
                gain = tone.gain,
                waveform = ?tone.waveform,
                "engine tone"
            );
            self.last = Some(tone);
        }
    }
}

/// Renders every applied tone into mono samples, one tick's worth per call.
///
/// The headless counterpart of a sound card: the samples can be written out
/// or inspected.
#[derive(Debug, Clone)]
pub struct SynthSink {
    oscillator: Oscillator,
    samples_per_tick: usize,
    samples: Vec<f32>,
}

impl SynthSink {
    pub fn new(sample_rate: u32, tick: Duration) -> Self {
        let samples_per_tick = (f64::from(sample_rate) * tick.as_secs_f64()).round() as usize;
        Self {
            oscillator: Oscillator::new(sample_rate, EngineTone::SILENT),
            samples_per_tick: samples_per_tick.max(1),
            samples: Vec::new(),
        }
    }

    pub fn samples_per_tick(&self) -> usize {
        self.samples_per_tick
    }

    /// Every sample rendered so far.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Largest absolute sample rendered so far.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()))
    }
}

impl AudioSink for SynthSink {
    fn apply(&mut self, tone: EngineTone) {
        self.oscillator.set_tone(tone);
        let start = self.samples.len();
        self.samples.resize(start + self.samples_per_tick, 0.0);
        self.oscillator.fill(&mut self.samples[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::Waveform;

    fn saw(frequency: f32, gain: f32) -> EngineTone {
        EngineTone {
            frequency,
            gain,
            waveform: Waveform::Sawtooth,
        }
    }

    #[test]
    fn tracing_sink_ignores_small_drift() {
        let mut sink = TracingAudioSink::new(5.0);
        sink.apply(saw(40.0, 0.1));
        sink.apply(saw(42.0, 0.1));
        assert_eq!(sink.last().map(|t| t.frequency), Some(40.0));
        sink.apply(saw(46.0, 0.1));
        assert_eq!(sink.last().map(|t| t.frequency), Some(46.0));
    }

    #[test]
    fn tracing_sink_tracks_gain_changes() {
        let mut sink = TracingAudioSink::default();
        sink.apply(saw(40.0, 0.0));
        sink.apply(saw(40.0, 0.1));
        assert_eq!(sink.last().map(|t| t.gain), Some(0.1));
    }

    #[test]
    fn synth_sink_renders_one_tick_per_tone() {
        let mut sink = SynthSink::new(48_000, Duration::from_micros(16_667));
        assert_eq!(sink.samples_per_tick(), 800);
        sink.apply(saw(40.0, 0.0));
        assert_eq!(sink.samples().len(), 800);
        assert_eq!(sink.peak(), 0.0);

        sink.apply(saw(150.0, 0.1));
        assert_eq!(sink.samples().len(), 1_600);
        assert!(sink.peak() > 0.05 && sink.peak() <= 0.1 + 1e-6);
    }
}
