use crate::tone::{EngineTone, Waveform};

/// Phase-continuous software oscillator.
///
/// Frequency and gain changes take effect at the next sample without
/// resetting the phase, so retuning every tick does not click.
#[derive(Debug, Clone)]
pub struct Oscillator {
    sample_rate: f32,
    phase: f32,
    tone: EngineTone,
}

impl Oscillator {
    pub fn new(sample_rate: u32, tone: EngineTone) -> Self {
        Self {
            sample_rate: sample_rate.max(1) as f32,
            phase: 0.0,
            tone,
        }
    }

    pub fn tone(&self) -> EngineTone {
        self.tone
    }

    pub fn set_tone(&mut self, tone: EngineTone) {
        self.tone = tone;
    }

    /// Render mono samples into `out`.
    pub fn fill(&mut self, out: &mut [f32]) {
        let step = self.tone.frequency / self.sample_rate;
        for sample in out.iter_mut() {
            let value = match self.tone.waveform {
                Waveform::Sawtooth => 2.0 * self.phase - 1.0,
            };
            *sample = value * self.tone.gain;
            self.phase = (self.phase + step).fract();
        }
    }
}
