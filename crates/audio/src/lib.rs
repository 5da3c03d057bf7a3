//! Engine sound: speed-to-tone mapping, a software oscillator and the sink
//! contract that output backends implement.

mod oscillator;
mod sink;
mod tone;

pub use oscillator::Oscillator;
pub use sink::{AudioSink, SynthSink, TracingAudioSink};
pub use tone::{EngineTone, Waveform, engine_tone};
