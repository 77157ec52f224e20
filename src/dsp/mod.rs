//! Low-level DSP primitives used by the voices and the mix bus.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. Each primitive sits behind a narrow
//! capability trait so the voice logic never depends on a concrete
//! oscillator, filter or reverb implementation.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Band-limited and naive oscillator waveforms.
pub mod oscillator;
/// Stereo Schroeder reverberator.
pub mod reverb;

pub use envelope::{Adsr, EnvelopeState, Segment};
pub use filter::Svf;
pub use oscillator::{PolyOscillator, Waveform};
pub use reverb::StereoReverb;

/// Periodic signal source (audio-rate oscillator or LFO).
pub trait Oscillator {
    fn init(&mut self, sample_rate: f32);
    fn set_amp(&mut self, amp: f32);
    fn set_waveform(&mut self, waveform: Waveform);
    /// Retune without touching the phase accumulator.
    fn set_freq(&mut self, freq_hz: f32);
    fn process(&mut self) -> f32;
}

/// Gate-driven amplitude envelope.
pub trait EnvelopeGenerator {
    fn init(&mut self, sample_rate: f32);
    fn set_sustain_level(&mut self, level: f32);
    fn set_time(&mut self, segment: Segment, seconds: f32);
    /// Advance one sample with the given gate and return the new level.
    fn process(&mut self, gate: bool) -> f32;
    /// False once the envelope has returned to idle.
    fn is_running(&self) -> bool;
}

/// Resonant filter that is fed one sample and then queried per response.
pub trait Filter {
    fn init(&mut self, sample_rate: f32);
    fn set_freq(&mut self, cutoff_hz: f32);
    fn set_res(&mut self, resonance: f32);
    fn set_drive(&mut self, drive: f32);
    fn process(&mut self, sample: f32);
    fn low(&self) -> f32;
}

/// Stereo-in, stereo-out effect processor used on the send bus.
pub trait Reverberator {
    fn init(&mut self, sample_rate: f32);
    fn set_feedback(&mut self, feedback: f32);
    fn set_lp_freq(&mut self, cutoff_hz: f32);
    fn process(&mut self, in_left: f32, in_right: f32) -> (f32, f32);
}
