pub mod config; // Instrument presets and tunables
pub mod dsp;
pub mod error;
pub mod io; // MIDI, switches, touch sensor
pub mod runtime; // Background polling context
pub mod synth; // Voice management and polyphony

pub use config::{InstrumentConfig, LEAF_COUNT, LEAF_VOICES, PLUCK_VOICES};
pub use synth::{engine::SynthEngine, manager::VoiceManager, voice::Voice};

pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
