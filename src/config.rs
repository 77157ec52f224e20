//! Instrument configuration.
//!
//! Everything here is `Copy` and fixed-size so a config can be handed to the
//! audio thread by value. The two presets mirror the two firmware builds the
//! instrument ships as: the touch-leaf instrument and the MIDI pluck synth.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::Waveform,
    error::ConfigError,
    io::switch::{LeafNotes, NotePair},
};

/// Number of touch leaves wired to the instrument.
pub const LEAF_COUNT: usize = 6;
/// Polyphony of the touch-leaf build.
pub const LEAF_VOICES: usize = 18;
/// Polyphony of the MIDI pluck build.
pub const PLUCK_VOICES: usize = 24;

/// F4, A4, F5, B5, D6, F6. The top three leaves also sound a quiet upper note.
pub const LEAF_NOTES: [LeafNotes; LEAF_COUNT] = [
    LeafNotes::single(NotePair::new(65, 32)),
    LeafNotes::single(NotePair::new(69, 32)),
    LeafNotes::single(NotePair::new(77, 32)),
    LeafNotes::double(NotePair::new(83, 64), NotePair::new(85, 20)),
    LeafNotes::double(NotePair::new(86, 64), NotePair::new(88, 44)),
    LeafNotes::double(NotePair::new(89, 64), NotePair::new(91, 20)),
];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    pub cutoff_hz: f32,
    pub resonance: f32,
    pub drive: f32,
}

/// Pitch LFO applied on top of the note number.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LfoConfig {
    pub freq_hz: f32,
    /// Peak deviation in semitones.
    pub depth: f32,
    /// Note that plays without vibrato.
    pub exempt_note: Option<f32>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceConfig {
    pub waveform: Waveform,
    pub osc_amp: f32,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    pub filter: Option<FilterConfig>,
    pub lfo: Option<LfoConfig>,
}

impl VoiceConfig {
    pub fn leaves() -> Self {
        Self {
            waveform: Waveform::Sine,
            osc_amp: 0.3,
            attack: 1.01,
            decay: 0.005,
            sustain: 0.5,
            release: 0.2,
            filter: Some(FilterConfig {
                cutoff_hz: 6_000.0,
                resonance: 0.6,
                drive: 0.3,
            }),
            lfo: Some(LfoConfig {
                freq_hz: 0.1,
                depth: 1.0,
                exempt_note: Some(69.0),
            }),
        }
    }

    pub fn pluck() -> Self {
        Self {
            waveform: Waveform::PolyBlepTriangle,
            osc_amp: 0.75,
            attack: 0.25,
            decay: 0.005,
            sustain: 0.5,
            release: 0.2,
            filter: Some(FilterConfig {
                cutoff_hz: 6_000.0,
                resonance: 0.6,
                drive: 0.8,
            }),
            lfo: None,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self::leaves()
    }
}

/// Dry level and reverb send of the output bus.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixConfig {
    pub mix_gain: f32,
    pub send_gain: f32,
    pub reverb_feedback: f32,
    pub reverb_lp_hz: f32,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            mix_gain: 0.5,
            send_gain: 0.45,
            reverb_feedback: 0.85,
            reverb_lp_hz: 5_000.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputConfig {
    /// `None` listens on every channel.
    pub midi_channel: Option<u8>,
    /// Consecutive agreeing polls before a switch changes state.
    pub debounce_polls: u8,
    pub poll_interval_ms: u64,
    pub queue_capacity: usize,
    /// Treat a low reading as pressed.
    pub invert_switches: bool,
    pub touch_init_attempts: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            midi_channel: None,
            debounce_polls: 8,
            poll_interval_ms: 7,
            queue_capacity: 256,
            invert_switches: false,
            touch_init_attempts: 100,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentConfig {
    pub sample_rate: f32,
    pub voice: VoiceConfig,
    pub mix: MixConfig,
    pub input: InputConfig,
    pub leaves: [LeafNotes; LEAF_COUNT],
}

impl InstrumentConfig {
    /// Touch-leaf build, meant for [`LEAF_VOICES`] voices.
    pub fn leaves() -> Self {
        Self {
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            voice: VoiceConfig::leaves(),
            mix: MixConfig::default(),
            input: InputConfig {
                invert_switches: true,
                ..InputConfig::default()
            },
            leaves: LEAF_NOTES,
        }
    }

    /// MIDI pluck build, meant for [`PLUCK_VOICES`] voices.
    pub fn pluck() -> Self {
        Self {
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            voice: VoiceConfig::pluck(),
            mix: MixConfig {
                reverb_feedback: 0.95,
                ..MixConfig::default()
            },
            input: InputConfig::default(),
            leaves: LEAF_NOTES,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check("sample_rate", self.sample_rate, 1_000.0, 192_000.0)?;

        let voice = &self.voice;
        check("voice.osc_amp", voice.osc_amp, 0.0, 1.0)?;
        check("voice.attack", voice.attack, 0.0, 60.0)?;
        check("voice.decay", voice.decay, 0.0, 60.0)?;
        check("voice.sustain", voice.sustain, 0.0, 1.0)?;
        check("voice.release", voice.release, 0.0, 60.0)?;
        if let Some(filter) = &voice.filter {
            check("voice.filter.cutoff_hz", filter.cutoff_hz, 10.0, self.sample_rate * 0.5)?;
            check("voice.filter.resonance", filter.resonance, 0.0, 1.0)?;
            check("voice.filter.drive", filter.drive, 0.0, 1.0)?;
        }
        if let Some(lfo) = &voice.lfo {
            check("voice.lfo.freq_hz", lfo.freq_hz, 0.0, 100.0)?;
            check("voice.lfo.depth", lfo.depth, 0.0, 24.0)?;
        }

        check("mix.mix_gain", self.mix.mix_gain, 0.0, 4.0)?;
        check("mix.send_gain", self.mix.send_gain, 0.0, 4.0)?;
        check("mix.reverb_feedback", self.mix.reverb_feedback, 0.0, 0.99)?;
        check("mix.reverb_lp_hz", self.mix.reverb_lp_hz, 10.0, self.sample_rate * 0.5)?;

        let input = &self.input;
        if !(1..=8).contains(&input.debounce_polls) {
            return Err(ConfigError::DebounceDepth(input.debounce_polls));
        }
        if input.queue_capacity == 0 {
            return Err(ConfigError::QueueCapacity(input.queue_capacity));
        }
        if let Some(channel) = input.midi_channel {
            if channel > 15 {
                return Err(ConfigError::MidiChannel(channel));
            }
        }
        Ok(())
    }
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self::leaves()
    }
}

fn check(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(InstrumentConfig::leaves().validate(), Ok(()));
        assert_eq!(InstrumentConfig::pluck().validate(), Ok(()));
    }

    #[test]
    fn leaf_preset_matches_touch_build() {
        let config = InstrumentConfig::leaves();
        assert!(config.input.invert_switches);
        assert_eq!(config.mix.reverb_feedback, 0.85);
        assert_eq!(config.voice.lfo.and_then(|l| l.exempt_note), Some(69.0));
        assert_eq!(config.leaves[3].upper, Some(NotePair::new(85, 20)));
        assert_eq!(config.leaves[0].upper, None);
    }

    #[test]
    fn pluck_preset_has_no_lfo() {
        let config = InstrumentConfig::pluck();
        assert!(config.voice.lfo.is_none());
        assert_eq!(config.voice.waveform, Waveform::PolyBlepTriangle);
        assert_eq!(config.mix.reverb_feedback, 0.95);
    }

    #[test]
    fn rejects_nan_and_out_of_range() {
        let mut config = InstrumentConfig::leaves();
        config.mix.send_gain = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "mix.send_gain", .. })
        ));

        let mut config = InstrumentConfig::leaves();
        config.input.debounce_polls = 9;
        assert_eq!(config.validate(), Err(ConfigError::DebounceDepth(9)));

        let mut config = InstrumentConfig::pluck();
        config.input.midi_channel = Some(16);
        assert_eq!(config.validate(), Err(ConfigError::MidiChannel(16)));

        let config = InstrumentConfig::leaves().with_sample_rate(384_000.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "sample_rate", .. })
        ));
        assert_eq!(InstrumentConfig::leaves().with_sample_rate(192_000.0).validate(), Ok(()));
    }
}
