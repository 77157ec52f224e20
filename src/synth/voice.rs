use crate::{
    config::VoiceConfig,
    dsp::{
        Adsr, EnvelopeGenerator, Filter, Oscillator, PolyOscillator, Segment, Svf, Waveform,
    },
    io::converter::midi_note_to_freq,
};

/*
Voice Lifecycle
===============

    ┌──────┐  on_note_on   ┌───────┐  on_note_off  ┌───────────┐
    │ Idle │ ────────────→ │ Gated │ ────────────→ │ Releasing │
    └──────┘               └───────┘               └───────────┘
        ↑                      ↑      on_note_on         │
        │                      └─────────────────────────┤
        │      envelope stopped (observed in process)    │
        └────────────────────────────────────────────────┘

Deactivation is lazy. `process` advances the envelope first; if the envelope
reports it has stopped, the voice flips to Idle but still returns the sample
computed from the final envelope level. The slot becomes allocatable on the
next tick, never in the middle of one.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,      // Silent, available for allocation
    Gated,     // Key held, envelope in attack/decay/sustain
    Releasing, // Key released, envelope in its release tail
}

/// One monophonic sound generator: oscillator, envelope, optional filter
/// and optional pitch LFO.
pub struct Voice<O = PolyOscillator, E = Adsr, F = Svf> {
    osc: O,
    lfo: Option<O>,
    env: E,
    filter: Option<F>,
    config: VoiceConfig,

    note: f32,
    velocity: f32,
    state: VoiceState,
    use_lfo: bool,
}

impl<O, E, F> Voice<O, E, F>
where
    O: Oscillator + Default,
    E: EnvelopeGenerator + Default,
    F: Filter + Default,
{
    pub fn new(config: VoiceConfig) -> Self {
        Self::from_parts(
            O::default(),
            config.lfo.map(|_| O::default()),
            E::default(),
            config.filter.map(|_| F::default()),
            config,
        )
    }
}

impl<O: Oscillator, E: EnvelopeGenerator, F: Filter> Voice<O, E, F> {
    /// Build a voice around caller-supplied DSP blocks. `lfo` and `filter`
    /// are only driven when the config enables them.
    pub fn from_parts(osc: O, lfo: Option<O>, env: E, filter: Option<F>, config: VoiceConfig) -> Self {
        Self {
            osc,
            lfo,
            env,
            filter,
            config,
            note: 0.0,
            velocity: 0.0,
            state: VoiceState::Idle,
            use_lfo: false,
        }
    }

    /// Apply the config at `sample_rate` and return the voice to idle.
    pub fn init(&mut self, sample_rate: f32) {
        let config = self.config;
        self.state = VoiceState::Idle;
        self.use_lfo = false;

        self.osc.init(sample_rate);
        self.osc.set_amp(config.osc_amp);
        self.osc.set_waveform(config.waveform);

        self.env.init(sample_rate);
        self.env.set_sustain_level(config.sustain);
        self.env.set_time(Segment::Attack, config.attack);
        self.env.set_time(Segment::Decay, config.decay);
        self.env.set_time(Segment::Release, config.release);

        if let (Some(filter), Some(filter_config)) = (self.filter.as_mut(), config.filter) {
            filter.init(sample_rate);
            filter.set_freq(filter_config.cutoff_hz);
            filter.set_res(filter_config.resonance);
            filter.set_drive(filter_config.drive);
        }

        if let (Some(lfo), Some(lfo_config)) = (self.lfo.as_mut(), config.lfo) {
            lfo.init(sample_rate);
            lfo.set_waveform(Waveform::Sine);
            lfo.set_amp(lfo_config.depth);
            lfo.set_freq(lfo_config.freq_hz);
        }
    }

    /// Render one output sample. Returns exactly 0.0 without touching any
    /// DSP block while idle.
    pub fn process(&mut self) -> f32 {
        if self.state == VoiceState::Idle {
            return 0.0;
        }

        let amp = self.env.process(self.state == VoiceState::Gated);
        if !self.env.is_running() {
            self.state = VoiceState::Idle;
        }

        if self.use_lfo {
            if let Some(lfo) = self.lfo.as_mut() {
                let pitch = self.note + lfo.process();
                self.osc.set_freq(midi_note_to_freq(pitch));
            }
        }

        let raw = self.osc.process();
        let sig = match self.filter.as_mut() {
            Some(filter) => {
                filter.process(raw);
                filter.low()
            }
            None => raw,
        };

        sig * (self.velocity / 127.0) * amp
    }

    /// Start (or retrigger) a note. The oscillator is retuned, not reset.
    pub fn on_note_on(&mut self, note: f32, velocity: f32) {
        self.note = note;
        self.velocity = velocity;
        self.osc.set_freq(midi_note_to_freq(note));
        self.state = VoiceState::Gated;
        self.use_lfo = match self.config.lfo {
            Some(lfo) if self.lfo.is_some() => lfo.exempt_note != Some(note),
            _ => false,
        };
    }

    /// Drop the gate; the voice keeps sounding through its release tail.
    pub fn on_note_off(&mut self) {
        if self.state == VoiceState::Gated {
            self.state = VoiceState::Releasing;
        }
    }

    /// No-op for a voice built without a filter.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if let Some(filter) = self.filter.as_mut() {
            filter.set_freq(cutoff_hz);
        }
    }

    /// True until the release tail has finished.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state != VoiceState::Idle
    }

    #[inline]
    pub fn is_gated(&self) -> bool {
        self.state == VoiceState::Gated
    }

    #[inline]
    pub fn note(&self) -> f32 {
        self.note
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[inline]
    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterConfig, LfoConfig};

    const SAMPLE_RATE: f32 = 1_000.0;

    fn short_config() -> VoiceConfig {
        VoiceConfig {
            waveform: Waveform::Saw,
            osc_amp: 0.5,
            attack: 0.01,
            decay: 0.01,
            sustain: 0.5,
            release: 0.05,
            filter: Some(FilterConfig {
                cutoff_hz: 400.0,
                resonance: 0.3,
                drive: 0.0,
            }),
            lfo: None,
        }
    }

    fn voice(config: VoiceConfig) -> Voice {
        let mut voice = Voice::new(config);
        voice.init(SAMPLE_RATE);
        voice
    }

    #[test]
    fn fresh_voice_is_silent() {
        let mut voice = voice(short_config());
        for _ in 0..64 {
            assert_eq!(voice.process(), 0.0);
        }
        assert!(!voice.is_active());
    }

    #[test]
    fn note_lifecycle_returns_to_idle() {
        let mut voice = voice(short_config());
        voice.on_note_on(60.0, 100.0);
        assert_eq!(voice.state(), VoiceState::Gated);

        let heard = (0..50).any(|_| voice.process() != 0.0);
        assert!(heard);

        voice.on_note_off();
        assert_eq!(voice.state(), VoiceState::Releasing);
        assert!(voice.is_active());

        // 50 release samples at 1kHz, plus slack
        for _ in 0..60 {
            voice.process();
        }
        assert!(!voice.is_active());
        assert_eq!(voice.process(), 0.0);
    }

    #[test]
    fn deactivation_is_observed_on_the_final_tick() {
        let mut config = short_config();
        config.release = 0.005; // 5 samples
        let mut voice = voice(config);
        voice.on_note_on(60.0, 127.0);
        for _ in 0..40 {
            voice.process();
        }
        voice.on_note_off();

        let mut ticks = 0;
        while voice.is_active() {
            voice.process();
            ticks += 1;
            assert!(ticks <= 5, "release ran longer than configured");
        }
        assert_eq!(ticks, 5);
    }

    #[test]
    fn retrigger_overwrites_note_without_releasing() {
        let mut voice = voice(short_config());
        voice.on_note_on(60.0, 100.0);
        voice.process();
        voice.on_note_on(67.0, 50.0);
        assert_eq!(voice.note(), 67.0);
        assert_eq!(voice.velocity(), 50.0);
        assert!(voice.is_gated());
    }

    #[test]
    fn note_off_on_idle_voice_is_noop() {
        let mut voice = voice(short_config());
        voice.on_note_off();
        assert_eq!(voice.state(), VoiceState::Idle);
    }

    #[test]
    fn velocity_scales_linearly() {
        let mut soft = voice(short_config());
        let mut loud = voice(short_config());
        soft.on_note_on(60.0, 64.0);
        loud.on_note_on(60.0, 128.0);

        for _ in 0..100 {
            let s = soft.process();
            let l = loud.process();
            assert_eq!(s, l * 0.5);
        }
    }

    #[test]
    fn lfo_skips_exempt_note() {
        let mut config = short_config();
        config.lfo = Some(LfoConfig {
            freq_hz: 5.0,
            depth: 1.0,
            exempt_note: Some(69.0),
        });

        let mut exempt = voice(config);
        exempt.on_note_on(69.0, 100.0);
        assert!(!exempt.use_lfo);

        let mut wobbling = voice(config);
        wobbling.on_note_on(70.0, 100.0);
        assert!(wobbling.use_lfo);
    }
}
