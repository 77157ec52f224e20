use super::EnvelopeGenerator;
use crate::MIN_TIME;

/*
ADSR Envelope Implementation
============================

A linear ADSR envelope generator driven directly by a gate signal. There are
no note_on/note_off calls: the voice passes its gate into every `process`
call and the envelope reacts to the gate's edges.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). This multiplies
              the audio signal to control its amplitude over time.

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  gate        Held high while the key (or leaf) is held. A rising edge
              starts Attack, a falling edge starts Release.

  increment   How much `level` changes per sample, derived from the stage
              duration and the sample rate.


The State Machine
-----------------

    ┌──────┐  gate ↑   ┌────────┐  level=1   ┌───────┐  level=S  ┌─────────┐
    │ Idle │ ────────→ │ Attack │ ─────────→ │ Decay │ ────────→ │ Sustain │
    └──────┘           └────────┘            └───────┘           └─────────┘
        ↑                   │ gate ↓             │ gate ↓             │ gate ↓
        │                   └──────────────┬─────┴────────────────────┘
        │       level=0             ┌─────────┐
        └────────────────────────── │ Release │ ←── gate ↑ restarts Attack
                                    └─────────┘     from the current level

Release always starts from the CURRENT level, and a new rising edge during
Release ramps up from wherever the level is. Neither transition jumps, so
retriggers are click-free.

`is_running()` is false only in Idle. The voice uses that as its signal to
give its slot back to the pool.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Rising edge seen, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

/// Time-controlled envelope segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Attack,
    Decay,
    Release,
}

pub struct Adsr {
    sample_rate: f32,

    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    stage: EnvelopeState,
    level: f32,
    last_gate: bool,

    decay_start_level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Adsr {
    pub fn new() -> Self {
        Self::adsr(0.01, 0.1, 0.7, 0.3)
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_time: release.max(MIN_TIME),

            stage: EnvelopeState::Idle,
            level: 0.0,
            last_gate: false,
            decay_start_level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    fn start_attack(&mut self) {
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    fn start_release(&mut self) {
        if self.stage == EnvelopeState::Idle {
            return;
        }
        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * self.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    fn step(&mut self) {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                let increment = 1.0 / (self.attack_time * self.sample_rate);
                self.level += increment;

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.decay_start_level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let target = self.sustain_level;
                let total_drop = self.decay_start_level - target;
                let decrement = total_drop / (self.decay_time * self.sample_rate);
                self.level -= decrement;

                if self.level <= target {
                    self.level = target;
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);

                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    /// Reset to idle state.
    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.last_gate = false;
        self.decay_start_level = 0.0;
        self.release_elapsed_samples = 0;
        self.release_start_level = 0.0;
    }
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeGenerator for Adsr {
    fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
    }

    fn set_sustain_level(&mut self, level: f32) {
        self.sustain_level = level.clamp(0.0, 1.0);
    }

    fn set_time(&mut self, segment: Segment, seconds: f32) {
        let seconds = seconds.max(MIN_TIME);
        match segment {
            Segment::Attack => self.attack_time = seconds,
            Segment::Decay => self.decay_time = seconds,
            Segment::Release => self.release_time = seconds,
        }
    }

    fn process(&mut self, gate: bool) -> f32 {
        if gate && !self.last_gate {
            self.start_attack();
        } else if !gate && self.last_gate {
            self.start_release();
        }
        self.last_gate = gate;

        self.step();
        self.level
    }

    fn is_running(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }
}
