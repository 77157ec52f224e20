use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Oscillator;

/*
Oscillator Waveforms
====================

The oscillator keeps a normalized phase accumulator in [0, 1) and advances
it by `freq / sample_rate` every sample. Each waveform is a function of that
phase.

  Sine        sin(2π·phase). Pure tone, no harmonics.
  Triangle    Linear ramp up then down. Odd harmonics at 1/n².
  Saw         Rising ramp -1 → +1. All harmonics at 1/n.
  Square      +1 for the first half cycle, -1 for the second.

The naive Saw/Square jump instantaneously, which aliases badly at high
pitches. The PolyBLEP variants subtract a two-sample polynomial correction
around each discontinuity:

    phase ──╱│╱│╱│     naive saw: hard edge at phase wrap
            ╱ │╱ │
    blep      ╲╱         correction smooths the edge over ±1 sample

PolyBLEP triangle is a PolyBLEP square run through a leaky integrator.

Retuning (`set_freq`) only changes the phase increment. The phase itself is
never reset, so a retrigger continues from wherever the cycle was.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Square,
    PolyBlepTriangle,
    PolyBlepSaw,
    PolyBlepSquare,
}

pub struct PolyOscillator {
    sample_rate: f32,
    freq: f32,
    amp: f32,
    waveform: Waveform,
    phase: f32,
    phase_inc: f32,
    last_out: f32,
}

impl PolyOscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            freq: 440.0,
            amp: 1.0,
            waveform,
            phase: 0.0,
            phase_inc: 440.0 / crate::DEFAULT_SAMPLE_RATE,
            last_out: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn freq(&self) -> f32 {
        self.freq
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Reset phase and integrator state. Not used on retrigger.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.last_out = 0.0;
    }

    fn update_increment(&mut self) {
        self.phase_inc = self.freq / self.sample_rate;
    }
}

impl Default for PolyOscillator {
    fn default() -> Self {
        Self::sine()
    }
}

/// Two-sample polynomial band-limited step residual.
#[inline]
fn poly_blep(dt: f32, t: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let t = t / dt;
        t + t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + t + t + 1.0
    } else {
        0.0
    }
}

impl Oscillator for PolyOscillator {
    fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.phase = 0.0;
        self.last_out = 0.0;
        self.update_increment();
    }

    fn set_amp(&mut self, amp: f32) {
        self.amp = amp;
    }

    fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    fn set_freq(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.update_increment();
    }

    fn process(&mut self) -> f32 {
        let t = self.phase;
        let dt = self.phase_inc.abs();

        let out = match self.waveform {
            Waveform::Sine => (TAU * t).sin(),
            Waveform::Triangle => {
                let saw = 2.0 * t - 1.0;
                2.0 * saw.abs() - 1.0
            }
            Waveform::Saw => 2.0 * t - 1.0,
            Waveform::Square => {
                if t < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::PolyBlepSaw => 2.0 * t - 1.0 - poly_blep(dt, t),
            Waveform::PolyBlepSquare => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(dt, t) - poly_blep(dt, (t + 0.5).fract())
            }
            Waveform::PolyBlepTriangle => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                let square = naive + poly_blep(dt, t) - poly_blep(dt, (t + 0.5).fract());
                // Leaky integrator over the normalized increment:
                //   y[n] = dt·x[n] + (1 - dt)·y[n-1]
                // A ±1 square ramps ±dt per sample for half a period, so the
                // steady-state peak is about 0.25 before the 4x rescale.
                let k = dt.min(1.0);
                self.last_out = k * square + (1.0 - k) * self.last_out;
                4.0 * self.last_out
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        } else if self.phase < 0.0 {
            self.phase += 1.0;
        }

        out * self.amp
    }
}
