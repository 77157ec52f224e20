//! Reverb - Room Simulation via Delay Networks
//!
//! Reverb simulates the sound of a space by creating many delayed, filtered
//! reflections of the input signal. Each channel of [`StereoReverb`] is a
//! classic Schroeder network.
//!
//! # Schroeder Reverb Architecture
//!
//! ```text
//! Input ──┬──→ [Comb 1] ──┐
//!         ├──→ [Comb 2] ──┤
//!         ├──→ [Comb 3] ──┼──→ (+) ──→ [Allpass 1] ──→ [Allpass 2] ──→ Output
//!         └──→ [Comb 4] ──┘
//! ```
//!
//! ## Comb Filters
//!
//! ```text
//! y[n] = x[n] + feedback * lowpass(y[n - delay])
//! ```
//!
//! The one-pole lowpass in the loop absorbs high frequencies on every pass,
//! so the tail darkens as it decays. `set_lp_freq` sets that lowpass.
//!
//! ## Stereo
//!
//! The right channel uses the same delay times stretched by a fixed spread,
//! which decorrelates the two tails without changing their decay.
//!
//! # Parameters
//!
//! - **Feedback**: comb feedback, controls decay time (0.0 to 0.99)
//! - **LP frequency**: cutoff of the in-loop damping filter

use std::f32::consts::TAU;

use super::Reverberator;

/// Max comb filter delay: 50ms at 192kHz = 9600 samples
const MAX_COMB_DELAY: usize = 9600;
/// Max allpass filter delay: 10ms at 192kHz = 1920 samples
const MAX_ALLPASS_DELAY: usize = 1920;

/// Comb filter delay times in ms (mutually prime ratios)
const COMB_DELAYS_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];
/// Allpass delay times in ms
const ALLPASS_DELAYS_MS: [f32; 2] = [5.0, 1.7];
/// Right channel delay stretch
const STEREO_SPREAD: f32 = 1.023;

/// A damped comb filter. The delay line is allocated once in `new`.
pub struct CombFilter {
    buffer: Vec<f32>,
    delay_samples: usize,
    write_pos: usize,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; MAX_COMB_DELAY],
            delay_samples: delay_samples.clamp(1, MAX_COMB_DELAY),
            write_pos: 0,
            feedback: 0.5,
            damp: 0.5,
            filter_state: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Set delay length (RT-safe, no allocation)
    pub fn set_delay(&mut self, delay_samples: usize) {
        self.delay_samples = delay_samples.clamp(1, MAX_COMB_DELAY);
        self.write_pos %= self.delay_samples;
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.write_pos];

        self.filter_state = output * (1.0 - self.damp) + self.filter_state * self.damp;
        self.buffer[self.write_pos] = input + self.filter_state * self.feedback;
        self.write_pos = (self.write_pos + 1) % self.delay_samples;

        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.write_pos = 0;
    }
}

/// An allpass filter for reverb diffusion. Allocated once in `new`.
pub struct AllpassFilter {
    buffer: Vec<f32>,
    delay_samples: usize,
    write_pos: usize,
    feedback: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; MAX_ALLPASS_DELAY],
            delay_samples: delay_samples.clamp(1, MAX_ALLPASS_DELAY),
            write_pos: 0,
            feedback: 0.5,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.9);
    }

    pub fn set_delay(&mut self, delay_samples: usize) {
        self.delay_samples = delay_samples.clamp(1, MAX_ALLPASS_DELAY);
        self.write_pos %= self.delay_samples;
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];

        // Allpass: output = -g*input + delayed + g*delayed_output
        let output = -self.feedback * input + delayed;
        self.buffer[self.write_pos] = input + self.feedback * output;
        self.write_pos = (self.write_pos + 1) % self.delay_samples;

        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    (ms * sample_rate / 1000.0) as usize
}

/// Schroeder reverb with 4 comb filters and 2 allpass filters
pub struct SchroederReverb {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
    stretch: f32,
}

impl SchroederReverb {
    pub fn new(sample_rate: f32, stretch: f32) -> Self {
        let mut reverb = Self {
            combs: std::array::from_fn(|_| CombFilter::new(1)),
            allpasses: std::array::from_fn(|_| AllpassFilter::new(1)),
            stretch,
        };
        reverb.configure(sample_rate);
        reverb
    }

    /// Configure delay times for a specific sample rate (RT-safe, no allocation).
    pub fn configure(&mut self, sample_rate: f32) {
        for (comb, &delay_ms) in self.combs.iter_mut().zip(COMB_DELAYS_MS.iter()) {
            comb.set_delay(ms_to_samples(delay_ms * self.stretch, sample_rate));
        }
        for (allpass, &delay_ms) in self.allpasses.iter_mut().zip(ALLPASS_DELAYS_MS.iter()) {
            allpass.set_delay(ms_to_samples(delay_ms * self.stretch, sample_rate));
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
        }
    }

    pub fn set_damping(&mut self, damp: f32) {
        for comb in &mut self.combs {
            comb.set_damp(damp);
        }
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(input);
        }
        output *= 0.25; // Normalize for 4 combs

        for allpass in &mut self.allpasses {
            output = allpass.process(output);
        }

        output
    }

    pub fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.reset();
        }
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
    }
}

/// Two decorrelated Schroeder networks, one per channel.
pub struct StereoReverb {
    left: SchroederReverb,
    right: SchroederReverb,
    sample_rate: f32,
    lp_freq: f32,
}

impl StereoReverb {
    pub fn new(sample_rate: f32) -> Self {
        let mut reverb = Self {
            left: SchroederReverb::new(sample_rate, 1.0),
            right: SchroederReverb::new(sample_rate, STEREO_SPREAD),
            sample_rate,
            lp_freq: 5_000.0,
        };
        reverb.set_lp_freq(reverb.lp_freq);
        reverb
    }

    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}

impl Default for StereoReverb {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SAMPLE_RATE)
    }
}

impl Reverberator for StereoReverb {
    fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.left.configure(sample_rate);
        self.right.configure(sample_rate);
        self.reset();
        self.set_lp_freq(self.lp_freq);
    }

    fn set_feedback(&mut self, feedback: f32) {
        self.left.set_feedback(feedback);
        self.right.set_feedback(feedback);
    }

    /// One-pole coefficient: damp = e^(-2π·fc/fs)
    fn set_lp_freq(&mut self, cutoff_hz: f32) {
        self.lp_freq = cutoff_hz;
        let fc = cutoff_hz.clamp(10.0, self.sample_rate * 0.5);
        let damp = (-TAU * fc / self.sample_rate).exp();
        self.left.set_damping(damp);
        self.right.set_damping(damp);
    }

    fn process(&mut self, in_left: f32, in_right: f32) -> (f32, f32) {
        (self.left.process(in_left), self.right.process(in_right))
    }
}
