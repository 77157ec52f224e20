use std::f32::consts::TAU;

use super::Filter;

/*
| response          | passes          | rejects      |
| ----------------- | --------------- | ------------ |
| low-pass          | below cutoff    | above cutoff |
| high-pass         | above cutoff    | below cutoff |
| band-pass         | around cutoff   | elsewhere    |
| notch / band-stop | outside cutoff  | at cutoff    |

One state-variable structure computes all four responses at once. Callers
feed a sample with `process` and read whichever response they need.

Drive adds a cubic soft-saturation on the band-pass integrator, which tames
the resonant peak and thickens the sound as the filter is pushed.
*/

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

impl FilterOutputs {
    const SILENT: Self = Self {
        lowpass: 0.0,
        bandpass: 0.0,
        highpass: 0.0,
        notch: 0.0,
    };
}

/// Upper bound on the saturating integrator so heavy drive cannot fold over.
const INTEGRATOR_LIMIT: f32 = 2.0;

pub struct Svf {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    sample_rate: f32,
    cutoff_hz: f32,
    resonance: f32,
    drive: f32,

    g: f32,
    k: f32,
    outputs: FilterOutputs,
}

impl Svf {
    pub fn new() -> Self {
        Self::lowpass(1000.0)
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            sample_rate: crate::DEFAULT_SAMPLE_RATE,
            cutoff_hz,
            resonance: 0.0,
            drive: 0.0,
            g: 0.0,
            k: 2.0,
            outputs: FilterOutputs::SILENT,
        };
        filter.update_coefficients();
        filter
    }

    #[inline]
    fn update_coefficients(&mut self) {
        // Keep the prewarped cutoff below Nyquist
        let cutoff = self.cutoff_hz.clamp(10.0, self.sample_rate * 0.49);
        let wd = TAU * cutoff;
        let wa = (2.0 * self.sample_rate) * (wd / (2.0 * self.sample_rate)).tan();
        self.g = wa / (2.0 * self.sample_rate);
        self.k = 2.0 - (2.0 * self.resonance);
    }

    pub fn next_sample(&mut self, sample: f32) -> &FilterOutputs {
        let (k, g) = (self.k, self.g);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        if self.drive > 0.0 {
            let x = self.ic1eq;
            self.ic1eq = (x - self.drive * x * x * x).clamp(-INTEGRATOR_LIMIT, INTEGRATOR_LIMIT);
        }

        self.outputs = FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
        };
        &self.outputs
    }

    pub fn band(&self) -> f32 {
        self.outputs.bandpass
    }

    pub fn high(&self) -> f32 {
        self.outputs.highpass
    }

    pub fn notch(&self) -> f32 {
        self.outputs.notch
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
        self.outputs = FilterOutputs::SILENT;
    }
}

impl Default for Svf {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for Svf {
    fn init(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.reset();
        self.update_coefficients();
    }

    fn set_freq(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
        self.update_coefficients();
    }

    /// Resonance in `0.0..1.0`; 1.0 would be self-oscillation and is excluded.
    fn set_res(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, 0.98);
        self.update_coefficients();
    }

    /// Drive in `0.0..=1.0`, scaled down to the saturation coefficient.
    fn set_drive(&mut self, drive: f32) {
        self.drive = drive.clamp(0.0, 1.0) * 0.1;
    }

    fn process(&mut self, sample: f32) {
        self.next_sample(sample);
    }

    fn low(&self) -> f32 {
        self.outputs.lowpass
    }
}
