use crate::{
    config::MixConfig,
    dsp::{Reverberator, StereoReverb},
};

/*
Output Bus
==========

    voice sum ──→ (× mix_gain) ──→ dry ──┬───────────────────────→ (+) ──→ L
                                         │                          ↑
                                         └─→ (× send_gain) ──→ [Reverb] wet L/R
                                                                    ↓
                                                        dry ──────→ (+) ──→ R

The reverb is fed the same mono send on both inputs; its two networks are
tuned apart, which is where the stereo image comes from. Order per sample
is fixed: dry, send, reverb, sum.
*/

pub struct MixBus<R = StereoReverb> {
    reverb: R,
    mix_gain: f32,
    send_gain: f32,
}

impl MixBus<StereoReverb> {
    pub fn new(config: &MixConfig, sample_rate: f32) -> Self {
        Self::with_reverb(StereoReverb::new(sample_rate), config, sample_rate)
    }
}

impl<R: Reverberator> MixBus<R> {
    pub fn with_reverb(mut reverb: R, config: &MixConfig, sample_rate: f32) -> Self {
        reverb.init(sample_rate);
        reverb.set_feedback(config.reverb_feedback);
        reverb.set_lp_freq(config.reverb_lp_hz);
        Self {
            reverb,
            mix_gain: config.mix_gain,
            send_gain: config.send_gain,
        }
    }

    #[inline]
    pub fn process(&mut self, voice_sum: f32) -> (f32, f32) {
        let dry = voice_sum * self.mix_gain;
        let send = dry * self.send_gain;
        let (wet_left, wet_right) = self.reverb.process(send, send);
        (dry + wet_left, dry + wet_right)
    }

    pub fn reverb_mut(&mut self) -> &mut R {
        &mut self.reverb
    }
}
