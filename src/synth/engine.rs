use crate::{
    config::InstrumentConfig,
    dsp::{Adsr, EnvelopeGenerator, Filter, Oscillator, PolyOscillator, Svf},
    synth::{manager::VoiceManager, message::MessageReceiver, mixbus::MixBus},
};

/// Audio-thread half of an instrument.
///
/// Owns the voice pool and the output bus outright. Control changes only
/// reach it through the receiver, which is drained once at the top of every
/// render call, so voice state is never touched from another thread.
pub struct SynthEngine<const N: usize, Rx, O = PolyOscillator, E = Adsr, F = Svf> {
    voices: VoiceManager<N, O, E, F>,
    bus: MixBus,
    rx: Rx,
}

impl<const N: usize, Rx, O, E, F> SynthEngine<N, Rx, O, E, F>
where
    Rx: MessageReceiver,
    O: Oscillator + Default,
    E: EnvelopeGenerator + Default,
    F: Filter + Default,
{
    pub fn new(config: &InstrumentConfig, rx: Rx) -> Self {
        let mut voices = VoiceManager::new(config.voice);
        voices.init(config.sample_rate);
        Self {
            voices,
            bus: MixBus::new(&config.mix, config.sample_rate),
            rx,
        }
    }
}

impl<const N: usize, Rx, O, E, F> SynthEngine<N, Rx, O, E, F>
where
    Rx: MessageReceiver,
    O: Oscillator,
    E: EnvelopeGenerator,
    F: Filter,
{
    fn drain_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            self.voices.apply(msg);
        }
    }

    /// Render one stereo frame without draining the queue.
    #[inline]
    pub fn next_frame(&mut self) -> (f32, f32) {
        let sum = self.voices.process();
        self.bus.process(sum)
    }

    /// Render into split channel buffers. Renders `min(left.len(), right.len())` frames.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.drain_messages();
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.next_frame();
        }
    }

    /// Render into an interleaved buffer with `channels` samples per frame.
    ///
    /// Channel 0 gets the left output and channel 1 the right. A mono buffer
    /// receives the left output only; channels past the second are zeroed.
    pub fn render_interleaved(&mut self, buf: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        self.drain_messages();
        for frame in buf.chunks_exact_mut(channels) {
            let (left, right) = self.next_frame();
            frame[0] = left;
            if let Some(slot) = frame.get_mut(1) {
                *slot = right;
            }
            for extra in frame.iter_mut().skip(2) {
                *extra = 0.0;
            }
        }
    }

    pub fn voices(&self) -> &VoiceManager<N, O, E, F> {
        &self.voices
    }

    pub fn active_voices(&self) -> usize {
        self.voices.active_count()
    }

    pub fn dropped_notes(&self) -> u64 {
        self.voices.dropped_notes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::message::SynthMessage;
    use std::collections::VecDeque;

    struct Script(VecDeque<SynthMessage>);

    impl MessageReceiver for Script {
        fn pop(&mut self) -> Option<SynthMessage> {
            self.0.pop_front()
        }
    }

    fn engine(msgs: &[SynthMessage]) -> SynthEngine<4, Script> {
        let config = InstrumentConfig::pluck().with_sample_rate(8_000.0);
        SynthEngine::new(&config, Script(msgs.iter().copied().collect()))
    }

    #[test]
    fn idle_engine_renders_silence() {
        let mut engine = engine(&[]);
        let mut left = [1.0; 64];
        let mut right = [1.0; 64];
        engine.render(&mut left, &mut right);
        assert!(left.iter().chain(right.iter()).all(|&s| s == 0.0));
    }

    #[test]
    fn queued_note_is_applied_before_rendering() {
        let mut engine = engine(&[SynthMessage::NoteOn { note: 57.0, velocity: 127.0 }]);
        let mut left = [0.0; 256];
        let mut right = [0.0; 256];
        engine.render(&mut left, &mut right);

        assert_eq!(engine.active_voices(), 1);
        assert!(left.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn interleaved_layout() {
        let mut engine = engine(&[SynthMessage::NoteOn { note: 57.0, velocity: 127.0 }]);
        let mut buf = [9.0; 4 * 128];
        engine.render_interleaved(&mut buf, 4);

        for frame in buf.chunks_exact(4) {
            assert_eq!(frame[2], 0.0);
            assert_eq!(frame[3], 0.0);
        }
        assert!(buf.chunks_exact(4).any(|f| f[0] != 0.0 && f[1] != 0.0));
    }

    #[test]
    fn mono_gets_left_channel() {
        let msgs = [SynthMessage::NoteOn { note: 57.0, velocity: 127.0 }];
        let mut stereo = engine(&msgs);
        let mut mono = engine(&msgs);

        let mut left = [0.0; 64];
        let mut right = [0.0; 64];
        stereo.render(&mut left, &mut right);

        let mut buf = [0.0; 64];
        mono.render_interleaved(&mut buf, 1);
        assert_eq!(buf, left);
    }

    #[test]
    fn overflow_notes_are_counted() {
        let msgs: Vec<SynthMessage> = (0..6)
            .map(|i| SynthMessage::NoteOn { note: 60.0 + i as f32, velocity: 100.0 })
            .collect();
        let mut engine = engine(&msgs);
        let mut left = [0.0; 8];
        let mut right = [0.0; 8];
        engine.render(&mut left, &mut right);
        assert_eq!(engine.active_voices(), 4);
        assert_eq!(engine.dropped_notes(), 2);
    }
}
