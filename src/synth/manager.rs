use crate::{
    config::VoiceConfig,
    dsp::{Adsr, EnvelopeGenerator, Filter, Oscillator, PolyOscillator, Svf},
    synth::{
        message::{MessageSender, SynthMessage},
        voice::Voice,
    },
};

/// Index of a voice slot inside a [`VoiceManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceHandle(pub usize);

/*
Voice Allocation
================

The pool is a fixed array built once; "allocating" a voice means finding a
slot whose voice is idle, never constructing one.

    note_on(n, v)   scan 0..N, first idle slot gets the note.
                    No idle slot: the note is dropped and counted.
                    Sounding voices are never stolen.

    note_off(n, _)  every active slot holding exactly `n` is released, so
                    stacked copies of one pitch all go into release together.

    free_all()      every slot is released regardless of note.

Because a voice only turns idle inside its own `process()`, a slot that
finishes its release this tick is reusable from the next tick on.
*/

pub struct VoiceManager<const N: usize, O = PolyOscillator, E = Adsr, F = Svf> {
    voices: [Voice<O, E, F>; N],
    dropped_notes: u64,
}

impl<const N: usize, O, E, F> VoiceManager<N, O, E, F>
where
    O: Oscillator + Default,
    E: EnvelopeGenerator + Default,
    F: Filter + Default,
{
    pub fn new(config: VoiceConfig) -> Self {
        Self {
            voices: std::array::from_fn(|_| Voice::new(config)),
            dropped_notes: 0,
        }
    }
}

impl<const N: usize, O: Oscillator, E: EnvelopeGenerator, F: Filter> VoiceManager<N, O, E, F> {
    /// Initialise every slot at `sample_rate`. All voices start idle.
    pub fn init(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.init(sample_rate);
        }
    }

    /// Sum of every voice for one sample, in slot order.
    #[inline]
    pub fn process(&mut self) -> f32 {
        let mut sum = 0.0;
        for voice in &mut self.voices {
            sum += voice.process();
        }
        sum
    }

    /// Start `note` on the lowest idle slot. With every slot busy the note is
    /// dropped, counted in [`dropped_notes`](Self::dropped_notes), and `None`
    /// is returned.
    pub fn note_on(&mut self, note: f32, velocity: f32) -> Option<VoiceHandle> {
        match self.voices.iter().position(|v| !v.is_active()) {
            Some(idx) => {
                self.voices[idx].on_note_on(note, velocity);
                Some(VoiceHandle(idx))
            }
            None => {
                self.dropped_notes = self.dropped_notes.saturating_add(1);
                None
            }
        }
    }

    /// Release every active voice holding `note`. Returns how many were released.
    pub fn note_off(&mut self, note: f32, _velocity: f32) -> usize {
        let mut released = 0;
        for voice in self.voices.iter_mut().filter(|v| v.is_active() && v.note() == note) {
            voice.on_note_off();
            released += 1;
        }
        released
    }

    /// Panic: release every slot. Voices still fade out over their release.
    pub fn free_all_voices(&mut self) {
        for voice in &mut self.voices {
            voice.on_note_off();
        }
    }

    /// Broadcast a filter cutoff to every slot, sounding or not.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        for voice in &mut self.voices {
            voice.set_cutoff(cutoff_hz);
        }
    }

    pub fn apply(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { note, velocity } => {
                self.note_on(note, velocity);
            }
            SynthMessage::NoteOff { note, velocity } => {
                self.note_off(note, velocity);
            }
            SynthMessage::AllNotesOff => self.free_all_voices(),
            SynthMessage::SetCutoff(cutoff_hz) => self.set_cutoff(cutoff_hz),
        }
    }

    /// Note-ons that found no idle voice since construction.
    pub fn dropped_notes(&self) -> u64 {
        self.dropped_notes
    }

    /// Slots that are gated or still releasing.
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn voice(&self, handle: VoiceHandle) -> Option<&Voice<O, E, F>> {
        self.voices.get(handle.0)
    }

    /// All slots in allocation order, idle ones included.
    pub fn voices(&self) -> &[Voice<O, E, F>] {
        &self.voices
    }

    /// Polyphony limit `N`.
    pub fn capacity(&self) -> usize {
        N
    }
}

/// Direct application, for hosts where input and audio share one context.
impl<const N: usize, O: Oscillator, E: EnvelopeGenerator, F: Filter> MessageSender
    for VoiceManager<N, O, E, F>
{
    fn send(&mut self, msg: SynthMessage) -> bool {
        self.apply(msg);
        true
    }
}
