use crate::{
    config::InputConfig,
    error::MidiError,
    io::{
        router::EventRouter,
        switch::{LeafNotes, SwitchBank},
    },
    synth::message::{MessageSender, SynthMessage},
};

/// Background half of an instrument: switch debouncing plus MIDI routing,
/// feeding one message sink.
pub struct InputPoller<const M: usize, S> {
    router: EventRouter,
    switches: SwitchBank<M>,
    sink: S,
}

impl<const M: usize, S: MessageSender> InputPoller<M, S> {
    pub fn new(notes: [LeafNotes; M], input: &InputConfig, sink: S) -> Self {
        Self {
            router: EventRouter::new(input.midi_channel),
            switches: SwitchBank::new(notes, input.debounce_polls, input.invert_switches),
            sink,
        }
    }

    /// Feed one raw reading per input. Call once per poll interval.
    ///
    /// Releases the sink refused earlier are retried first.
    pub fn poll_switches(&mut self, raw: &[bool; M]) {
        let Self {
            router,
            switches,
            sink,
        } = self;
        router.flush(&mut *sink);
        switches.poll(raw, |ev| {
            router.handle_note(&mut *sink, ev);
        });
    }

    /// Route one complete MIDI message.
    pub fn handle_midi_bytes(&mut self, bytes: &[u8]) -> Result<bool, MidiError> {
        self.router.handle_bytes(&mut self.sink, bytes)
    }

    /// Panic. If the queue is full it is held back and retried like any release.
    pub fn all_notes_off(&mut self) -> bool {
        self.router.forward(&mut self.sink, SynthMessage::AllNotesOff)
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) -> bool {
        self.router.forward(&mut self.sink, SynthMessage::SetCutoff(cutoff_hz))
    }

    pub fn is_pressed(&self, input: usize) -> bool {
        self.switches.is_pressed(input)
    }

    /// Note-ons and cutoff changes refused by the sink.
    pub fn dropped_messages(&self) -> u64 {
        self.router.dropped()
    }

    pub fn pending_releases(&self) -> usize {
        self.router.pending_releases()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
