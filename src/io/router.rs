use crate::{
    error::MidiError,
    io::{
        converter::cc_to_cutoff,
        midi::{MidiEvent, NoteEvent, NoteOffEvent, NoteOnEvent},
    },
    synth::message::{MessageSender, SynthMessage},
};

const CC_BRIGHTNESS: u8 = 74;
const CC_ALL_SOUND_OFF: u8 = 120;
const CC_ALL_NOTES_OFF: u8 = 123;

const CUTOFF_MIN_HZ: f32 = 100.0;
const CUTOFF_MAX_HZ: f32 = 12_000.0;

/// Turns MIDI messages and switch edges into [`SynthMessage`]s.
///
/// Runs in the polling context. Both input paths end in the same two calls,
/// [`handle_note_on`](Self::handle_note_on) and
/// [`handle_note_off`](Self::handle_note_off).
///
/// Releases are never lost. A `NoteOff` or `AllNotesOff` the sink refuses is
/// held back and retried, in order, ahead of anything sent later. While
/// releases are held back, new note-ons and cutoff changes are dropped so
/// they cannot overtake them.
pub struct EventRouter {
    channel: Option<u8>,
    dropped: u64,
    pending: Vec<SynthMessage>,
}

/// Held-back releases beyond this collapse into one `AllNotesOff`.
const MAX_PENDING_RELEASES: usize = 32;

fn is_release(msg: &SynthMessage) -> bool {
    matches!(msg, SynthMessage::NoteOff { .. } | SynthMessage::AllNotesOff)
}

impl EventRouter {
    /// `channel = None` accepts every channel.
    pub fn new(channel: Option<u8>) -> Self {
        Self {
            channel,
            dropped: 0,
            pending: Vec::with_capacity(MAX_PENDING_RELEASES),
        }
    }

    fn accepts(&self, channel: u8) -> bool {
        self.channel.map_or(true, |ch| ch == channel)
    }

    /// Retry held-back releases. Returns `true` once none are left.
    pub fn flush(&mut self, sink: &mut impl MessageSender) -> bool {
        let mut sent = 0;
        for &msg in &self.pending {
            if !sink.send(msg) {
                break;
            }
            sent += 1;
        }
        self.pending.drain(..sent);
        self.pending.is_empty()
    }

    fn hold_back(&mut self, msg: SynthMessage) {
        if msg == SynthMessage::AllNotesOff || self.pending.len() == MAX_PENDING_RELEASES {
            // a panic releases everything queued before it
            self.pending.clear();
            self.pending.push(SynthMessage::AllNotesOff);
        } else {
            self.pending.push(msg);
        }
        log::warn!("synth queue full, holding back {msg:?}");
    }

    /// Send one message to the sink. Returns `false` if it was not delivered
    /// now; releases that return `false` are retried by [`flush`](Self::flush).
    pub fn forward(&mut self, sink: &mut impl MessageSender, msg: SynthMessage) -> bool {
        if self.flush(sink) && sink.send(msg) {
            return true;
        }
        if is_release(&msg) {
            self.hold_back(msg);
        } else {
            self.dropped = self.dropped.saturating_add(1);
            log::warn!("synth queue full, dropped {msg:?}");
        }
        false
    }

    /// A note-on with velocity 0 is a note-off.
    pub fn handle_note_on(&mut self, sink: &mut impl MessageSender, ev: NoteOnEvent) -> bool {
        if ev.velocity == 0.0 {
            return self.handle_note_off(
                sink,
                NoteOffEvent {
                    note: ev.note,
                    velocity: 0.0,
                    channel: ev.channel,
                },
            );
        }
        log::debug!("note on {} vel {} ch {}", ev.note, ev.velocity, ev.channel);
        self.forward(
            sink,
            SynthMessage::NoteOn {
                note: ev.note,
                velocity: ev.velocity,
            },
        )
    }

    pub fn handle_note_off(&mut self, sink: &mut impl MessageSender, ev: NoteOffEvent) -> bool {
        log::debug!("note off {} ch {}", ev.note, ev.channel);
        self.forward(
            sink,
            SynthMessage::NoteOff {
                note: ev.note,
                velocity: ev.velocity,
            },
        )
    }

    pub fn handle_note(&mut self, sink: &mut impl MessageSender, ev: NoteEvent) -> bool {
        match ev {
            NoteEvent::On(on) => self.handle_note_on(sink, on),
            NoteEvent::Off(off) => self.handle_note_off(sink, off),
        }
    }

    /// Route one parsed MIDI message. Returns `false` if it was filtered,
    /// unsupported, or could not be queued.
    pub fn handle_midi(&mut self, sink: &mut impl MessageSender, event: MidiEvent) -> bool {
        if !self.accepts(event.channel()) {
            return false;
        }

        match event {
            MidiEvent::NoteOn { channel, key, velocity } => self.handle_note_on(
                sink,
                NoteOnEvent {
                    note: f32::from(key),
                    velocity: f32::from(velocity),
                    channel,
                },
            ),
            MidiEvent::NoteOff { channel, key, velocity } => self.handle_note_off(
                sink,
                NoteOffEvent {
                    note: f32::from(key),
                    velocity: f32::from(velocity),
                    channel,
                },
            ),
            MidiEvent::ControlChange { controller, value, .. } => match controller {
                CC_ALL_SOUND_OFF | CC_ALL_NOTES_OFF => {
                    log::debug!("all notes off (cc {controller})");
                    self.forward(sink, SynthMessage::AllNotesOff)
                }
                CC_BRIGHTNESS => {
                    let cutoff = cc_to_cutoff(value, CUTOFF_MIN_HZ, CUTOFF_MAX_HZ);
                    self.forward(sink, SynthMessage::SetCutoff(cutoff))
                }
                _ => false,
            },
            MidiEvent::PitchBend { .. } | MidiEvent::ProgramChange { .. } => false,
        }
    }

    /// Parse and route raw bytes.
    pub fn handle_bytes(
        &mut self,
        sink: &mut impl MessageSender,
        bytes: &[u8],
    ) -> Result<bool, MidiError> {
        Ok(match MidiEvent::from_bytes(bytes)? {
            Some(event) => self.handle_midi(sink, event),
            None => false,
        })
    }

    /// Note-ons and cutoff changes the sink refused since construction.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Releases waiting for room in the sink.
    pub fn pending_releases(&self) -> usize {
        self.pending.len()
    }
}
