use wmidi::MidiMessage;

use crate::error::MidiError;

/// Raw channel-voice messages the instrument understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Parse one complete message. Messages the instrument has no use for
    /// (sysex, clock, aftertouch, ...) parse to `Ok(None)`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Option<Self>, MidiError> {
        let event = match MidiMessage::try_from(bytes)? {
            MidiMessage::NoteOn(ch, note, vel) => Some(MidiEvent::NoteOn {
                channel: ch.index(),
                key: u8::from(note),
                velocity: u8::from(vel),
            }),
            MidiMessage::NoteOff(ch, note, vel) => Some(MidiEvent::NoteOff {
                channel: ch.index(),
                key: u8::from(note),
                velocity: u8::from(vel),
            }),
            MidiMessage::ControlChange(ch, function, value) => Some(MidiEvent::ControlChange {
                channel: ch.index(),
                controller: u8::from(function.0),
                value: u8::from(value),
            }),
            MidiMessage::PitchBendChange(ch, bend) => Some(MidiEvent::PitchBend {
                channel: ch.index(),
                value: u16::from(bend) as i16 - 8192,
            }),
            MidiMessage::ProgramChange(ch, program) => Some(MidiEvent::ProgramChange {
                channel: ch.index(),
                program: u8::from(program),
            }),
            _ => None,
        };
        Ok(event)
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}

/// Normalized note-on, shared by the MIDI and switch inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteOnEvent {
    pub note: f32,
    pub velocity: f32,
    pub channel: u8,
}

/// Normalized note-off, shared by the MIDI and switch inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteOffEvent {
    pub note: f32,
    pub velocity: f32,
    pub channel: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteEvent {
    On(NoteOnEvent),
    Off(NoteOffEvent),
}

impl NoteEvent {
    pub fn on(note: f32, velocity: f32, channel: u8) -> Self {
        NoteEvent::On(NoteOnEvent { note, velocity, channel })
    }

    pub fn off(note: f32, velocity: f32, channel: u8) -> Self {
        NoteEvent::Off(NoteOffEvent { note, velocity, channel })
    }

    pub fn note(&self) -> f32 {
        match self {
            NoteEvent::On(ev) => ev.note,
            NoteEvent::Off(ev) => ev.note,
        }
    }
}
