#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

/// Control messages sent from the polling thread to the audio thread.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: f32, velocity: f32 },
    NoteOff { note: f32, velocity: f32 },
    /// Gate off every voice regardless of note (panic).
    AllNotesOff,
    SetCutoff(f32),
}

/// Audio-side end of the message queue.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

/// Control-side end of the message queue.
///
/// Returns `false` when the message could not be delivered.
pub trait MessageSender {
    fn send(&mut self, msg: SynthMessage) -> bool;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

#[cfg(feature = "rtrb")]
impl MessageSender for Producer<SynthMessage> {
    fn send(&mut self, msg: SynthMessage) -> bool {
        self.push(msg).is_ok()
    }
}

impl<S: MessageSender + ?Sized> MessageSender for &mut S {
    fn send(&mut self, msg: SynthMessage) -> bool {
        (**self).send(msg)
    }
}

/// Recording sink, handy for inspecting what a router emits.
impl MessageSender for Vec<SynthMessage> {
    fn send(&mut self, msg: SynthMessage) -> bool {
        self.push(msg);
        true
    }
}
