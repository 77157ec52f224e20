//! Debounced switch inputs and the static leaf-to-note table.
//!
//! Each physical input (a touch leaf or a button) is sampled once per poll.
//! The raw readings are noisy, so a [`Debouncer`] only reports a new state
//! after several consecutive polls agree. [`SwitchBank`] latches that clean
//! state per input and turns edges into note events:
//!
//! ```text
//! raw:       0 1 0 1 1 1 1 1 1 1 1 1 1 ... 1 0 0 0 0 0 0 0 0
//! debounced: 0 0 0 0 0 0 0 0 0 0 1 1 1 ... 1 1 1 1 1 1 1 1 0
//! events:                        ↑ NoteOn                 ↑ NoteOff
//! ```
//!
//! Holding an input never re-emits anything.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::io::midi::NoteEvent;

/// A note number and the velocity it is played at.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotePair {
    pub note: u8,
    pub velocity: u8,
}

impl NotePair {
    pub const fn new(note: u8, velocity: u8) -> Self {
        Self { note, velocity }
    }
}

/// Notes sounded by one input: always a lower note, optionally an upper one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafNotes {
    pub lower: NotePair,
    pub upper: Option<NotePair>,
}

impl LeafNotes {
    pub const fn single(lower: NotePair) -> Self {
        Self { lower, upper: None }
    }

    pub const fn double(lower: NotePair, upper: NotePair) -> Self {
        Self {
            lower,
            upper: Some(upper),
        }
    }
}

/// Shift-register debouncer with hysteresis.
///
/// The last eight raw readings live in `history`. The output goes high once
/// the newest `depth` readings are all high and goes low once they are all
/// low; anything mixed keeps the previous output.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    history: u8,
    mask: u8,
    invert: bool,
    pressed: bool,
}

impl Debouncer {
    /// `depth` is clamped to 1..=8 polls.
    pub fn new(depth: u8, invert: bool) -> Self {
        let depth = depth.clamp(1, 8);
        Self {
            history: 0,
            mask: (0xFFu16 >> (8 - depth)) as u8,
            invert,
            pressed: false,
        }
    }

    /// Feed one raw reading and return the debounced state.
    pub fn update(&mut self, raw: bool) -> bool {
        let level = raw != self.invert;
        self.history = (self.history << 1) | u8::from(level);

        let recent = self.history & self.mask;
        if recent == self.mask {
            self.pressed = true;
        } else if recent == 0 {
            self.pressed = false;
        }
        self.pressed
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// `M` debounced inputs, each mapped to a [`LeafNotes`] entry.
pub struct SwitchBank<const M: usize> {
    notes: [LeafNotes; M],
    debouncers: [Debouncer; M],
    latched: [bool; M],
    channel: u8,
}

impl<const M: usize> SwitchBank<M> {
    pub fn new(notes: [LeafNotes; M], debounce_polls: u8, invert: bool) -> Self {
        Self {
            notes,
            debouncers: [Debouncer::new(debounce_polls, invert); M],
            latched: [false; M],
            channel: 0,
        }
    }

    /// Channel stamped on emitted events.
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// Sample every input once and emit note events for press and release edges.
    pub fn poll(&mut self, raw: &[bool; M], mut emit: impl FnMut(NoteEvent)) {
        for i in 0..M {
            let pressed = self.debouncers[i].update(raw[i]);
            if pressed == self.latched[i] {
                continue;
            }
            self.latched[i] = pressed;

            let LeafNotes { lower, upper } = self.notes[i];
            let pairs = std::iter::once(lower).chain(upper);
            for pair in pairs {
                let note = f32::from(pair.note);
                emit(if pressed {
                    NoteEvent::on(note, f32::from(pair.velocity), self.channel)
                } else {
                    NoteEvent::off(note, 0.0, self.channel)
                });
            }
        }
    }

    pub fn is_pressed(&self, input: usize) -> bool {
        self.latched.get(input).copied().unwrap_or(false)
    }

    pub fn notes(&self) -> &[LeafNotes; M] {
        &self.notes
    }
}
