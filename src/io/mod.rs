// Purpose - input transports and their normalization into synth messages
// Everything in this layer runs in the polling context, never on the audio thread

pub mod converter;
pub mod midi;
pub mod router;
pub mod switch;
pub mod touch;

pub use midi::{MidiEvent, NoteEvent, NoteOffEvent, NoteOnEvent};
pub use router::EventRouter;
pub use switch::{Debouncer, LeafNotes, NotePair, SwitchBank};
pub use touch::{touch_mask_to_inputs, Cap1188};
