/// MIDI note number to frequency, A4 (69) = 440 Hz. Fractional notes are
/// allowed so pitch modulation can be added in semitones.
#[inline]
pub fn midi_note_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

/// Map a 7-bit controller value onto an exponential cutoff range.
pub fn cc_to_cutoff(value: u8, min_hz: f32, max_hz: f32) -> f32 {
    let t = f32::from(value.min(127)) / 127.0;
    min_hz * (max_hz / min_hz).powf(t)
}
