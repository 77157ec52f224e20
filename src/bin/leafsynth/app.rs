//! Audio output and the terminal polling loop

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal,
};

use leafsynth::{runtime::build_instrument, InstrumentConfig, LEAF_COUNT};

/// Keys standing in for a MIDI keyboard, C4 up to C5.
const NOTE_KEYS: [(char, u8); 8] = [
    ('a', 60),
    ('s', 62),
    ('d', 64),
    ('f', 65),
    ('g', 67),
    ('h', 69),
    ('j', 71),
    ('k', 72),
];

const KEY_VELOCITY: u8 = 100;
const CUTOFF_STEP: f32 = 1.25;
const CUTOFF_RANGE: (f32, f32) = (100.0, 12_000.0);

/// Restores the terminal even when the loop bails out early.
struct RawMode;

impl RawMode {
    fn enable() -> EyreResult<Self> {
        terminal::enable_raw_mode().wrap_err("failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Keyboard-driven stand-in for the leaf sensors and a MIDI keyboard.
struct KeyState {
    touched: [bool; LEAF_COUNT],
    held_notes: [bool; NOTE_KEYS.len()],
    cutoff: f32,
    quit: bool,
}

enum Action {
    Midi([u8; 3]),
    AllNotesOff,
    Cutoff(f32),
    None,
}

impl KeyState {
    fn new(cutoff: f32) -> Self {
        Self {
            touched: [false; LEAF_COUNT],
            held_notes: [false; NOTE_KEYS.len()],
            cutoff,
            quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.quit = true;
                Action::None
            }
            KeyCode::Char(' ') => {
                self.held_notes = [false; NOTE_KEYS.len()];
                Action::AllNotesOff
            }
            KeyCode::Char('[') => {
                self.cutoff = (self.cutoff / CUTOFF_STEP).max(CUTOFF_RANGE.0);
                Action::Cutoff(self.cutoff)
            }
            KeyCode::Char(']') => {
                self.cutoff = (self.cutoff * CUTOFF_STEP).min(CUTOFF_RANGE.1);
                Action::Cutoff(self.cutoff)
            }
            KeyCode::Char(c @ '1'..='6') => {
                let leaf = c as usize - '1' as usize;
                self.touched[leaf] = !self.touched[leaf];
                Action::None
            }
            KeyCode::Char(c) => match NOTE_KEYS.iter().position(|&(k, _)| k == c) {
                Some(idx) => {
                    let held = !self.held_notes[idx];
                    self.held_notes[idx] = held;
                    let velocity = if held { KEY_VELOCITY } else { 0 };
                    Action::Midi([0x90, NOTE_KEYS[idx].1, velocity])
                }
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    /// Readings as the sensor wiring would report them.
    fn raw_inputs(&self, inverted: bool) -> [bool; LEAF_COUNT] {
        self.touched.map(|t| t != inverted)
    }
}

pub fn run<const N: usize>(name: &str, config: InstrumentConfig) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let stream_config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = stream_config.sample_rate().0 as f32;
    let channels = stream_config.channels() as usize;
    let config = config.with_sample_rate(sample_rate);

    let (mut poller, mut engine) =
        build_instrument::<N>(&config).wrap_err("invalid instrument configuration")?;

    println!("=== leafsynth ({name}) ===");
    println!("Voices: {N}");
    println!("Sample rate: {sample_rate} Hz");
    println!("Channels: {channels}");
    println!();
    println!("  1-6        toggle leaves");
    println!("  a..k       toggle notes C4-C5");
    println!("  [ ]        filter cutoff");
    println!("  space      all notes off");
    println!("  q / Esc    quit");
    println!();

    let stream = device.build_output_stream(
        &stream_config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            engine.render_interleaved(data, channels);
        },
        |err| log::error!("audio stream error: {err}"),
        None,
    )?;
    stream.play().wrap_err("failed to start audio stream")?;

    let start_cutoff = config
        .voice
        .filter
        .map_or(CUTOFF_RANGE.1, |f| f.cutoff_hz);
    let mut keys = KeyState::new(start_cutoff);
    let interval = Duration::from_millis(config.input.poll_interval_ms);

    {
        let _raw = RawMode::enable()?;
        let mut next_poll = Instant::now() + interval;

        while !keys.quit {
            let timeout = next_poll.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match keys.handle_key(key.code) {
                            Action::Midi(bytes) => {
                                poller.handle_midi_bytes(&bytes)?;
                            }
                            Action::AllNotesOff => {
                                poller.all_notes_off();
                            }
                            Action::Cutoff(hz) => {
                                poller.set_cutoff(hz);
                            }
                            Action::None => {}
                        }
                    }
                }
            }

            if Instant::now() >= next_poll {
                poller.poll_switches(&keys.raw_inputs(config.input.invert_switches));
                next_poll += interval;
            }
        }
    }

    drop(stream);
    if poller.dropped_messages() > 0 {
        log::warn!("{} input messages were dropped", poller.dropped_messages());
    }
    Ok(())
}
