//! Wiring between the polling context and the audio thread.
//!
//! [`build_instrument`] validates a config and returns the two halves of an
//! instrument joined by one SPSC queue:
//!
//! ```text
//!   polling thread                          audio callback
//!   ┌──────────────┐   SynthMessage queue   ┌──────────────┐
//!   │ InputPoller  │ ─────────────────────→ │ SynthEngine  │
//!   │  switches    │       (rtrb, SPSC)     │  voices      │
//!   │  MIDI router │                        │  mix bus     │
//!   └──────────────┘                        └──────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use leafsynth::{runtime::build_instrument, InstrumentConfig, LEAF_VOICES};
//!
//! let (mut poller, mut engine) =
//!     build_instrument::<LEAF_VOICES>(&InstrumentConfig::leaves())?;
//! poller.poll_switches(&[true, false, false, false, false, false]);
//! engine.render(&mut left, &mut right);
//! ```

mod poller;

pub use poller::InputPoller;

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

#[cfg(feature = "rtrb")]
use crate::{
    config::{InstrumentConfig, LEAF_COUNT},
    error::ConfigError,
    synth::{engine::SynthEngine, message::SynthMessage},
};

#[cfg(feature = "rtrb")]
pub type QueuedPoller = InputPoller<LEAF_COUNT, Producer<SynthMessage>>;
#[cfg(feature = "rtrb")]
pub type QueuedEngine<const N: usize> = SynthEngine<N, Consumer<SynthMessage>>;

/// Validate `config` and build an `N`-voice instrument.
#[cfg(feature = "rtrb")]
pub fn build_instrument<const N: usize>(
    config: &InstrumentConfig,
) -> Result<(QueuedPoller, QueuedEngine<N>), ConfigError> {
    config.validate()?;

    let (tx, rx) = RingBuffer::<SynthMessage>::new(config.input.queue_capacity);
    let poller = InputPoller::new(config.leaves, &config.input, tx);
    let engine = SynthEngine::new(config, rx);

    log::info!(
        "built {N}-voice instrument at {} Hz ({:?}, queue {})",
        config.sample_rate,
        config.voice.waveform,
        config.input.queue_capacity
    );
    Ok((poller, engine))
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = InstrumentConfig::leaves();
        config.input.queue_capacity = 0;
        assert!(matches!(
            build_instrument::<4>(&config),
            Err(ConfigError::QueueCapacity(0))
        ));
    }

    #[test]
    fn poller_feeds_engine() {
        let config = InstrumentConfig::pluck().with_sample_rate(16_000.0);
        let (mut poller, mut engine) = build_instrument::<4>(&config).unwrap();

        poller.handle_midi_bytes(&[0x90, 60, 100]).unwrap();
        assert_eq!(engine.active_voices(), 0);

        let mut left = [0.0; 32];
        let mut right = [0.0; 32];
        engine.render(&mut left, &mut right);
        assert_eq!(engine.active_voices(), 1);
    }

    #[test]
    fn builds_on_a_small_stack() {
        let config = InstrumentConfig::leaves().with_sample_rate(192_000.0);
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(move || {
                let (_poller, mut engine) = build_instrument::<16>(&config).unwrap();
                let mut left = [0.0; 64];
                let mut right = [0.0; 64];
                engine.render(&mut left, &mut right);
                engine.active_voices()
            })
            .unwrap();
        assert_eq!(handle.join().unwrap(), 0);
    }
}
