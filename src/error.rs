use std::fmt;

/// Rejected instrument configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A parameter is NaN, infinite, or outside its allowed range.
    OutOfRange { field: &'static str, value: f32 },
    DebounceDepth(u8),
    QueueCapacity(usize),
    MidiChannel(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OutOfRange { field, value } => {
                write!(f, "config value `{field}` out of range: {value}")
            }
            ConfigError::DebounceDepth(depth) => {
                write!(f, "debounce depth must be 1..=8 polls, got {depth}")
            }
            ConfigError::QueueCapacity(cap) => {
                write!(f, "message queue capacity must be non-zero, got {cap}")
            }
            ConfigError::MidiChannel(ch) => write!(f, "MIDI channel must be 0..=15, got {ch}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Bytes that do not form a complete MIDI message.
#[derive(Debug, Clone, PartialEq)]
pub enum MidiError {
    Parse(wmidi::FromBytesError),
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::Parse(err) => write!(f, "invalid MIDI message: {err:?}"),
        }
    }
}

impl std::error::Error for MidiError {}

impl From<wmidi::FromBytesError> for MidiError {
    fn from(err: wmidi::FromBytesError) -> Self {
        MidiError::Parse(err)
    }
}

/// Touch sensor bring-up failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchError<E> {
    /// The underlying I2C transfer failed.
    Bus(E),
    /// A device answered but its identity registers do not match.
    WrongDevice { product: u8, manufacturer: u8, revision: u8 },
    /// Every bounded init attempt failed.
    InitTimeout { attempts: u32 },
}

impl<E: fmt::Debug> fmt::Display for TouchError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TouchError::Bus(err) => write!(f, "touch sensor I2C error: {err:?}"),
            TouchError::WrongDevice {
                product,
                manufacturer,
                revision,
            } => write!(
                f,
                "unexpected touch sensor id: product 0x{product:02x}, manufacturer 0x{manufacturer:02x}, revision 0x{revision:02x}"
            ),
            TouchError::InitTimeout { attempts } => {
                write!(f, "touch sensor did not initialize after {attempts} attempts")
            }
        }
    }
}

impl<E: fmt::Debug> std::error::Error for TouchError<E> {}
