//! leafsynth - play the instrument from a terminal
//!
//! Run with: cargo run -- [leaves|pluck]

mod app;

use color_eyre::eyre::{bail, Result as EyreResult};
use leafsynth::{InstrumentConfig, LEAF_VOICES, PLUCK_VOICES};

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let preset = std::env::args().nth(1).unwrap_or_else(|| "leaves".to_string());
    match preset.as_str() {
        "leaves" => app::run::<LEAF_VOICES>("leaves", InstrumentConfig::leaves()),
        "pluck" => app::run::<PLUCK_VOICES>("pluck", InstrumentConfig::pluck()),
        other => bail!("unknown preset `{other}` (expected `leaves` or `pluck`)"),
    }
}
