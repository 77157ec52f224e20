//! Real-world scenario benchmarks.
//!
//! These model the two shipped instruments: single voices, full voice
//! pools at their real polyphony, and the complete engine with the reverb
//! bus and message queue.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
