// Purpose: voice lifecycle, allocation, and the per-sample mix
// Everything in this layer runs on the audio thread

pub mod engine;
pub mod manager;
pub mod message;
pub mod mixbus;
pub mod voice;
