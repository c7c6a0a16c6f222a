//! Audio I/O modules
//!
//! Audio decoding with Symphonia and the mono sample buffer the core analyses.

pub mod decoder;
pub mod sample_buffer;

pub use sample_buffer::AudioBuffer;
