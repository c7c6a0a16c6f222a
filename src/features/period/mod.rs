//! Period estimation modules
//!
//! Convert an onset strength envelope to a global tempo estimate using
//! prior-weighted autocorrelation.

pub mod autocorrelation;

pub use autocorrelation::estimate_tempo_from_envelope;

/// Global tempo estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoEstimate {
    /// Tempo in beats per minute
    pub bpm: f32,

    /// Normalized autocorrelation strength at the chosen lag (0.0-1.0)
    pub strength: f32,
}
