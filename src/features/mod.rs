//! Feature extraction modules
//!
//! This module contains all feature extraction algorithms:
//! - Chroma extraction
//! - Key detection
//! - Onset strength and tempo estimation
//! - Meter-to-interval translation
//! - Template chord matching

pub mod chords;
pub mod chroma;
pub mod key;
pub mod meter;
pub mod onset;
pub mod period;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::AudioBuffer;
use chroma::ChromaMatrix;

/// Source of the spectral features the analysis consumes
///
/// Implementations must be deterministic and safe to share between concurrent analyses.
pub trait FeatureExtractor: Send + Sync {
    /// Chroma matrix of the buffer, timestamps relative to the buffer start
    fn chroma(&self, buffer: &AudioBuffer) -> Result<ChromaMatrix, AnalysisError>;

    /// Global tempo in BPM, `None` when no periodicity is found
    fn estimate_tempo(&self, buffer: &AudioBuffer) -> Result<Option<f32>, AnalysisError>;
}

/// STFT chroma and autocorrelation tempo, parameterised by `AnalysisConfig`
#[derive(Debug, Clone, Default)]
pub struct StftFeatureExtractor {
    config: AnalysisConfig,
}

impl StftFeatureExtractor {
    /// Create an extractor with the given configuration
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

impl FeatureExtractor for StftFeatureExtractor {
    fn chroma(&self, buffer: &AudioBuffer) -> Result<ChromaMatrix, AnalysisError> {
        chroma::extractor::extract_chroma(
            buffer.samples(),
            buffer.sample_rate(),
            self.config.frame_size,
            self.config.hop_size,
            self.config.min_frequency,
            self.config.max_frequency,
        )
    }

    fn estimate_tempo(&self, buffer: &AudioBuffer) -> Result<Option<f32>, AnalysisError> {
        let envelope = onset::compute_energy_flux(
            buffer.samples(),
            self.config.onset_frame_size,
            self.config.hop_size,
        )?;

        let estimate = period::estimate_tempo_from_envelope(
            &envelope,
            buffer.sample_rate(),
            self.config.hop_size,
            self.config.min_bpm,
            self.config.max_bpm,
            self.config.tempo_prior_bpm,
        )?;

        Ok(estimate.map(|e| e.bpm))
    }
}
