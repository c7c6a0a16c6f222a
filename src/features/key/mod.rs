//! Key detection modules
//!
//! Detect musical key using:
//! - Krumhansl-Kessler templates (24 keys)
//! - Pearson correlation against every rotation of the averaged chroma profile

pub mod detector;
pub mod templates;

pub use detector::{detect_key, detect_key_from_profile, pearson_correlation};
pub use templates::{KeyTemplates, KRUMHANSL_KESSLER, PITCH_CLASS_NAMES};

use crate::analysis::result::Key;

/// Key detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyDetectionResult {
    /// Detected key (best match)
    pub key: Key,

    /// Pearson correlation of the best match (-1.0 to 1.0, NaN for degenerate input)
    pub correlation: f32,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}
