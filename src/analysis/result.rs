//! Analysis result types

use crate::error::AnalysisError;
use crate::features::key::PITCH_CLASS_NAMES;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Musical key
///
/// Serializes as its name, e.g. `"A minor"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Major key (0 = C, 1 = C#, ..., 11 = B)
    Major(u32),
    /// Minor key (0 = C, 1 = C#, ..., 11 = B)
    Minor(u32),
}

impl Key {
    /// Tonic pitch class (0 = C, ..., 11 = B)
    pub fn tonic(&self) -> u32 {
        match self {
            Key::Major(i) | Key::Minor(i) => *i % 12,
        }
    }

    /// Whether this is a minor key
    pub fn is_minor(&self) -> bool {
        matches!(self, Key::Minor(_))
    }

    /// Get key name, e.g. "C major", "F# major", "A minor"
    ///
    /// # Example
    ///
    /// ```
    /// use segment_harmony::analysis::result::Key;
    ///
    /// assert_eq!(Key::Major(0).name(), "C major");
    /// assert_eq!(Key::Minor(9).name(), "A minor");
    /// assert_eq!(Key::Minor(1).name(), "C# minor");
    /// ```
    pub fn name(&self) -> String {
        let tonic = PITCH_CLASS_NAMES[self.tonic() as usize];
        match self {
            Key::Major(_) => format!("{} major", tonic),
            Key::Minor(_) => format!("{} minor", tonic),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

/// A labelled, time-aligned chord
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordEvent {
    /// Start time in seconds (absolute, 2 decimals)
    pub start: f32,

    /// End time in seconds (absolute, 2 decimals)
    pub end: f32,

    /// Chord label, e.g. "C", "Am", or a recognizer's own vocabulary
    pub chord: String,
}

/// Successful analysis of one segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicAnalysis {
    /// Detected key
    pub key: Key,

    /// Key confidence (0.0-1.0, 3 decimals)
    pub confidence: f32,

    /// Chords in time order
    pub chords: Vec<ChordEvent>,
}

/// Outcome of analysing one segment
///
/// Serializes to either `{"error": ...}` or `{"key": ..., "confidence": ..., "chords": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    /// Key and chords
    Success(HarmonicAnalysis),
    /// Terminal failure with its reason
    Error {
        /// Human-readable reason
        error: String,
    },
}

impl AnalysisResult {
    /// Whether this is the error variant
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResult::Error { .. })
    }

    /// Serialize to a single-line JSON object
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ProcessingError` if serialization fails
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string(self)
            .map_err(|e| AnalysisError::ProcessingError(format!("JSON serialization failed: {}", e)))
    }
}

impl From<Result<HarmonicAnalysis, AnalysisError>> for AnalysisResult {
    fn from(result: Result<HarmonicAnalysis, AnalysisError>) -> Self {
        match result {
            Ok(analysis) => AnalysisResult::Success(analysis),
            Err(e) => AnalysisResult::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Round to a fixed number of decimals
///
/// Rounds the exact binary value; exact halves go to the even digit.
pub(crate) fn round_to(value: f64, decimals: i32) -> f32 {
    let scale = 10f64.powi(decimals);
    let scaled = value * scale;
    // Rounding error of the product, exact via fma
    let residual = value.mul_add(scale, -scaled);

    let rounded = if scaled.fract().abs() == 0.5 && residual != 0.0 {
        if residual > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        }
    } else {
        scaled.round_ties_even()
    };
    (rounded / scale) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_key_name_major() {
        assert_eq!(Key::Major(0).name(), "C major");
        assert_eq!(Key::Major(1).name(), "C# major");
        assert_eq!(Key::Major(6).name(), "F# major");
        assert_eq!(Key::Major(11).name(), "B major");
    }

    #[test]
    fn test_key_name_minor() {
        assert_eq!(Key::Minor(0).name(), "C minor");
        assert_eq!(Key::Minor(3).name(), "D# minor");
        assert_eq!(Key::Minor(9).name(), "A minor");
        assert_eq!(Key::Minor(11).name(), "B minor");
        assert!(Key::Minor(9).is_minor());
        assert_eq!(Key::Minor(21).tonic(), 9);
    }

    #[test]
    fn test_success_json_shape() {
        let result = AnalysisResult::Success(HarmonicAnalysis {
            key: Key::Minor(9),
            confidence: 0.912,
            chords: vec![ChordEvent {
                start: 1.5,
                end: 3.25,
                chord: "Am".to_string(),
            }],
        });
        assert!(!result.is_error());
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"key":"A minor","confidence":0.912,"chords":[{"start":1.5,"end":3.25,"chord":"Am"}]}"#
        );
    }

    #[test]
    fn test_error_json_shape() {
        let result: AnalysisResult =
            Err(AnalysisError::FileNotFound(PathBuf::from("missing.wav"))).into();
        assert!(result.is_error());
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"error":"Audio file not found: missing.wav"}"#
        );
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.9876, 3), 0.988);
        assert_eq!(round_to(2.005, 0), 2.0);
        assert_eq!(round_to(-1.555, 1), -1.6);
    }

    #[test]
    fn test_round_to_exact_halves_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(10.125, 2), 10.12);
        assert_eq!(round_to(0.0625, 3), 0.062);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-0.125, 2), -0.12);
    }

    #[test]
    fn test_round_to_inexact_halves() {
        // 2.675 is stored just below the half
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(1.005, 2), 1.0);
    }
}
