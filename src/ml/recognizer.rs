//! Chord recognizer interface

use crate::error::AnalysisError;
use crate::io::AudioBuffer;

/// Label a recognizer uses for "no chord"
pub const NO_CHORD: &str = "N";

/// A raw recognizer span, times relative to the buffer start
#[derive(Debug, Clone, PartialEq)]
pub struct ChordSpan {
    /// Start time in seconds
    pub start: f32,
    /// End time in seconds
    pub end: f32,
    /// Chord label in the recognizer's vocabulary
    pub label: String,
}

impl ChordSpan {
    /// Create a span
    pub fn new(start: f32, end: f32, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// Whether this span marks the absence of a chord
    pub fn is_no_chord(&self) -> bool {
        self.label == NO_CHORD
    }
}

/// A neural (or otherwise learned) chord recognizer
///
/// Implementations must be safe to share between concurrent analyses.
pub trait ChordRecognizer: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Whether the recognizer can run in this environment
    fn is_available(&self) -> bool;

    /// Recognize chords in a mono buffer
    ///
    /// # Errors
    ///
    /// Any runtime fault; the caller falls back to template matching.
    fn recognize(&self, buffer: &AudioBuffer) -> Result<Vec<ChordSpan>, AnalysisError>;
}
