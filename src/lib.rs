//! # Segment Harmony
//!
//! Key and chord analysis for bounded audio segments.
//!
//! ## Features
//!
//! - **Key Detection**: Chroma averaged over the segment, correlated against
//!   Krumhansl-Kessler templates (24 keys)
//! - **Chord Detection**: Pluggable neural recognizer, falling back to triad template
//!   matching over tempo-derived groups
//! - **Meter Awareness**: Simple and compound meters set the chord-group duration
//!
//! ## Quick Start
//!
//! ```no_run
//! use segment_harmony::{analyze_segment, SegmentAnalyzer, TimeSignature};
//!
//! let analyzer = SegmentAnalyzer::default();
//! let result = analyze_segment("song.wav", 12.0, 24.0, TimeSignature::new(4, 2)?, &analyzer);
//!
//! println!("{}", result.to_json()?);
//! # Ok::<(), segment_harmony::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! LOAD → KEY_ESTIMATE → CHORD_BACKEND_ATTEMPT → [CHORD_FALLBACK] → ASSEMBLE
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod ml;
pub mod preprocessing;

// Re-export main types
pub use analysis::analyzer::SegmentAnalyzer;
pub use analysis::result::{AnalysisResult, ChordEvent, HarmonicAnalysis, Key};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::meter::TimeSignature;
pub use io::AudioBuffer;

/// Main analysis function
///
/// Loads `[start, end)` from `path` and returns its key and chords. Never fails: every
/// error (missing file, invalid or empty window, decoding failure) becomes
/// `AnalysisResult::Error`.
///
/// # Arguments
///
/// * `path` - Audio file (wav, flac, mp3, ogg, aac/m4a)
/// * `start` - Segment start in seconds
/// * `end` - Segment end in seconds (> `start`)
/// * `time_signature` - Beats per measure and beats per chord group
/// * `analyzer` - Configured analyzer
///
/// # Example
///
/// ```no_run
/// use segment_harmony::{analyze_segment, SegmentAnalyzer, TimeSignature};
///
/// let result = analyze_segment("missing.wav", 0.0, 5.0, TimeSignature::default(), &SegmentAnalyzer::default());
/// assert!(result.is_error());
/// ```
pub fn analyze_segment(
    path: impl AsRef<std::path::Path>,
    start: f32,
    end: f32,
    time_signature: TimeSignature,
    analyzer: &SegmentAnalyzer,
) -> AnalysisResult {
    let result = analyzer.analyze_file(path, start, end, time_signature);
    if let Err(e) = &result {
        log::debug!("Analysis failed: {}", e);
    }
    result.into()
}
