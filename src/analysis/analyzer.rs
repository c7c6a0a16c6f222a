//! Segment analyzer
//!
//! Runs one analysis: `LOAD -> KEY_ESTIMATE -> CHORD_BACKEND_ATTEMPT -> [CHORD_FALLBACK]
//! -> ASSEMBLE`. The chord ladder is fixed at construction: neural first, then template
//! matching. Backend faults are logged and recovered; only input errors are returned.

use super::backend::{
    BackendOutcome, ChordBackend, NeuralChordBackend, SegmentContext, TemplateChordBackend,
};
use super::result::{round_to, ChordEvent, HarmonicAnalysis};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::key::{detect_key, KRUMHANSL_KESSLER};
use crate::features::meter::TimeSignature;
use crate::features::{FeatureExtractor, StftFeatureExtractor};
use crate::io::decoder::load_segment;
use crate::io::AudioBuffer;
use crate::ml::ChordRecognizer;
use std::path::Path;

/// Key and chord analyzer for audio segments
///
/// Holds no per-analysis state; one analyzer can serve many segments, concurrently if
/// shared by reference.
///
/// # Example
///
/// ```no_run
/// use segment_harmony::{AnalysisConfig, SegmentAnalyzer, TimeSignature};
///
/// let analyzer = SegmentAnalyzer::new(AnalysisConfig::default());
/// let analysis = analyzer.analyze_file("song.mp3", 30.0, 45.0, TimeSignature::default())?;
/// println!("{} ({:.3})", analysis.key, analysis.confidence);
/// # Ok::<(), segment_harmony::AnalysisError>(())
/// ```
pub struct SegmentAnalyzer {
    config: AnalysisConfig,
    extractor: Box<dyn FeatureExtractor>,
    neural: NeuralChordBackend,
    template: TemplateChordBackend,
}

impl SegmentAnalyzer {
    /// Analyzer with the STFT feature extractor and no neural recognizer
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            extractor: Box::new(StftFeatureExtractor::new(config.clone())),
            neural: NeuralChordBackend::new(),
            template: TemplateChordBackend::new(config.default_tempo),
            config,
        }
    }

    /// Use `recognizer` for the neural rung of the chord ladder
    pub fn with_recognizer(mut self, recognizer: Box<dyn ChordRecognizer>) -> Self {
        self.neural = NeuralChordBackend::with_recognizer(recognizer);
        self
    }

    /// Replace the feature extractor
    pub fn with_extractor(mut self, extractor: Box<dyn FeatureExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Chord backends in the order they are tried
    pub fn ladder(&self) -> [&dyn ChordBackend; 2] {
        [&self.neural, &self.template]
    }

    /// Load `[start, end)` from `path` and analyze it
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if `path` does not exist
    /// - `InvalidInput` for an invalid window
    /// - `EmptySegment` if the window holds no audio
    /// - `DecodingError` if the file cannot be decoded
    pub fn analyze_file(
        &self,
        path: impl AsRef<Path>,
        start: f32,
        end: f32,
        time_signature: TimeSignature,
    ) -> Result<HarmonicAnalysis, AnalysisError> {
        let path = path.as_ref();
        log::debug!("LOAD {} [{:.2}s, {:.2}s)", path.display(), start, end);
        let buffer = load_segment(path, start, end, self.config.sample_rate)?;
        self.analyze_buffer(&buffer, start, time_signature)
    }

    /// Analyze an already decoded mono segment
    ///
    /// # Arguments
    ///
    /// * `buffer` - Mono segment
    /// * `segment_start` - Absolute start time of the segment, added to chord times
    /// * `time_signature` - Rhythmic context for template grouping
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptySegment` for an empty buffer, or the feature
    /// extractor's error if chroma cannot be computed
    pub fn analyze_buffer(
        &self,
        buffer: &AudioBuffer,
        segment_start: f32,
        time_signature: TimeSignature,
    ) -> Result<HarmonicAnalysis, AnalysisError> {
        if buffer.is_empty() {
            return Err(AnalysisError::EmptySegment);
        }

        log::debug!(
            "KEY_ESTIMATE over {:.2}s at {} Hz",
            buffer.duration(),
            buffer.sample_rate()
        );
        let chroma = self.extractor.chroma(buffer)?;
        let key = detect_key(&chroma, &KRUMHANSL_KESSLER)?;

        let context = SegmentContext {
            buffer,
            chroma: &chroma,
            segment_start,
            time_signature,
            extractor: self.extractor.as_ref(),
        };
        let chords = self.detect_chords(&context)?;

        Ok(HarmonicAnalysis {
            key: key.key,
            confidence: round_to(f64::from(key.confidence), 3),
            chords,
        })
    }

    fn detect_chords(
        &self,
        context: &SegmentContext<'_>,
    ) -> Result<Vec<ChordEvent>, AnalysisError> {
        match self.neural.detect(context) {
            BackendOutcome::Detected(events) => {
                log::debug!("{} backend produced {} chords", self.neural.name(), events.len());
                return Ok(events);
            }
            BackendOutcome::Unavailable => {
                log::debug!("{} backend unavailable, falling back", self.neural.name());
            }
            BackendOutcome::Failed(e) => {
                log::warn!("{} backend failed: {}; falling back", self.neural.name(), e);
            }
        }

        // Last rung: always runs, so its error is the analysis error
        let events = self.template.match_segment(context)?;
        log::debug!("{} backend produced {} chords", self.template.name(), events.len());
        Ok(events)
    }
}

impl Default for SegmentAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
