//! Chord backends
//!
//! Each rung of the chord ladder reports an explicit `BackendOutcome`; the analyzer
//! inspects it and moves to the next rung instead of propagating failures.

use super::result::ChordEvent;
use crate::error::AnalysisError;
use crate::features::chords::match_chords;
use crate::features::chroma::ChromaMatrix;
use crate::features::meter::{interval_duration, TimeSignature};
use crate::features::FeatureExtractor;
use crate::io::AudioBuffer;
use crate::ml::{consume_spans, ChordRecognizer};

/// Everything a backend may look at for one segment
pub struct SegmentContext<'a> {
    /// Decoded mono segment
    pub buffer: &'a AudioBuffer,

    /// Chroma of `buffer`, computed once per analysis
    pub chroma: &'a ChromaMatrix,

    /// Absolute start time of the segment in seconds
    pub segment_start: f32,

    /// Rhythmic context
    pub time_signature: TimeSignature,

    /// Feature source (tempo estimation)
    pub extractor: &'a dyn FeatureExtractor,
}

/// Result of one backend attempt
#[derive(Debug)]
pub enum BackendOutcome {
    /// Chords found (possibly none)
    Detected(Vec<ChordEvent>),
    /// Backend cannot run in this environment
    Unavailable,
    /// Backend ran and faulted
    Failed(AnalysisError),
}

/// A chord detection strategy
pub trait ChordBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Detect chords in a segment
    fn detect(&self, context: &SegmentContext<'_>) -> BackendOutcome;
}

/// Neural chord recognition through a pluggable recognizer
#[derive(Default)]
pub struct NeuralChordBackend {
    recognizer: Option<Box<dyn ChordRecognizer>>,
}

impl NeuralChordBackend {
    /// Backend with no recognizer (always unavailable)
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend wrapping `recognizer`
    pub fn with_recognizer(recognizer: Box<dyn ChordRecognizer>) -> Self {
        Self {
            recognizer: Some(recognizer),
        }
    }

    /// Whether a recognizer is configured and reports itself available
    pub fn is_available(&self) -> bool {
        self.recognizer.as_ref().is_some_and(|r| r.is_available())
    }
}

impl ChordBackend for NeuralChordBackend {
    fn name(&self) -> &str {
        "neural"
    }

    fn detect(&self, context: &SegmentContext<'_>) -> BackendOutcome {
        let recognizer = match &self.recognizer {
            Some(r) if r.is_available() => r,
            _ => return BackendOutcome::Unavailable,
        };

        log::debug!("Running chord recognizer '{}'", recognizer.name());
        match recognizer.recognize(context.buffer) {
            Ok(spans) => BackendOutcome::Detected(consume_spans(&spans, context.segment_start)),
            Err(e) => BackendOutcome::Failed(e),
        }
    }
}

/// Fixed-interval template matching
#[derive(Debug, Clone)]
pub struct TemplateChordBackend {
    default_tempo: f32,
}

impl TemplateChordBackend {
    /// Create a backend that uses `default_tempo` when no tempo can be estimated
    pub fn new(default_tempo: f32) -> Self {
        Self { default_tempo }
    }

    /// Match chords over tempo-derived groups
    ///
    /// Never unavailable: a missing tempo falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the resulting group interval is invalid
    pub fn match_segment(
        &self,
        context: &SegmentContext<'_>,
    ) -> Result<Vec<ChordEvent>, AnalysisError> {
        let tempo = self.resolve_tempo(context);
        let interval = interval_duration(tempo, &context.time_signature)?;
        match_chords(
            context.chroma,
            context.buffer.duration(),
            context.segment_start,
            interval,
        )
    }

    fn resolve_tempo(&self, context: &SegmentContext<'_>) -> f32 {
        match context.extractor.estimate_tempo(context.buffer) {
            Ok(Some(tempo)) if tempo.is_finite() && tempo > 0.0 => tempo,
            Ok(other) => {
                log::warn!(
                    "No usable tempo estimate ({:?}), using default {:.1} BPM",
                    other,
                    self.default_tempo
                );
                self.default_tempo
            }
            Err(e) => {
                log::warn!(
                    "Tempo estimation failed ({}), using default {:.1} BPM",
                    e,
                    self.default_tempo
                );
                self.default_tempo
            }
        }
    }
}

impl ChordBackend for TemplateChordBackend {
    fn name(&self) -> &str {
        "template"
    }

    fn detect(&self, context: &SegmentContext<'_>) -> BackendOutcome {
        match self.match_segment(context) {
            Ok(events) => BackendOutcome::Detected(events),
            Err(e) => BackendOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::chroma::ChromaVector;
    use crate::ml::ChordSpan;

    struct FixedFeatures {
        tempo: Result<Option<f32>, AnalysisError>,
    }

    impl FeatureExtractor for FixedFeatures {
        fn chroma(&self, _buffer: &AudioBuffer) -> Result<ChromaMatrix, AnalysisError> {
            Err(AnalysisError::ProcessingError("unused".to_string()))
        }

        fn estimate_tempo(&self, _buffer: &AudioBuffer) -> Result<Option<f32>, AnalysisError> {
            self.tempo.clone()
        }
    }

    struct ScriptedRecognizer {
        available: bool,
        spans: Result<Vec<ChordSpan>, AnalysisError>,
    }

    impl ChordRecognizer for ScriptedRecognizer {
        fn name(&self) -> &str {
            "scripted"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn recognize(&self, _buffer: &AudioBuffer) -> Result<Vec<ChordSpan>, AnalysisError> {
            self.spans.clone()
        }
    }

    const C_MAJOR: ChromaVector = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];

    fn c_major_chroma(seconds: usize) -> ChromaMatrix {
        let count = seconds * 10;
        let times = (0..count).map(|i| i as f64 * 0.1).collect();
        ChromaMatrix::new(vec![C_MAJOR; count], times).unwrap()
    }

    fn detect_with(
        backend: &dyn ChordBackend,
        tempo: Result<Option<f32>, AnalysisError>,
    ) -> BackendOutcome {
        let buffer = AudioBuffer::new(vec![0.0; 400], 100);
        let chroma = c_major_chroma(4);
        let features = FixedFeatures { tempo };
        let context = SegmentContext {
            buffer: &buffer,
            chroma: &chroma,
            segment_start: 0.0,
            time_signature: TimeSignature::default(),
            extractor: &features,
        };
        backend.detect(&context)
    }

    #[test]
    fn test_neural_without_recognizer_unavailable() {
        let backend = NeuralChordBackend::new();
        assert!(!backend.is_available());
        assert!(matches!(
            detect_with(&backend, Ok(Some(120.0))),
            BackendOutcome::Unavailable
        ));
    }

    #[test]
    fn test_neural_reports_unavailable_recognizer() {
        let backend = NeuralChordBackend::with_recognizer(Box::new(ScriptedRecognizer {
            available: false,
            spans: Ok(vec![]),
        }));
        assert!(matches!(
            detect_with(&backend, Ok(Some(120.0))),
            BackendOutcome::Unavailable
        ));
    }

    #[test]
    fn test_neural_failure() {
        let backend = NeuralChordBackend::with_recognizer(Box::new(ScriptedRecognizer {
            available: true,
            spans: Err(AnalysisError::BackendError("model crashed".to_string())),
        }));
        assert!(matches!(
            detect_with(&backend, Ok(Some(120.0))),
            BackendOutcome::Failed(AnalysisError::BackendError(_))
        ));
    }

    #[test]
    fn test_neural_consumes_spans() {
        let backend = NeuralChordBackend::with_recognizer(Box::new(ScriptedRecognizer {
            available: true,
            spans: Ok(vec![
                ChordSpan::new(0.0, 1.0, "N"),
                ChordSpan::new(1.0, 2.0, "F:maj"),
                ChordSpan::new(2.0, 3.0, "F:maj"),
            ]),
        }));
        match detect_with(&backend, Ok(Some(120.0))) {
            BackendOutcome::Detected(events) => {
                assert_eq!(events.len(), 1);
                assert_eq!(events[0].chord, "F:maj");
                assert_eq!(events[0].start, 1.0);
                assert_eq!(events[0].end, 3.0);
            }
            other => panic!("expected detection, got {:?}", other),
        }
    }

    #[test]
    fn test_template_groups_by_measure() {
        // 4/4 at 120 BPM: 2 s per group over 4 s
        match detect_with(&TemplateChordBackend::new(120.0), Ok(Some(120.0))) {
            BackendOutcome::Detected(events) => {
                assert_eq!(events.len(), 2);
                assert_eq!(events[1].start, 2.0);
                assert!(events.iter().all(|e| e.chord == "C"));
            }
            other => panic!("expected detection, got {:?}", other),
        }
    }

    #[test]
    fn test_template_default_tempo_fallback() {
        // No tempo and a failing estimator both fall back to 60 BPM: one 4 s group
        for tempo in [Ok(None), Ok(Some(-5.0)), Err(AnalysisError::ProcessingError("x".into()))] {
            match detect_with(&TemplateChordBackend::new(60.0), tempo) {
                BackendOutcome::Detected(events) => {
                    assert_eq!(events.len(), 1);
                    assert_eq!(events[0].end, 4.0);
                }
                other => panic!("expected detection, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_template_invalid_default_tempo_fails() {
        assert!(matches!(
            detect_with(&TemplateChordBackend::new(0.0), Ok(None)),
            BackendOutcome::Failed(_)
        ));
    }
}
