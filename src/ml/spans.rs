//! Recognizer span consumption

use super::recognizer::ChordSpan;
use crate::analysis::result::{round_to, ChordEvent};

/// Convert raw recognizer spans into chord events
///
/// "N" spans are dropped. Consecutive remaining spans with the same label collapse into
/// one event running from the first span's start to the last span's end. Times are
/// offset by `segment_start` and rounded to 2 decimals. Labels pass through verbatim.
///
/// # Example
///
/// ```
/// use segment_harmony::ml::{consume_spans, ChordSpan};
///
/// let spans = vec![
///     ChordSpan::new(0.0, 1.0, "C:maj"),
///     ChordSpan::new(1.0, 1.5, "N"),
///     ChordSpan::new(1.5, 2.0, "C:maj"),
///     ChordSpan::new(2.0, 3.0, "A:min"),
/// ];
/// let events = consume_spans(&spans, 10.0);
/// assert_eq!(events.len(), 2);
/// assert_eq!(events[0].end, 12.0);
/// assert_eq!(events[1].chord, "A:min");
/// ```
pub fn consume_spans(spans: &[ChordSpan], segment_start: f32) -> Vec<ChordEvent> {
    let mut merged: Vec<ChordSpan> = Vec::new();

    for span in spans.iter().filter(|s| !s.is_no_chord()) {
        match merged.last_mut() {
            Some(last) if last.label == span.label => last.end = span.end,
            _ => merged.push(span.clone()),
        }
    }

    log::debug!(
        "Consumed {} recognizer spans into {} chord events",
        spans.len(),
        merged.len()
    );

    merged
        .into_iter()
        .map(|span| ChordEvent {
            start: round_to(f64::from(segment_start) + f64::from(span.start), 2),
            end: round_to(f64::from(segment_start) + f64::from(span.end), 2),
            chord: span.label,
        })
        .collect()
}
