//! Fixed-interval chord matching
//!
//! # Algorithm
//!
//! 1. Partition `[0, duration)` into half-open groups of `interval` seconds; the last
//!    group ends exactly at `duration`
//! 2. Average the chroma frames whose timestamp falls inside each group (groups with no
//!    frames are skipped)
//! 3. L2-normalize the average and take the cosine similarity with every normalized
//!    template; the first maximum wins
//! 4. Emit an event when the similarity exceeds `SIMILARITY_THRESHOLD`
//!
//! Consecutive groups with the same label are emitted as separate events.

use super::templates::{ChordTemplate, CHORD_TEMPLATES};
use crate::analysis::result::{round_to, ChordEvent};
use crate::error::AnalysisError;
use crate::features::chroma::normalization::{dot, l2_normalize};
use crate::features::chroma::{ChromaMatrix, ChromaVector};

/// Minimum cosine similarity for a group to be labelled (exclusive)
pub const SIMILARITY_THRESHOLD: f32 = 0.6;

/// Best template for a chroma profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordMatch {
    /// Winning template
    pub template: &'static ChordTemplate,

    /// Cosine similarity with the winning template (0.0-1.0 for non-negative chroma)
    pub similarity: f32,
}

/// Find the template most similar to a chroma profile
///
/// The profile is L2-normalized with an epsilon, so a silent profile scores 0.0
/// against every template and resolves to the first one ("C").
pub fn best_chord(profile: &ChromaVector) -> ChordMatch {
    let normalized = l2_normalize(profile);

    let mut best = ChordMatch {
        template: &CHORD_TEMPLATES[0],
        similarity: f32::NEG_INFINITY,
    };
    for template in CHORD_TEMPLATES.iter() {
        let similarity = dot(&normalized, &l2_normalize(&template.weights));
        if similarity > best.similarity {
            best = ChordMatch {
                template,
                similarity,
            };
        }
    }
    best
}

/// Half-open group boundaries covering `[0, duration)`
///
/// Group `i` starts at `i * interval`; each group ends where the next starts, and the
/// final group ends at `duration`. Boundaries are computed in f64 to line up with the
/// chroma frame timestamps.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `interval` is not finite and positive
pub fn group_boundaries(duration: f64, interval: f64) -> Result<Vec<(f64, f64)>, AnalysisError> {
    if !interval.is_finite() || interval <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Chord interval must be positive, got {}",
            interval
        )));
    }

    let mut starts = Vec::new();
    let mut index = 0usize;
    loop {
        let start = index as f64 * interval;
        if start >= duration {
            break;
        }
        starts.push(start);
        index += 1;
    }

    let boundaries = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(duration);
            (start, end)
        })
        .collect();

    Ok(boundaries)
}

/// Label fixed-duration groups of a chroma matrix
///
/// # Arguments
///
/// * `chroma` - Chroma matrix with timestamps relative to the segment start
/// * `duration` - Segment duration in seconds
/// * `segment_start` - Offset added to every emitted time
/// * `interval` - Group duration in seconds (see `features::meter::interval_duration`)
///
/// # Returns
///
/// Events in time order, times rounded to 2 decimals
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `interval` is not finite and positive
pub fn match_chords(
    chroma: &ChromaMatrix,
    duration: f32,
    segment_start: f32,
    interval: f32,
) -> Result<Vec<ChordEvent>, AnalysisError> {
    let groups = group_boundaries(f64::from(duration), f64::from(interval))?;
    log::debug!(
        "Matching chords over {} groups of {:.3}s ({} chroma frames)",
        groups.len(),
        interval,
        chroma.num_frames()
    );

    let mut events = Vec::new();
    for (start, end) in groups {
        let profile = match chroma.mean_in_range(start, end) {
            Some(profile) => profile,
            None => continue,
        };

        let found = best_chord(&profile);
        if found.similarity > SIMILARITY_THRESHOLD {
            events.push(ChordEvent {
                start: round_to(f64::from(segment_start) + start, 2),
                end: round_to(f64::from(segment_start) + end, 2),
                chord: found.template.label.to_string(),
            });
        } else {
            log::debug!(
                "Group [{:.2}s, {:.2}s) below threshold ({} at {:.3})",
                start,
                end,
                found.template.label,
                found.similarity
            );
        }
    }

    Ok(events)
}
