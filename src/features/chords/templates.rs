//! Triad templates
//!
//! Binary 12-bin masks for the 12 major and 12 minor triads, built at compile time.
//! Iteration order is fixed (C..B major, then Cm..Bm minor) and decides ties.

use crate::features::chroma::{ChromaVector, PITCH_CLASSES};
use crate::features::key::PITCH_CLASS_NAMES;

/// Number of chord templates (12 roots x 2 qualities)
pub const NUM_CHORD_TEMPLATES: usize = 2 * PITCH_CLASSES;

const MINOR_LABELS: [&str; PITCH_CLASSES] = [
    "Cm", "C#m", "Dm", "D#m", "Em", "Fm", "F#m", "Gm", "G#m", "Am", "A#m", "Bm",
];

/// Intervals (in semitones) of a major triad
const MAJOR_TRIAD: [usize; 3] = [0, 4, 7];

/// Intervals (in semitones) of a minor triad
const MINOR_TRIAD: [usize; 3] = [0, 3, 7];

/// A labelled chord template
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordTemplate {
    /// Chord label, e.g. "C", "F#", "Am"
    pub label: &'static str,

    /// 1.0 on chord tones, 0.0 elsewhere
    pub weights: ChromaVector,
}

/// All chord templates in matching order
pub const CHORD_TEMPLATES: [ChordTemplate; NUM_CHORD_TEMPLATES] = build_templates();

const fn build_templates() -> [ChordTemplate; NUM_CHORD_TEMPLATES] {
    let mut table = [ChordTemplate {
        label: "",
        weights: [0.0; PITCH_CLASSES],
    }; NUM_CHORD_TEMPLATES];

    let mut root = 0;
    while root < PITCH_CLASSES {
        table[root] = triad(PITCH_CLASS_NAMES[root], root, &MAJOR_TRIAD);
        table[PITCH_CLASSES + root] = triad(MINOR_LABELS[root], root, &MINOR_TRIAD);
        root += 1;
    }
    table
}

const fn triad(label: &'static str, root: usize, intervals: &[usize; 3]) -> ChordTemplate {
    let mut weights = [0.0; PITCH_CLASSES];
    let mut i = 0;
    while i < intervals.len() {
        weights[(root + intervals[i]) % PITCH_CLASSES] = 1.0;
        i += 1;
    }
    ChordTemplate { label, weights }
}
