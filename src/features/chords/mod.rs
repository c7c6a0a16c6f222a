//! Chord recognition by template matching
//!
//! Split a segment into fixed-duration groups, average the chroma in each group and
//! label it with the closest of 24 major/minor triad templates.

pub mod matcher;
pub mod templates;

pub use matcher::{best_chord, group_boundaries, match_chords, ChordMatch, SIMILARITY_THRESHOLD};
pub use templates::{ChordTemplate, CHORD_TEMPLATES};
