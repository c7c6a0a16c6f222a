//! Krumhansl-Kessler key templates
//!
//! Tonal profiles for major and minor keys, indexed from the tonic. The 24 keys are
//! obtained by rotating the chroma profile against these two templates rather than
//! storing 24 copies.

/// Pitch-class names, starting at C
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Major and minor tone profiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyTemplates {
    /// Major profile, tonic at index 0
    pub major: [f32; 12],

    /// Minor profile, tonic at index 0
    pub minor: [f32; 12],
}

/// Krumhansl-Kessler (1982) probe-tone profiles
pub const KRUMHANSL_KESSLER: KeyTemplates = KeyTemplates {
    major: [
        6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
    ],
    minor: [
        6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
    ],
};

impl Default for KeyTemplates {
    fn default() -> Self {
        KRUMHANSL_KESSLER
    }
}
