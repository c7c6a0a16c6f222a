//! Time signature and pulse counting
//!
//! Simple meters pulse once per notated beat. Compound meters (6, 9 and 12 beats per
//! measure) pulse once per dotted-beat group of three.
//!
//! # Example
//!
//! ```
//! use segment_harmony::features::meter::TimeSignature;
//!
//! let six_eight = TimeSignature::new(6, 6)?;
//! assert_eq!(six_eight.pulses_per_measure(), 2);
//! assert_eq!(six_eight.name(), "6/8");
//! # Ok::<(), segment_harmony::AnalysisError>(())
//! ```

use crate::error::AnalysisError;

/// Rhythmic context of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    beats_per_measure: u32,
    beats_to_group: u32,
}

impl TimeSignature {
    /// Create a time signature
    ///
    /// # Arguments
    ///
    /// * `beats_per_measure` - Notated beats per measure (>= 1)
    /// * `beats_to_group` - Beats covered by one chord group (>= 1); may exceed
    ///   `beats_per_measure` or not divide it
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if either value is zero
    pub fn new(beats_per_measure: u32, beats_to_group: u32) -> Result<Self, AnalysisError> {
        if beats_per_measure == 0 {
            return Err(AnalysisError::InvalidInput(
                "beats_per_measure must be >= 1".to_string(),
            ));
        }
        if beats_to_group == 0 {
            return Err(AnalysisError::InvalidInput(
                "beats_to_group must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            beats_per_measure,
            beats_to_group,
        })
    }

    /// One chord group per measure
    pub fn whole_measures(beats_per_measure: u32) -> Result<Self, AnalysisError> {
        Self::new(beats_per_measure, beats_per_measure)
    }

    /// Notated beats per measure
    pub fn beats_per_measure(&self) -> u32 {
        self.beats_per_measure
    }

    /// Beats per chord group
    pub fn beats_to_group(&self) -> u32 {
        self.beats_to_group
    }

    /// Felt pulses per measure
    ///
    /// | beats per measure | pulses |
    /// |---|---|
    /// | 6 | 2 |
    /// | 9 | 3 |
    /// | 12 | 4 |
    /// | other | beats per measure |
    pub fn pulses_per_measure(&self) -> u32 {
        match self.beats_per_measure {
            6 => 2,
            9 => 3,
            12 => 4,
            other => other,
        }
    }

    /// Whether the meter is compound (pulses on dotted beats)
    pub fn is_compound(&self) -> bool {
        self.pulses_per_measure() != self.beats_per_measure
    }

    /// Conventional name, e.g. "4/4", "3/4", "6/8"
    ///
    /// Compound meters are written over 8, everything else over 4.
    pub fn name(&self) -> String {
        let denominator = if self.is_compound() { 8 } else { 4 };
        format!("{}/{}", self.beats_per_measure, denominator)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            beats_per_measure: 4,
            beats_to_group: 4,
        }
    }
}
