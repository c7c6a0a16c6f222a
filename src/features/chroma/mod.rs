//! Chroma extraction modules
//!
//! Extract pitch-class distribution (12 semitones) from audio:
//! - Chroma matrix type with per-frame timestamps
//! - STFT-based chroma computation
//! - Normalization strategies

pub mod extractor;
pub mod normalization;

use crate::error::AnalysisError;

/// Number of pitch classes per chroma vector
pub const PITCH_CLASSES: usize = 12;

/// A single 12-bin chroma vector
pub type ChromaVector = [f32; PITCH_CLASSES];

/// A 12 x T grid of non-negative energies with one timestamp per column
///
/// Never mutated after construction; reductions produce fresh vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromaMatrix {
    frames: Vec<ChromaVector>,
    times: Vec<f64>,
}

impl ChromaMatrix {
    /// Build a matrix from frames and their timestamps (seconds)
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the lengths differ, a timestamp is not
    /// finite, or timestamps are not non-decreasing.
    pub fn new(frames: Vec<ChromaVector>, times: Vec<f64>) -> Result<Self, AnalysisError> {
        if frames.len() != times.len() {
            return Err(AnalysisError::InvalidInput(format!(
                "Chroma frame count ({}) does not match timestamp count ({})",
                frames.len(),
                times.len()
            )));
        }
        if times.iter().any(|t| !t.is_finite()) {
            return Err(AnalysisError::InvalidInput(
                "Chroma timestamps must be finite".to_string(),
            ));
        }
        if times.windows(2).any(|w| w[1] < w[0]) {
            return Err(AnalysisError::InvalidInput(
                "Chroma timestamps must be non-decreasing".to_string(),
            ));
        }
        Ok(Self { frames, times })
    }

    /// Build a matrix whose frame `t` sits at `t * hop_size / sample_rate` seconds
    pub fn from_hop(
        frames: Vec<ChromaVector>,
        sample_rate: u32,
        hop_size: usize,
    ) -> Result<Self, AnalysisError> {
        if sample_rate == 0 || hop_size == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid frame timing: sample_rate={}, hop_size={}",
                sample_rate, hop_size
            )));
        }
        let times = (0..frames.len())
            .map(|t| (t * hop_size) as f64 / f64::from(sample_rate))
            .collect();
        Self::new(frames, times)
    }

    /// Chroma frames in time order
    pub fn frames(&self) -> &[ChromaVector] {
        &self.frames
    }

    /// Frame timestamps in seconds
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of frames (T)
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// True if the matrix has no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Average all frames into one 12-element profile (time-unaware)
    ///
    /// An empty matrix yields the zero vector.
    pub fn mean_profile(&self) -> ChromaVector {
        mean_of(self.frames.iter())
    }

    /// Average the frames whose timestamp lies in `[start, end)`
    ///
    /// Returns `None` if no frame falls inside the interval.
    pub fn mean_in_range(&self, start: f64, end: f64) -> Option<ChromaVector> {
        let mut selected = self
            .frames
            .iter()
            .zip(self.times.iter())
            .filter(|(_, t)| **t >= start && **t < end)
            .map(|(frame, _)| frame)
            .peekable();

        selected.peek()?;
        Some(mean_of(selected))
    }
}

fn mean_of<'a>(frames: impl Iterator<Item = &'a ChromaVector>) -> ChromaVector {
    let mut sum = [0.0f32; PITCH_CLASSES];
    let mut count = 0usize;
    for frame in frames {
        for (acc, &v) in sum.iter_mut().zip(frame.iter()) {
            *acc += v;
        }
        count += 1;
    }
    if count > 0 {
        let inv = 1.0 / count as f32;
        for v in sum.iter_mut() {
            *v *= inv;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(pc: usize) -> ChromaVector {
        let mut v = [0.0; PITCH_CLASSES];
        v[pc] = 1.0;
        v
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = ChromaMatrix::new(vec![unit(0)], vec![0.0, 0.1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_hop_timestamps() {
        let matrix = ChromaMatrix::from_hop(vec![unit(0); 3], 44100, 441).unwrap();
        assert_eq!(matrix.times().len(), 3);
        assert!((matrix.times()[2] - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_mean_profile() {
        let matrix = ChromaMatrix::new(vec![unit(0), unit(7)], vec![0.0, 0.5]).unwrap();
        let mean = matrix.mean_profile();
        assert!((mean[0] - 0.5).abs() < 1e-6);
        assert!((mean[7] - 0.5).abs() < 1e-6);
        assert_eq!(mean[4], 0.0);
    }

    #[test]
    fn test_mean_in_range_half_open() {
        let matrix =
            ChromaMatrix::new(vec![unit(0), unit(4), unit(7)], vec![0.0, 1.0, 2.0]).unwrap();
        let mean = matrix.mean_in_range(0.0, 1.0).unwrap();
        assert_eq!(mean, unit(0));
        let mean = matrix.mean_in_range(1.0, 2.5).unwrap();
        assert!((mean[4] - 0.5).abs() < 1e-6);
        assert!((mean[7] - 0.5).abs() < 1e-6);
        assert!(matrix.mean_in_range(2.1, 3.0).is_none());
    }
}
