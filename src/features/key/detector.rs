//! Key detection algorithm
//!
//! Correlates the time-averaged chroma profile against Krumhansl-Kessler templates to
//! detect the musical key of a segment.
//!
//! # Reference
//!
//! Krumhansl, C. L., & Kessler, E. J. (1982). Tracing the Dynamic Changes in Perceived
//! Tonal Organization in a Spatial Representation of Musical Keys. *Psychological Review*,
//! 89(4), 334-368.

use super::templates::KeyTemplates;
use super::KeyDetectionResult;
use crate::analysis::result::Key;
use crate::error::AnalysisError;
use crate::features::chroma::{ChromaMatrix, ChromaVector, PITCH_CLASSES};

/// Detect musical key from a chroma matrix
///
/// Averages chroma across all frames, then evaluates 24 (rotation × mode) pairs
/// with Pearson correlation. The pair with the highest correlation wins.
///
/// # Arguments
///
/// * `chroma` - Chroma matrix (one 12-bin column per frame)
/// * `templates` - Key templates (Krumhansl-Kessler profiles)
///
/// # Returns
///
/// Key detection result with the best key, its correlation, and a confidence in [0, 1]
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the matrix has no frames
///
/// # Example
///
/// ```
/// use segment_harmony::features::chroma::ChromaMatrix;
/// use segment_harmony::features::key::{detect_key, KeyTemplates};
///
/// let c_major_triad = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
/// let chroma = ChromaMatrix::new(vec![c_major_triad; 4], vec![0.0, 0.1, 0.2, 0.3])?;
/// let result = detect_key(&chroma, &KeyTemplates::default())?;
/// assert_eq!(result.key.name(), "C major");
/// # Ok::<(), segment_harmony::AnalysisError>(())
/// ```
pub fn detect_key(
    chroma: &ChromaMatrix,
    templates: &KeyTemplates,
) -> Result<KeyDetectionResult, AnalysisError> {
    log::debug!("Detecting key from {} chroma frames", chroma.num_frames());

    if chroma.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty chroma matrix".to_string(),
        ));
    }

    Ok(detect_key_from_profile(&chroma.mean_profile(), templates))
}

/// Detect musical key from an already averaged 12-bin profile
///
/// Rotations are scanned in ascending order with major evaluated before minor at each
/// rotation; a later pair must be strictly better to win, so ties keep the earliest pair.
///
/// If every correlation is undefined (zero-variance profile, e.g. silence) the result
/// is C major with confidence 0.0.
pub fn detect_key_from_profile(
    profile: &ChromaVector,
    templates: &KeyTemplates,
) -> KeyDetectionResult {
    let mut best_key = Key::Major(0);
    let mut best_correlation = f32::NEG_INFINITY;

    for tonic in 0..PITCH_CLASSES {
        let rotated = rotate_left(profile, tonic);

        let major = pearson_correlation(&rotated, &templates.major);
        if major > best_correlation {
            best_correlation = major;
            best_key = Key::Major(tonic as u32);
        }

        let minor = pearson_correlation(&rotated, &templates.minor);
        if minor > best_correlation {
            best_correlation = minor;
            best_key = Key::Minor(tonic as u32);
        }
    }

    let confidence = if best_correlation.is_finite() {
        ((best_correlation + 1.0) / 2.0).clamp(0.0, 1.0)
    } else {
        log::debug!("Key correlation undefined for all 24 keys (zero-variance chroma)");
        0.0
    };

    log::debug!(
        "Detected key: {}, correlation: {:.4}, confidence: {:.4}",
        best_key.name(),
        best_correlation,
        confidence
    );

    KeyDetectionResult {
        key: best_key,
        correlation: best_correlation,
        confidence,
    }
}

/// Pearson correlation coefficient of two 12-element vectors
///
/// Computed in f64. A zero-variance input yields NaN (0/0); callers must guard.
pub fn pearson_correlation(a: &[f32; PITCH_CLASSES], b: &[f32; PITCH_CLASSES]) -> f32 {
    let n = PITCH_CLASSES as f64;
    let mean_a = a.iter().map(|&x| x as f64).sum::<f64>() / n;
    let mean_b = b.iter().map(|&x| x as f64).sum::<f64>() / n;

    let mut cov = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x as f64 - mean_a;
        let dy = y as f64 - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    (cov / (var_a * var_b).sqrt()) as f32
}

/// Cyclically shift so that pitch class `shift` lands at index 0
fn rotate_left(profile: &ChromaVector, shift: usize) -> ChromaVector {
    let mut rotated = [0.0f32; PITCH_CLASSES];
    for (j, slot) in rotated.iter_mut().enumerate() {
        *slot = profile[(j + shift) % PITCH_CLASSES];
    }
    rotated
}
