//! Energy flux onset strength envelope
//!
//! Measures how sharply frame energy rises, frame by frame.
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS energy per frame
//! 3. Compute the half-wave rectified energy derivative: E_flux[n] = max(0, E[n] - E[n-1])
//!
//! The envelope feeds tempo estimation; it is not peak-picked.
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
//! A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.

use crate::error::AnalysisError;

/// Compute the energy flux envelope
///
/// # Arguments
///
/// * `samples` - Audio samples (mono)
/// * `frame_size` - Frame size for analysis (typically 2048)
/// * `hop_size` - Hop size between frames (typically 512)
///
/// # Returns
///
/// One flux value per frame transition (`num_frames - 1` values, one frame per `hop_size`).
/// Audio shorter than two frames yields an empty envelope.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_size` or `hop_size` is zero
pub fn compute_energy_flux(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    if frame_size > samples.len() {
        log::debug!(
            "Frame size ({}) larger than audio length ({}), empty envelope",
            frame_size,
            samples.len()
        );
        return Ok(Vec::new());
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    if num_frames < 2 {
        return Ok(Vec::new());
    }

    let frame_energies: Vec<f32> = (0..num_frames)
        .map(|i| {
            let start = i * hop_size;
            let frame = &samples[start..start + frame_size];
            let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
            (sum_sq / frame_size as f32).sqrt()
        })
        .collect();

    let flux: Vec<f32> = frame_energies
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();

    log::debug!(
        "Energy flux envelope: {} frames, frame={}, hop={}",
        flux.len(),
        frame_size,
        hop_size
    );

    Ok(flux)
}
