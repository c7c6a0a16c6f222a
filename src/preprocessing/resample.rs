//! Sample-rate conversion to the analysis rate

use crate::error::AnalysisError;
use rubato::{FftFixedIn, Resampler};

/// Input chunk size for the FFT resampler
const CHUNK_SIZE: usize = 1024;

/// Resample a mono signal from `source_rate` to `target_rate`
///
/// The resampler's output delay is trimmed so sample `n` of the output lines up with
/// time `n / target_rate` of the input. Output length is `ceil(len * target / source)`.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero rate and
/// `AnalysisError::ProcessingError` if the resampler fails.
pub fn resample_mono(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, AnalysisError> {
    if source_rate == 0 || target_rate == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid resampling rates: {} -> {}",
            source_rate, target_rate
        )));
    }

    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    log::debug!(
        "Resampling {} samples from {} Hz to {} Hz",
        samples.len(),
        source_rate,
        target_rate
    );

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        CHUNK_SIZE,
        1,
        1,
    )
    .map_err(|e| AnalysisError::ProcessingError(format!("Resampler init failed: {}", e)))?;

    let expected =
        ((samples.len() as u64 * target_rate as u64).div_ceil(source_rate as u64)) as usize;
    let delay = resampler.output_delay();

    let mut output = vec![vec![0.0f32; resampler.output_frames_max()]; 1];
    let mut resampled = Vec::with_capacity(expected + delay);

    let mut position = 0;
    while samples.len() - position >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let input = [&samples[position..position + needed]];
        let (consumed, produced) = resampler
            .process_into_buffer(&input, &mut output, None)
            .map_err(|e| AnalysisError::ProcessingError(format!("Resampling failed: {}", e)))?;
        resampled.extend_from_slice(&output[0][..produced]);
        position += consumed;
    }

    if position < samples.len() {
        let input = [&samples[position..]];
        let (_, produced) = resampler
            .process_partial_into_buffer(Some(&input[..]), &mut output, None)
            .map_err(|e| AnalysisError::ProcessingError(format!("Resampling failed: {}", e)))?;
        resampled.extend_from_slice(&output[0][..produced]);
    }

    // Flush the delay line
    while resampled.len() < expected + delay {
        let (_, produced) = resampler
            .process_partial_into_buffer(None::<&[Vec<f32>]>, &mut output, None)
            .map_err(|e| AnalysisError::ProcessingError(format!("Resampling failed: {}", e)))?;
        if produced == 0 {
            break;
        }
        resampled.extend_from_slice(&output[0][..produced]);
    }

    let end = (delay + expected).min(resampled.len());
    let start = delay.min(end);
    Ok(resampled[start..end].to_vec())
}
