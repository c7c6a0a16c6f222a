//! Chord-group interval duration

use super::TimeSignature;
use crate::error::AnalysisError;

/// Duration of one measure in seconds: `(60 / tempo) * pulses_per_measure`
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `tempo` is not finite and positive
pub fn measure_duration(tempo: f32, time_signature: &TimeSignature) -> Result<f32, AnalysisError> {
    if !tempo.is_finite() || tempo <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Tempo must be positive, got {}",
            tempo
        )));
    }
    Ok(60.0 / tempo * time_signature.pulses_per_measure() as f32)
}

/// Duration of one chord group in seconds
///
/// `measure_duration * (beats_to_group / beats_per_measure)`. Groups longer than a
/// measure and groups that do not divide the measure evenly are both valid.
///
/// # Example
///
/// ```
/// use segment_harmony::features::meter::{interval_duration, TimeSignature};
///
/// // 4/4 at 120 BPM, two beats per chord
/// let interval = interval_duration(120.0, &TimeSignature::new(4, 2)?)?;
/// assert!((interval - 1.0).abs() < 1e-6);
/// # Ok::<(), segment_harmony::AnalysisError>(())
/// ```
pub fn interval_duration(tempo: f32, time_signature: &TimeSignature) -> Result<f32, AnalysisError> {
    let measure = measure_duration(tempo, time_signature)?;
    let interval = measure * time_signature.beats_to_group() as f32
        / time_signature.beats_per_measure() as f32;

    log::debug!(
        "Meter {} at {:.2} BPM: measure {:.3}s, group of {} beats = {:.3}s",
        time_signature.name(),
        tempo,
        measure,
        time_signature.beats_to_group(),
        interval
    );

    Ok(interval)
}
