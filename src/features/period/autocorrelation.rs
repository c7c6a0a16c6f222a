//! Autocorrelation-based tempo estimation
//!
//! Finds periodicity in an onset strength envelope using FFT-accelerated autocorrelation.
//!
//! # Algorithm
//!
//! 1. Remove the envelope mean so the ACF is not dominated by its DC term
//! 2. Compute autocorrelation using FFT acceleration: `ACF = IFFT(|FFT(signal)|²)`
//! 3. Convert the BPM range to a lag range: `lag = (60 * sample_rate) / (BPM * hop_size)`
//! 4. Weight every lag by a log-normal prior centred on `prior_bpm` (one octave deviation)
//! 5. The lag with the highest weighted ACF wins (lowest lag on ties)
//!
//! # Reference
//!
//! Ellis, D. P. W., & Pikrakis, A. (2006). Real-time Beat Induction.
//! *Proceedings of the International Conference on Music Information Retrieval*.

use super::TempoEstimate;
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const EPSILON: f32 = 1e-10;

/// Estimate tempo from an onset strength envelope
///
/// # Arguments
///
/// * `envelope` - Onset strength, one value per hop
/// * `sample_rate` - Sample rate in Hz
/// * `hop_size` - Hop size used to compute the envelope (samples per frame)
/// * `min_bpm` - Minimum BPM to consider
/// * `max_bpm` - Maximum BPM to consider
/// * `prior_bpm` - Centre of the tempo prior
///
/// # Returns
///
/// `Ok(None)` when the envelope is flat or too short to cover the lag range
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for invalid rates, hop sizes or BPM ranges
pub fn estimate_tempo_from_envelope(
    envelope: &[f32],
    sample_rate: u32,
    hop_size: usize,
    min_bpm: f32,
    max_bpm: f32,
    prior_bpm: f32,
) -> Result<Option<TempoEstimate>, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid hop size: 0".to_string(),
        ));
    }

    if min_bpm <= 0.0 || max_bpm <= 0.0 || min_bpm >= max_bpm || prior_bpm <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid BPM range: [{:.1}, {:.1}] (prior {:.1})",
            min_bpm, max_bpm, prior_bpm
        )));
    }

    log::debug!(
        "Estimating tempo from {} envelope frames, {} Hz, hop={}, range=[{:.1}, {:.1}] BPM",
        envelope.len(),
        sample_rate,
        hop_size,
        min_bpm,
        max_bpm
    );

    if envelope.len() < 2 {
        return Ok(None);
    }

    let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;
    let centred: Vec<f32> = envelope.iter().map(|&x| x - mean).collect();
    if centred.iter().all(|x| x.abs() < EPSILON) {
        log::debug!("Flat onset envelope, no tempo");
        return Ok(None);
    }

    let acf = compute_autocorrelation_fft(&centred);

    let frames_per_minute = 60.0 * sample_rate as f32 / hop_size as f32;
    let lag_min = (frames_per_minute / max_bpm).ceil().max(1.0) as usize;
    let lag_max = ((frames_per_minute / min_bpm).floor() as usize).min(acf.len() - 1);

    if lag_min > lag_max {
        log::debug!(
            "Envelope too short for lag range [{}, {}] (ACF length {})",
            lag_min,
            lag_max,
            acf.len()
        );
        return Ok(None);
    }

    let max_acf = acf[lag_min..=lag_max].iter().copied().fold(0.0f32, f32::max);
    if max_acf < EPSILON {
        return Ok(None);
    }

    let mut best: Option<(usize, f32)> = None;
    for (lag, &value) in acf.iter().enumerate().take(lag_max + 1).skip(lag_min) {
        let bpm = frames_per_minute / lag as f32;
        let weighted = value * tempo_prior(bpm, prior_bpm);
        if best.map_or(true, |(_, score)| weighted > score) {
            best = Some((lag, weighted));
        }
    }

    Ok(best.map(|(lag, _)| {
        let bpm = frames_per_minute / lag as f32;
        let strength = (acf[lag] / max_acf).clamp(0.0, 1.0);
        log::debug!("Tempo estimate: {:.2} BPM (lag {}, strength {:.3})", bpm, lag, strength);
        TempoEstimate { bpm, strength }
    }))
}

/// Log-normal tempo prior with one octave standard deviation
fn tempo_prior(bpm: f32, prior_bpm: f32) -> f32 {
    let octaves = (bpm / prior_bpm).log2();
    (-0.5 * octaves * octaves).exp()
}

/// Compute autocorrelation using FFT acceleration
///
/// Uses the identity: ACF = IFFT(|FFT(signal)|²), zero-padded to avoid circular wrap.
/// Negative values are clamped to zero.
fn compute_autocorrelation_fft(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    let fft_size = (2 * n).next_power_of_two();

    let mut fft_input: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft_input.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut fft_input);

    for x in &mut fft_input {
        *x = *x * x.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut fft_input);

    let scale = 1.0 / (fft_size as f32);
    fft_input[..n]
        .iter()
        .map(|x| (x.re * scale).max(0.0))
        .collect()
}
