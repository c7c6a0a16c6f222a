//! Chroma vector extraction
//!
//! Converts an STFT magnitude spectrogram to 12-element chroma vectors.
//!
//! Algorithm:
//! 1. Centre-pad the signal by `frame_size / 2` and cut Hann-windowed frames every `hop_size`
//! 2. FFT each frame and take magnitudes
//! 3. Map every bin inside `[min_frequency, max_frequency]` to its nearest MIDI note
//! 4. Average bins per note (so high octaves, which own more bins, do not dominate),
//!    then fold notes onto their pitch class
//! 5. Scale each frame so its strongest pitch class is 1.0

use super::normalization::max_normalize;
use super::{ChromaMatrix, ChromaVector, PITCH_CLASSES};
use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Number of MIDI notes tracked
const MIDI_NOTES: usize = 128;

/// Extract chroma vectors from audio samples
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - FFT frame size (default: 8192)
/// * `hop_size` - Hop size (default: 512)
/// * `min_frequency` - Lowest frequency folded into chroma (Hz)
/// * `max_frequency` - Highest frequency folded into chroma (Hz)
///
/// # Returns
///
/// Chroma matrix with `1 + samples.len() / hop_size` frames; frame `t` is centred at
/// `t * hop_size / sample_rate` seconds.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for zero sizes/rates or an empty frequency band.
pub fn extract_chroma(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    min_frequency: f32,
    max_frequency: f32,
) -> Result<ChromaMatrix, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }
    if frame_size < 2 || hop_size == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid STFT parameters: frame_size={}, hop_size={}",
            frame_size, hop_size
        )));
    }
    if !(min_frequency > 0.0 && max_frequency > min_frequency) {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid chroma band: [{:.2}, {:.2}] Hz",
            min_frequency, max_frequency
        )));
    }

    log::debug!(
        "Extracting chroma: {} samples at {} Hz, frame={}, hop={}",
        samples.len(),
        sample_rate,
        frame_size,
        hop_size
    );

    let bin_notes = map_bins_to_notes(sample_rate, frame_size, min_frequency, max_frequency);
    if bin_notes.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "No FFT bins fall inside the chroma band".to_string(),
        ));
    }

    let mut bins_per_note = [0usize; MIDI_NOTES];
    for &(_, note) in &bin_notes {
        bins_per_note[note] += 1;
    }

    let window = hann_window(frame_size);
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];

    let pad = frame_size / 2;
    let num_frames = 1 + samples.len() / hop_size;
    let mut frames = Vec::with_capacity(num_frames);

    for t in 0..num_frames {
        // Frame t spans padded[t*hop .. t*hop + frame_size], i.e. original index - pad
        let origin = (t * hop_size) as isize - pad as isize;
        for (n, slot) in buffer.iter_mut().enumerate() {
            let idx = origin + n as isize;
            let sample = if idx >= 0 && (idx as usize) < samples.len() {
                samples[idx as usize]
            } else {
                0.0
            };
            *slot = Complex::new(sample * window[n], 0.0);
        }

        fft.process(&mut buffer);

        let mut note_energy = [0.0f32; MIDI_NOTES];
        for &(bin, note) in &bin_notes {
            note_energy[note] += buffer[bin].norm();
        }

        let mut chroma: ChromaVector = [0.0; PITCH_CLASSES];
        for (note, &energy) in note_energy.iter().enumerate() {
            if bins_per_note[note] > 0 {
                chroma[note % PITCH_CLASSES] += energy / bins_per_note[note] as f32;
            }
        }

        frames.push(max_normalize(&chroma));
    }

    log::debug!("Extracted {} chroma frames", frames.len());

    ChromaMatrix::from_hop(frames, sample_rate, hop_size)
}

/// Map FFT bins inside the band to MIDI note numbers
fn map_bins_to_notes(
    sample_rate: u32,
    frame_size: usize,
    min_frequency: f32,
    max_frequency: f32,
) -> Vec<(usize, usize)> {
    let resolution = sample_rate as f32 / frame_size as f32;
    (1..=frame_size / 2)
        .filter_map(|bin| {
            let freq = bin as f32 * resolution;
            if freq < min_frequency || freq > max_frequency {
                return None;
            }
            let midi = 69.0 + 12.0 * (freq / 440.0).log2();
            let note = midi.round();
            if note < 0.0 || note >= MIDI_NOTES as f32 {
                return None;
            }
            Some((bin, note as usize))
        })
        .collect()
}

/// Periodic Hann window
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|n| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * n as f32 / size as f32).cos())
        .collect()
}
