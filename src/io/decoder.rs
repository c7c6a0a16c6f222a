//! Audio decoding using Symphonia

use super::sample_buffer::AudioBuffer;
use crate::error::AnalysisError;
use crate::preprocessing::{channel_mixer::downmix_interleaved, resample::resample_mono};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file to mono PCM samples
///
/// Panics raised inside the demuxer or codec on malformed input (e.g. a zero sample
/// rate in a WAV header) are caught and reported as `DecodingError`.
///
/// # Arguments
///
/// * `path` - Path to audio file
///
/// # Returns
///
/// Tuple of (mono samples, sample_rate)
pub fn decode_audio(path: &Path) -> Result<(Vec<f32>, u32), AnalysisError> {
    log::debug!("Decoding audio file: {}", path.display());

    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| decode_file(path))).unwrap_or_else(
        |payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "decoder panicked".to_string());
            log::warn!("Decoder panicked on {}: {}", path.display(), reason);
            Err(AnalysisError::DecodingError(format!(
                "{}: malformed audio ({})",
                path.display(),
                reason
            )))
        },
    )
}

fn decode_file(path: &Path) -> Result<(Vec<f32>, u32), AnalysisError> {
    let src = File::open(path)
        .map_err(|e| AnalysisError::DecodingError(format!("{}: {}", path.display(), e)))?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AnalysisError::DecodingError(format!("Unsupported format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("No supported audio tracks found".to_string()))?;

    if track.codec_params.sample_rate == Some(0) {
        return Err(AnalysisError::DecodingError(
            "Invalid sample rate: 0 Hz".to_string(),
        ));
    }

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::DecodingError(format!("Unsupported codec: {}", e)))?;

    let mut mono: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(AnalysisError::DecodingError(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                if sample_rate == 0 {
                    sample_rate = spec.rate;
                }
                let channels = spec.channels.count();

                let buf = sample_buf
                    .get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
                if buf.capacity() < decoded.capacity() * channels {
                    *buf = SampleBuffer::new(decoded.capacity() as u64, spec);
                }
                buf.copy_interleaved_ref(decoded);
                mono.extend(downmix_interleaved(buf.samples(), channels));
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet: {}", msg);
            }
            Err(e) => return Err(AnalysisError::DecodingError(e.to_string())),
        }
    }

    if sample_rate == 0 {
        return Err(AnalysisError::DecodingError(
            "Unknown sample rate".to_string(),
        ));
    }

    log::debug!("Decoded {} mono samples at {} Hz", mono.len(), sample_rate);

    Ok((mono, sample_rate))
}

/// Load a time window of an audio file as a mono buffer at `target_rate`
///
/// # Arguments
///
/// * `path` - Path to audio file
/// * `start` - Window start in seconds (>= 0)
/// * `end` - Window end in seconds (> start)
/// * `target_rate` - Output sample rate in Hz
///
/// # Returns
///
/// The decoded window. A window lying past the end of the file yields an empty buffer;
/// callers decide whether that is an error.
///
/// # Errors
///
/// - `FileNotFound` if `path` is not an existing file
/// - `InvalidInput` if the window is not a finite, non-empty, non-negative range
/// - `DecodingError` if the file cannot be decoded
pub fn load_segment(
    path: &Path,
    start: f32,
    end: f32,
    target_rate: u32,
) -> Result<AudioBuffer, AnalysisError> {
    if !path.is_file() {
        return Err(AnalysisError::FileNotFound(path.to_path_buf()));
    }

    validate_window(start, end)?;

    let (samples, source_rate) = decode_audio(path)?;

    let first = ((start as f64) * source_rate as f64).round() as usize;
    let last = (((end as f64) * source_rate as f64).round() as usize).min(samples.len());
    let window = if first < last {
        &samples[first..last]
    } else {
        &[][..]
    };

    log::debug!(
        "Segment [{:.2}s, {:.2}s) -> {} samples at {} Hz",
        start,
        end,
        window.len(),
        source_rate
    );

    let resampled = resample_mono(window, source_rate, target_rate)?;
    Ok(AudioBuffer::new(resampled, target_rate))
}

fn validate_window(start: f32, end: f32) -> Result<(), AnalysisError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "Segment bounds must be finite: [{}, {}]",
            start, end
        )));
    }
    if start < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Segment start must be >= 0, got {}",
            start
        )));
    }
    if end <= start {
        return Err(AnalysisError::InvalidInput(format!(
            "Segment end ({}) must be greater than start ({})",
            end, start
        )));
    }
    Ok(())
}
