//! Channel mixing utilities (multichannel to mono conversion)

/// Downmix interleaved samples to mono by averaging all channels
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (frame-major)
/// * `channels` - Number of channels in the stream
///
/// # Returns
///
/// Mono samples, one per complete frame. A trailing partial frame is dropped.
pub fn downmix_interleaved(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    let inv = 1.0 / channels as f32;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * inv)
        .collect()
}
