//! Configuration parameters for segment analysis

/// Analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // Loading
    /// Sample rate every decoded segment is resampled to (default: 44100)
    pub sample_rate: u32,

    // STFT parameters
    /// Frame size for chroma STFT (default: 8192)
    ///
    /// Large frames are needed to separate neighbouring semitones in the bass register.
    pub frame_size: usize,

    /// Hop size for chroma STFT and onset envelope (default: 512)
    pub hop_size: usize,

    // Chroma
    /// Lowest frequency folded into chroma (default: 65.41 Hz, C2)
    pub min_frequency: f32,

    /// Highest frequency folded into chroma (default: 2093.0 Hz, C7)
    pub max_frequency: f32,

    // Tempo
    /// Frame size for the RMS onset envelope (default: 2048)
    pub onset_frame_size: usize,

    /// Minimum BPM to consider (default: 40.0)
    pub min_bpm: f32,

    /// Maximum BPM to consider (default: 240.0)
    pub max_bpm: f32,

    /// Centre of the log-normal tempo prior (default: 120.0)
    pub tempo_prior_bpm: f32,

    /// Tempo used when none can be estimated, e.g. on silence (default: 120.0)
    pub default_tempo: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            frame_size: 8192,
            hop_size: 512,
            min_frequency: 65.41,
            max_frequency: 2093.0,
            onset_frame_size: 2048,
            min_bpm: 40.0,
            max_bpm: 240.0,
            tempo_prior_bpm: 120.0,
            default_tempo: 120.0,
        }
    }
}
