//! External chord recognizer process
//!
//! Runs a recognizer program (e.g. madmom's `CNNChordRecognition single`) on a temporary
//! WAV copy of the buffer and reads `.lab` lines (`<start> <end> <label>`) from stdout.

use super::recognizer::{ChordRecognizer, ChordSpan};
use crate::error::AnalysisError;
use crate::io::AudioBuffer;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Chord recognizer backed by an external program
#[derive(Debug, Clone)]
pub struct ExternalRecognizer {
    program: PathBuf,
    args: Vec<String>,
    name: String,
}

impl ExternalRecognizer {
    /// Create a recognizer for `program` (a path or a name looked up on `PATH`)
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());
        Self {
            program,
            args: Vec::new(),
            name,
        }
    }

    /// Arguments passed before the WAV path
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Program path or name
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn resolve_program(&self) -> Option<PathBuf> {
        if self.program.components().count() > 1 {
            return self.program.is_file().then(|| self.program.clone());
        }
        let path_var = std::env::var_os("PATH")?;
        std::env::split_paths(&path_var)
            .map(|dir| dir.join(&self.program))
            .find(|candidate| candidate.is_file())
    }
}

impl ChordRecognizer for ExternalRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.resolve_program().is_some()
    }

    fn recognize(&self, buffer: &AudioBuffer) -> Result<Vec<ChordSpan>, AnalysisError> {
        let program = self.resolve_program().ok_or_else(|| {
            AnalysisError::BackendError(format!(
                "Recognizer not found: {}",
                self.program.display()
            ))
        })?;

        let wav = write_temp_wav(buffer)?;
        log::debug!(
            "Running {} on {} ({} samples)",
            program.display(),
            wav.path().display(),
            buffer.len()
        );

        let output = Command::new(&program)
            .args(&self.args)
            .arg(wav.path())
            .output()
            .map_err(|e| {
                AnalysisError::BackendError(format!("Failed to run {}: {}", self.name, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnalysisError::BackendError(format!(
                "{} exited with {}: {}",
                self.name,
                output.status,
                stderr.trim()
            )));
        }

        parse_lab(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Write the buffer to a temporary mono 32-bit float WAV file
///
/// The file is removed when the returned handle is dropped.
fn write_temp_wav(buffer: &AudioBuffer) -> Result<tempfile::NamedTempFile, AnalysisError> {
    let mut file = tempfile::Builder::new()
        .prefix("segment-harmony-")
        .suffix(".wav")
        .tempfile()
        .map_err(wav_error)?;

    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    {
        let mut writer = WavWriter::new(BufWriter::new(file.as_file_mut()), spec)
            .map_err(wav_error)?;
        for &sample in buffer.samples() {
            writer.write_sample(sample).map_err(wav_error)?;
        }
        writer.finalize().map_err(wav_error)?;
    }

    Ok(file)
}

fn wav_error(e: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::BackendError(format!("Failed to write temporary WAV: {}", e))
}

/// Parse `.lab` text: one `<start> <end> <label>` span per line
///
/// Blank lines and `#` comments are skipped.
///
/// # Errors
///
/// Returns `AnalysisError::BackendError` for a malformed line
pub fn parse_lab(text: &str) -> Result<Vec<ChordSpan>, AnalysisError> {
    let mut spans = Vec::new();

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || {
            AnalysisError::BackendError(format!(
                "Malformed recognizer output on line {}: {:?}",
                number + 1,
                line
            ))
        };

        let mut fields = line.split_whitespace();
        let start: f32 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(malformed)?;
        let end: f32 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(malformed)?;
        let label = fields.collect::<Vec<_>>().join(" ");

        if label.is_empty() || !start.is_finite() || !end.is_finite() || end < start {
            return Err(malformed());
        }

        spans.push(ChordSpan::new(start, end, label));
    }

    Ok(spans)
}
