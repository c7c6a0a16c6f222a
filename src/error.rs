//! Error types for the harmonic analysis engine

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during segment analysis
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    /// Source file does not exist
    #[error("Audio file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Requested window decoded to zero samples
    #[error("Audio segment is empty")]
    EmptySegment,

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Audio decoding error
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// Processing error during analysis
    #[error("Processing error: {0}")]
    ProcessingError(String),

    /// Chord backend fault (recovered by the backend ladder)
    #[error("Backend error: {0}")]
    BackendError(String),
}
