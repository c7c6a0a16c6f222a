//! Integration tests for segment analysis
//!
//! Fixtures are synthesised at runtime into temporary directories.

use segment_harmony::io::decoder::load_segment;
use segment_harmony::{analyze_segment, AnalysisResult, Key, SegmentAnalyzer, TimeSignature};
use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::process::Command;

/// C3, E3, G3 and C4 sustained together
const C_MAJOR_TRIAD_HZ: [f32; 4] = [130.81, 164.81, 196.00, 261.63];

/// A2, C3, E3 and A3 sustained together
const A_MINOR_TRIAD_HZ: [f32; 4] = [110.00, 130.81, 164.81, 220.00];

fn chord_samples(freqs: &[f32], seconds: f32, sample_rate: u32) -> Vec<f32> {
    let count = (seconds * sample_rate as f32) as usize;
    let gain = 0.8 / freqs.len() as f32;
    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            freqs.iter().map(|f| (2.0 * PI * f * t).sin()).sum::<f32>() * gain
        })
        .collect()
}

/// Write mono samples as 16-bit PCM, duplicating into every channel
fn write_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        let value = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(value).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn fixture(
    dir: &tempfile::TempDir,
    name: &str,
    freqs: &[f32],
    seconds: f32,
    sample_rate: u32,
    channels: u16,
) -> PathBuf {
    let path = dir.path().join(name);
    let samples = chord_samples(freqs, seconds, sample_rate);
    write_wav(&path, &samples, sample_rate, channels);
    path
}

/// 16-bit mono PCM WAV whose header declares a 0 Hz sample rate
fn write_zero_rate_wav(path: &Path) {
    let data: Vec<u8> = (0..2000i16).flat_map(|i| (i * 16).to_le_bytes()).collect();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // channels
    bytes.extend_from_slice(&0u32.to_le_bytes()); // sample rate
    bytes.extend_from_slice(&0u32.to_le_bytes()); // byte rate
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&data);
    std::fs::write(path, bytes).unwrap();
}

fn expect_success(result: AnalysisResult) -> segment_harmony::HarmonicAnalysis {
    match result {
        AnalysisResult::Success(analysis) => analysis,
        AnalysisResult::Error { error } => panic!("analysis failed: {}", error),
    }
}

fn expect_error(result: AnalysisResult) -> String {
    match result {
        AnalysisResult::Error { error } => error,
        AnalysisResult::Success(analysis) => panic!("expected error, got {:?}", analysis),
    }
}

#[test]
fn test_c_major_triad() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "c_major.wav", &C_MAJOR_TRIAD_HZ, 6.0, 44100, 1);

    let analysis = expect_success(analyze_segment(
        &path,
        0.0,
        4.0,
        TimeSignature::default(),
        &SegmentAnalyzer::default(),
    ));

    assert_eq!(analysis.key, Key::Major(0));
    assert!(analysis.confidence > 0.5 && analysis.confidence <= 1.0);
    assert!(!analysis.chords.is_empty());
    for chord in &analysis.chords {
        assert_eq!(chord.chord, "C");
        assert!(chord.start >= 0.0 && chord.end <= 4.0 && chord.end > chord.start);
    }
}

#[test]
fn test_a_minor_triad_chords() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "a_minor.wav", &A_MINOR_TRIAD_HZ, 4.0, 44100, 1);

    let analysis = expect_success(analyze_segment(
        &path,
        0.0,
        4.0,
        TimeSignature::default(),
        &SegmentAnalyzer::default(),
    ));

    assert!(!analysis.chords.is_empty());
    assert!(analysis.chords.iter().all(|c| c.chord == "Am"));
}

#[test]
fn test_segment_offset_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "offset.wav", &C_MAJOR_TRIAD_HZ, 8.0, 44100, 1);

    let analysis = expect_success(analyze_segment(
        &path,
        3.0,
        7.0,
        TimeSignature::default(),
        &SegmentAnalyzer::default(),
    ));

    let first = &analysis.chords[0];
    assert!((first.start - 3.0).abs() < 1e-4);
    let last = analysis.chords.last().unwrap();
    assert!(last.end <= 7.0 + 1e-4);
}

#[test]
fn test_stereo_and_resampled_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "stereo_22k.wav", &C_MAJOR_TRIAD_HZ, 3.0, 22050, 2);

    let buffer = load_segment(&path, 0.5, 2.5, 44100).unwrap();
    assert_eq!(buffer.sample_rate(), 44100);
    assert!((buffer.duration() - 2.0).abs() < 0.01);

    let analysis = expect_success(analyze_segment(
        &path,
        0.0,
        3.0,
        TimeSignature::default(),
        &SegmentAnalyzer::default(),
    ));
    assert_eq!(analysis.key, Key::Major(0));
}

#[test]
fn test_silent_segment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silence.wav");
    write_wav(&path, &vec![0.0; 44100 * 3], 44100, 1);

    let analysis = expect_success(analyze_segment(
        &path,
        0.0,
        3.0,
        TimeSignature::default(),
        &SegmentAnalyzer::default(),
    ));
    assert!(analysis.chords.is_empty());
    assert_eq!(analysis.confidence, 0.0);
}

#[test]
fn test_missing_file() {
    let error = expect_error(analyze_segment(
        "/no/such/file.wav",
        0.0,
        1.0,
        TimeSignature::default(),
        &SegmentAnalyzer::default(),
    ));
    assert_eq!(error, "Audio file not found: /no/such/file.wav");
}

#[test]
fn test_window_past_end_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "short.wav", &C_MAJOR_TRIAD_HZ, 1.0, 44100, 1);

    let error = expect_error(analyze_segment(
        &path,
        5.0,
        6.0,
        TimeSignature::default(),
        &SegmentAnalyzer::default(),
    ));
    assert_eq!(error, "Audio segment is empty");
}

#[test]
fn test_invalid_window() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "window.wav", &C_MAJOR_TRIAD_HZ, 1.0, 44100, 1);

    let error = expect_error(analyze_segment(
        &path,
        0.8,
        0.2,
        TimeSignature::default(),
        &SegmentAnalyzer::default(),
    ));
    assert!(error.starts_with("Invalid input"), "{}", error);
}

#[test]
fn test_zero_sample_rate_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero_rate.wav");
    write_zero_rate_wav(&path);

    let error = expect_error(analyze_segment(
        &path,
        0.0,
        1.0,
        TimeSignature::default(),
        &SegmentAnalyzer::default(),
    ));
    assert!(error.starts_with("Decoding error"), "{}", error);
}

#[test]
fn test_repeatable_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "repeat.wav", &A_MINOR_TRIAD_HZ, 3.0, 44100, 1);
    let analyzer = SegmentAnalyzer::default();
    let ts = TimeSignature::new(6, 3).unwrap();

    let a = analyze_segment(&path, 0.0, 3.0, ts, &analyzer).to_json().unwrap();
    let b = analyze_segment(&path, 0.0, 3.0, ts, &analyzer).to_json().unwrap();
    assert_eq!(a, b);

    let value: serde_json::Value = serde_json::from_str(&a).unwrap();
    assert!(value.get("key").is_some());
    assert!(value.get("error").is_none());
}

#[test]
fn test_cli_error_record() {
    let output = Command::new(env!("CARGO_BIN_EXE_analyze-segment"))
        .args(["/no/such/file.wav", "0", "5"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error"], "Audio file not found: /no/such/file.wav");
}

#[test]
fn test_cli_malformed_file_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero_rate.wav");
    write_zero_rate_wav(&path);

    let output = Command::new(env!("CARGO_BIN_EXE_analyze-segment"))
        .arg(&path)
        .args(["0", "1"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["error"].as_str().unwrap().starts_with("Decoding error"));
}

#[test]
fn test_cli_success_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "cli.wav", &C_MAJOR_TRIAD_HZ, 3.0, 44100, 1);

    let output = Command::new(env!("CARGO_BIN_EXE_analyze-segment"))
        .arg(&path)
        .args(["0", "3", "3"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["key"], "C major");
    assert!(value["chords"].is_array());
}

#[test]
fn test_cli_rejects_zero_group() {
    let output = Command::new(env!("CARGO_BIN_EXE_analyze-segment"))
        .args(["song.wav", "0", "5", "4", "0"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["error"].as_str().unwrap().contains("beats_to_group"));
}
