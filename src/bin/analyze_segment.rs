//! Command-line entry point: analyze one segment and print a JSON record
//!
//! ```text
//! analyze-segment <audio_path> <start_time> <end_time> [beats_per_measure] [beats_to_group]
//! ```
//!
//! Prints `{"key", "confidence", "chords"}` or `{"error"}` to stdout and exits with 1 on
//! error. Logs go to stderr (`RUST_LOG`, default `warn`).

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use segment_harmony::{
    analyze_segment, AnalysisConfig, AnalysisResult, SegmentAnalyzer, TimeSignature,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Audio file to analyze
    audio_path: PathBuf,

    /// Segment start in seconds
    start_time: f32,

    /// Segment end in seconds
    end_time: f32,

    /// Notated beats per measure
    #[arg(default_value_t = 4)]
    beats_per_measure: u32,

    /// Beats per chord group (defaults to beats_per_measure)
    beats_to_group: Option<u32>,

    /// External neural chord recognizer program (lab output on stdout)
    #[cfg(feature = "ml")]
    #[arg(long)]
    recognizer: Option<PathBuf>,

    /// Argument passed to the recognizer before the audio path (repeatable)
    #[cfg(feature = "ml")]
    #[arg(long = "recognizer-arg", allow_hyphen_values = true)]
    recognizer_args: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let rendered = e.to_string();
            let reason = rendered
                .lines()
                .next()
                .unwrap_or("invalid arguments")
                .trim_start_matches("error: ")
                .to_string();
            return emit(&AnalysisResult::Error { error: reason });
        }
    };

    let result = run(&args).unwrap_or_else(|e| AnalysisResult::Error {
        error: e.to_string(),
    });
    emit(&result)
}

fn run(args: &Args) -> Result<AnalysisResult> {
    let time_signature = TimeSignature::new(
        args.beats_per_measure,
        args.beats_to_group.unwrap_or(args.beats_per_measure),
    )?;
    let analyzer = build_analyzer(args);

    log::debug!(
        "Analyzing {} [{:.2}s, {:.2}s) in {}",
        args.audio_path.display(),
        args.start_time,
        args.end_time,
        time_signature.name()
    );

    Ok(analyze_segment(
        &args.audio_path,
        args.start_time,
        args.end_time,
        time_signature,
        &analyzer,
    ))
}

#[cfg(feature = "ml")]
fn build_analyzer(args: &Args) -> SegmentAnalyzer {
    let analyzer = SegmentAnalyzer::new(AnalysisConfig::default());
    match &args.recognizer {
        Some(program) => analyzer.with_recognizer(Box::new(
            segment_harmony::ml::ExternalRecognizer::new(program)
                .with_args(args.recognizer_args.iter().cloned()),
        )),
        None => analyzer,
    }
}

#[cfg(not(feature = "ml"))]
fn build_analyzer(_args: &Args) -> SegmentAnalyzer {
    SegmentAnalyzer::new(AnalysisConfig::default())
}

fn emit(result: &AnalysisResult) -> ExitCode {
    match result.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            println!("{}", serde_json::json!({ "error": e.to_string() }));
            return ExitCode::FAILURE;
        }
    }

    if result.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
