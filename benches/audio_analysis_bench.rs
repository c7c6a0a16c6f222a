//! Performance benchmarks for segment analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use segment_harmony::features::chroma::extractor::extract_chroma;
use segment_harmony::{AnalysisConfig, AudioBuffer, SegmentAnalyzer, TimeSignature};

/// 30 seconds cycling C -> G -> Am -> F, two seconds per chord
fn progression(sample_rate: u32) -> Vec<f32> {
    let chords: [[f32; 3]; 4] = [
        [261.63, 329.63, 392.00],
        [196.00, 246.94, 293.66],
        [220.00, 261.63, 329.63],
        [174.61, 220.00, 261.63],
    ];
    (0..sample_rate as usize * 30)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let chord = &chords[(t / 2.0) as usize % chords.len()];
            chord
                .iter()
                .map(|f| (2.0 * std::f32::consts::PI * f * t).sin())
                .sum::<f32>()
                * 0.25
        })
        .collect()
}

fn bench_analyze_buffer(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let buffer = AudioBuffer::new(progression(config.sample_rate), config.sample_rate);
    let analyzer = SegmentAnalyzer::new(config);

    c.bench_function("analyze_buffer_30s", |b| {
        b.iter(|| {
            let _ = analyzer.analyze_buffer(black_box(&buffer), 0.0, TimeSignature::default());
        });
    });
}

fn bench_extract_chroma(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let samples = progression(config.sample_rate);

    c.bench_function("extract_chroma_30s", |b| {
        b.iter(|| {
            let _ = extract_chroma(
                black_box(&samples),
                config.sample_rate,
                config.frame_size,
                config.hop_size,
                config.min_frequency,
                config.max_frequency,
            );
        });
    });
}

criterion_group!(benches, bench_analyze_buffer, bench_extract_chroma);
criterion_main!(benches);
