//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use leafsynth::dsp::{Filter, Svf};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn filter(cutoff_hz: f32, resonance: f32, drive: f32) -> Svf {
    let mut filter = Svf::default();
    filter.init(SAMPLE_RATE);
    filter.set_freq(cutoff_hz);
    filter.set_res(resonance);
    filter.set_drive(drive);
    filter
}

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Clean lowpass
        let mut clean = filter(1_000.0, 0.5, 0.0);
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    clean.process(black_box(sample));
                    sum += clean.low();
                }
                sum
            })
        });

        // Leaf voice settings, saturation on
        let mut driven = filter(6_000.0, 0.6, 0.8);
        group.bench_with_input(BenchmarkId::new("driven", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    driven.process(black_box(sample));
                    sum += driven.low();
                }
                sum
            })
        });
    }

    group.finish();
}
