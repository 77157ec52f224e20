//! Benchmarks for reverb processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use leafsynth::dsp::{Reverberator, StereoReverb};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        // Generate a test signal (impulse-like with some content)
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0) // Initial impulse
                } else {
                    (i as f32 * 0.05).sin() * 0.1 // Quiet tail
                }
            })
            .collect();

        for (name, feedback) in [("leaves", 0.85), ("pluck", 0.95)] {
            let mut reverb = Box::new(StereoReverb::new(SAMPLE_RATE));
            reverb.set_feedback(feedback);
            reverb.set_lp_freq(5_000.0);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        let (l, r) = reverb.process(black_box(sample), black_box(sample));
                        sum += l + r;
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
