//! Benchmarks for the ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use leafsynth::dsp::{Adsr, EnvelopeGenerator};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Slow attack keeps the envelope in its ramp stage
        let mut env = Adsr::adsr(1.01, 0.005, 0.5, 0.2);
        env.init(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for _ in 0..size {
                    sum += env.process(black_box(true));
                }
                sum
            })
        });

        // Alternating gate, so every block crosses both edges
        let mut env = Adsr::adsr(0.001, 0.005, 0.5, 0.002);
        env.init(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("gate_cycle", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for i in 0..size {
                    sum += env.process(black_box(i < size / 2));
                }
                sum
            })
        });
    }

    group.finish();
}
