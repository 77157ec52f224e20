//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use leafsynth::dsp::{Oscillator, PolyOscillator, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn oscillator(waveform: Waveform) -> PolyOscillator {
    let mut osc = PolyOscillator::new(waveform);
    osc.init(SAMPLE_RATE);
    osc.set_freq(440.0);
    osc
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    let cases = [
        ("sine", Waveform::Sine),
        ("saw", Waveform::Saw),
        ("polyblep_saw", Waveform::PolyBlepSaw),
        ("polyblep_square", Waveform::PolyBlepSquare),
        // leaky integrator on top of the band-limited square
        ("polyblep_triangle", Waveform::PolyBlepTriangle),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in cases {
            let mut osc = oscillator(waveform);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = osc.process();
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
