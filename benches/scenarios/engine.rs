//! Benchmarks for the complete engine: queue drain, voice pool, mix bus.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use leafsynth::{runtime::build_instrument, InstrumentConfig, LEAF_VOICES, PLUCK_VOICES};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];
        let mut interleaved = vec![0.0f32; size * 2];

        // === LEAVES, ALL SIX HELD ===
        // nine voices sounding (three leaves carry an upper note)
        let config = InstrumentConfig::leaves().with_sample_rate(SAMPLE_RATE);
        let (mut poller, mut engine) =
            build_instrument::<LEAF_VOICES>(&config).expect("valid preset");
        // raw sensor reading for a touched leaf
        let touched = [!config.input.invert_switches; 6];
        for _ in 0..config.input.debounce_polls {
            poller.poll_switches(&touched);
        }
        group.bench_with_input(BenchmarkId::new("leaves_held", size), &size, |b, _| {
            b.iter(|| {
                engine.render(black_box(&mut left), black_box(&mut right));
            })
        });

        // === PLUCK CHORD, INTERLEAVED ===
        // a note pair is queued every block, so the drain path is exercised too
        let config = InstrumentConfig::pluck().with_sample_rate(SAMPLE_RATE);
        let (mut poller, mut engine) =
            build_instrument::<PLUCK_VOICES>(&config).expect("valid preset");
        for note in [48u8, 52, 55, 60, 64, 67] {
            poller.handle_midi_bytes(&[0x90, note, 100]).expect("valid message");
        }
        group.bench_with_input(BenchmarkId::new("pluck_chord", size), &size, |b, _| {
            b.iter(|| {
                let _ = poller.handle_midi_bytes(&[0x90, 72, 100]);
                let _ = poller.handle_midi_bytes(&[0x80, 72, 0]);
                engine.render_interleaved(black_box(&mut interleaved), 2);
            })
        });
    }

    group.finish();
}
