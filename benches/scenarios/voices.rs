//! Benchmarks for single voices and full voice pools.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use leafsynth::{
    config::VoiceConfig, Voice, VoiceManager, LEAF_VOICES, PLUCK_VOICES,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn voice(config: VoiceConfig, note: f32) -> Voice {
    let mut voice = Voice::new(config);
    voice.init(SAMPLE_RATE);
    voice.on_note_on(note, 100.0);
    voice
}

/// A pool with every slot sounding.
fn full_pool<const N: usize>(config: VoiceConfig) -> VoiceManager<N> {
    let mut pool = VoiceManager::new(config);
    pool.init(SAMPLE_RATE);
    for i in 0..N {
        pool.note_on(48.0 + i as f32, 100.0);
    }
    pool
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === LEAF VOICE ===
        // sine → filter, with the pitch LFO retuning every sample
        let mut leaf = voice(VoiceConfig::leaves(), 65.0);
        group.bench_with_input(BenchmarkId::new("leaf_voice", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = leaf.process();
                }
                black_box(&buffer);
            })
        });

        // === PLUCK VOICE ===
        // band-limited triangle → driven filter, no LFO
        let mut pluck = voice(VoiceConfig::pluck(), 57.0);
        group.bench_with_input(BenchmarkId::new("pluck_voice", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = pluck.process();
                }
                black_box(&buffer);
            })
        });

        // === IDLE POOL ===
        // baseline: nothing sounding, every voice early-outs
        let mut idle: VoiceManager<PLUCK_VOICES> = VoiceManager::new(VoiceConfig::pluck());
        idle.init(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("idle_pool_24", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = idle.process();
                }
                black_box(&buffer);
            })
        });

        // === FULL POOLS ===
        // worst case for each build, every slot held
        let mut leaves = full_pool::<LEAF_VOICES>(VoiceConfig::leaves());
        group.bench_with_input(BenchmarkId::new("full_pool_18", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = leaves.process();
                }
                black_box(&buffer);
            })
        });

        let mut plucks = full_pool::<PLUCK_VOICES>(VoiceConfig::pluck());
        group.bench_with_input(BenchmarkId::new("full_pool_24", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = plucks.process();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
