//! Jimbruz Benchmark Suite
//!
//! Measures the two costs that grow with use:
//!   stat operations ............. pure arithmetic plus one memory append
//!   memory_log_append_200 ...... full read-modify-write of a 200-entry file
//!   memory_log_recent_6_of_200 . context lookup before every `ask`

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use jimbruz_core::config::JimbruzConfig;
use jimbruz_core::memory::MemoryLog;
use jimbruz_core::pet::Pet;
use jimbruz_core::types::PetState;

fn populated_log(dir: &tempfile::TempDir, entries: usize) -> MemoryLog {
    let mut log = MemoryLog::open(dir.path().join("memories.json")).expect("open");
    for i in 0..entries {
        log.append(format!("Interaction number {i} in the snowfield"))
            .expect("append");
    }
    log
}

/// Benchmark: mood derivation alone (no I/O).
fn bench_mood(c: &mut Criterion) {
    let state = PetState::new(4.0, 6.5, 5.9);
    c.bench_function("mood_from_state", |b| {
        b.iter(|| black_box(black_box(state).mood()));
    });
}

/// Benchmark: one full feed on a fresh pet (stat update + memory append).
fn bench_feed(c: &mut Criterion) {
    c.bench_function("pet_feed_fresh", |b| {
        b.iter_batched(
            || {
                let dir = tempfile::tempdir().expect("tempdir");
                let mut config = JimbruzConfig::default();
                config.storage.data_dir = dir.path().to_path_buf();
                let pet = Pet::open_with_rng(&config, StdRng::seed_from_u64(7)).expect("open");
                (dir, pet)
            },
            |(_dir, mut pet)| black_box(pet.feed()),
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: append to a 200-entry log.
fn bench_append(c: &mut Criterion) {
    c.bench_function("memory_log_append_200", |b| {
        b.iter_batched(
            || {
                let dir = tempfile::tempdir().expect("tempdir");
                let log = populated_log(&dir, 200);
                (dir, log)
            },
            |(_dir, mut log)| black_box(log.append("Slept; energy restored.").expect("append")),
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: last 6 notes out of 200.
fn bench_recent(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = populated_log(&dir, 200);
    c.bench_function("memory_log_recent_6_of_200", |b| {
        b.iter(|| black_box(log.recent(black_box(6))));
    });
}

criterion_group!(benches, bench_mood, bench_feed, bench_append, bench_recent);
criterion_main!(benches);
