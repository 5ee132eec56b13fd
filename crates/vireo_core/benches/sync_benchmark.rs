//! Configuration replay benchmarks
//!
//! Measures the cost of a full resynchronization pass and of single setter
//! dispatch over both transports, against the in-memory stubs.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parking_lot::RwLock;
use vireo_core::{
    sync, DspEngine, DspSettings, DummyCallbacks, LocalEngine, NotificationHub, RemoteEngine,
    StubDsp, StubHost,
};

fn configured_settings() -> DspSettings {
    let mut settings = DspSettings::default();
    settings.compressor.enabled = true;
    settings.bass_boost.enabled = true;
    settings.equalizer.enabled = true;
    settings.reverb.enabled = true;
    settings.reverb.preset = 3;
    settings.convolver.enabled = true;
    settings.convolver.impulse_response = vec![0.0; 4096];
    settings.convolver.channels = 2;
    settings
}

fn benchmark_full_replay_remote(c: &mut Criterion) {
    let host = StubHost::new();
    let hub = NotificationHub::new();
    let settings = Arc::new(RwLock::new(configured_settings()));
    let engine = RemoteEngine::new(
        Arc::new(host.clone()),
        0,
        0,
        Arc::clone(&settings),
        &hub,
        None,
    )
    .unwrap();

    c.bench_function("full_replay_remote", |b| {
        b.iter(|| {
            host.clear_writes();
            engine.sync(black_box(None));
        })
    });
}

fn benchmark_full_replay_local(c: &mut Criterion) {
    let hub = NotificationHub::new();
    let engine = LocalEngine::new(
        Arc::new(StubDsp::new()),
        Arc::new(DummyCallbacks),
        hub,
    )
    .unwrap();
    let settings = configured_settings();

    c.bench_function("full_replay_local", |b| {
        b.iter(|| {
            sync::apply(black_box(&engine), black_box(&settings), None);
        })
    });
}

fn benchmark_single_setter(c: &mut Criterion) {
    let host = StubHost::new();
    let hub = NotificationHub::new();
    let settings = Arc::new(RwLock::new(DspSettings::default()));
    let engine = RemoteEngine::new(Arc::new(host), 0, 0, settings, &hub, None).unwrap();

    c.bench_function("remote_reverb_setter", |b| {
        b.iter(|| {
            engine.set_reverb(black_box(true), black_box(5)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_full_replay_remote,
    benchmark_full_replay_local,
    benchmark_single_setter
);
criterion_main!(benches);
