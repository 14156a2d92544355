//! # Decision Cache Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use arm_if::ctrl::{ActionLabel, ArmState};
use arm_if::sense::{PerceptionSnapshot, SensId, SensorReadings};
use arm_lib::act_ctrl::{CacheKey, DecisionCache};
use std::time::{Duration, Instant};

fn snapshot(distance: f64, position: f64) -> PerceptionSnapshot {
    let mut readings = SensorReadings::new();
    readings.insert(SensId::Distance, Some(distance));
    readings.insert(SensId::WristPosition, Some(position));
    PerceptionSnapshot::new(ArmState::Waiting, readings)
}

fn decision_cache_benchmark(c: &mut Criterion) {
    let now = Instant::now();

    // ---- Populate a cache with a spread of quantized keys ----

    let mut cache = DecisionCache::new(Duration::from_secs(300));

    for i in 0..10_000 {
        let key = CacheKey::from_snapshot(&snapshot(i as f64 * 0.37, i as f64 * 0.011), 2);
        cache.put(key, ActionLabel::Wait, now);
    }

    let hot_key = CacheKey::from_snapshot(&snapshot(450.0, -2.38), 2);
    cache.put(hot_key.clone(), ActionLabel::Grasp, now);

    // ---- Benches ----

    c.bench_function("cache_key_from_snapshot", |b| {
        let snap = snapshot(899.996, 0.1204);
        b.iter(|| CacheKey::from_snapshot(&snap, 2))
    });

    c.bench_function("decision_cache_get", |b| {
        b.iter(|| cache.get(&hot_key, now))
    });
}

criterion_group!(benches, decision_cache_benchmark);
criterion_main!(benches);
