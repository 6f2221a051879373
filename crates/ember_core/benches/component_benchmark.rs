//! # Component Storage Benchmark
//!
//! Measures the hot operations of the entity manager and SoA component
//! storage, and compares a dense column sweep against a plain
//! array-of-structs layout.
//!
//! Compares:
//! 1. Spawn / despawn throughput
//! 2. Assign, field set and field get through instances
//! 3. Despawn compaction cost
//! 4. SoA column sweep vs AoS sweep

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ember_core::{EntityMgr, Quat, TransformComponent, Vec3};

const ENTITY_COUNT: usize = 100_000;

fn populated() -> (EntityMgr, TransformComponent, Vec<ember_core::Entity>) {
    let mut entities = EntityMgr::new();
    let mut transforms = TransformComponent::new(&entities);
    let spawned: Vec<_> = (0..ENTITY_COUNT)
        .map(|i| {
            let e = entities.spawn_entity();
            let row = transforms.assign(e);
            let _ = transforms.set_position(row, Vec3::splat(i as f32));
            e
        })
        .collect();
    (entities, transforms, spawned)
}

// =============================================================================
// ENTITY LIFECYCLE
// =============================================================================

fn bench_spawn(c: &mut Criterion) {
    c.bench_function("spawn_100k", |b| {
        b.iter_batched(
            EntityMgr::new,
            |mut entities| {
                for _ in 0..ENTITY_COUNT {
                    black_box(entities.spawn_entity());
                }
                entities
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_spawn_despawn_reuse(c: &mut Criterion) {
    let mut entities = EntityMgr::new();
    c.bench_function("spawn_despawn_reuse", |b| {
        b.iter(|| {
            let e = entities.spawn_entity();
            black_box(entities.despawn_entity(e))
        });
    });
}

// =============================================================================
// COMPONENT ACCESS
// =============================================================================

fn bench_assign(c: &mut Criterion) {
    c.bench_function("assign_100k", |b| {
        b.iter_batched(
            || {
                let mut entities = EntityMgr::new();
                let spawned: Vec<_> = (0..ENTITY_COUNT).map(|_| entities.spawn_entity()).collect();
                (entities, spawned)
            },
            |(entities, spawned)| {
                let mut transforms = TransformComponent::new(&entities);
                for &e in &spawned {
                    black_box(transforms.assign(e));
                }
                (transforms, entities)
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_set_get(c: &mut Criterion) {
    let (_entities, mut transforms, spawned) = populated();
    let rows: Vec<_> = spawned.iter().map(|&e| transforms.lookup(e)).collect();

    c.bench_function("set_position_100k", |b| {
        b.iter(|| {
            for &row in &rows {
                let _ = transforms.set_position(row, Vec3::splat(1.0));
            }
        });
    });

    c.bench_function("lookup_get_position_100k", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for &e in &spawned {
                if let Some(p) = transforms.position(transforms.lookup(e)) {
                    sum += p.x;
                }
            }
            black_box(sum)
        });
    });
}

fn bench_despawn_compaction(c: &mut Criterion) {
    c.bench_function("despawn_front_to_back_100k", |b| {
        b.iter_batched(
            populated,
            |(mut entities, transforms, spawned)| {
                // Every removal moves the last row to the front.
                for &e in &spawned {
                    entities.despawn_entity(e);
                }
                (entities, transforms)
            },
            BatchSize::LargeInput,
        );
    });
}

// =============================================================================
// SOA VS AOS BASELINE
// =============================================================================

#[derive(Clone, Copy, Default)]
struct GameObject {
    position: Vec3,
    rotation: Quat,
    _name: [u8; 32],
}

fn bench_sweep(c: &mut Criterion) {
    let (_entities, transforms, _spawned) = populated();
    c.bench_function("soa_position_sweep_100k", |b| {
        b.iter(|| {
            let sum: f32 = transforms.positions().iter().map(|p| p.x + p.y + p.z).sum();
            black_box(sum)
        });
    });

    let objects: Vec<GameObject> = (0..ENTITY_COUNT)
        .map(|i| GameObject {
            position: Vec3::splat(i as f32),
            ..GameObject::default()
        })
        .collect();
    c.bench_function("aos_position_sweep_100k", |b| {
        b.iter(|| {
            let sum: f32 = objects
                .iter()
                .map(|o| o.position.x + o.position.y + o.position.z + o.rotation.w * 0.0)
                .sum();
            black_box(sum)
        });
    });
}

criterion_group!(
    benches,
    bench_spawn,
    bench_spawn_despawn_reuse,
    bench_assign,
    bench_set_get,
    bench_despawn_compaction,
    bench_sweep,
);
criterion_main!(benches);
