//! # Entity and Component Lifecycle Tests
//!
//! End-to-end checks of spawn, assign, despawn and compaction through the
//! public API:
//!
//! 1. **Generation safety**: reused slots never revive old handles
//! 2. **Compaction**: despawning any entity leaves every other row intact
//! 3. **Registry balance**: one destructor per live component definition
//!
//! Run with: cargo test --test lifecycle -- --nocapture

use std::collections::HashSet;
use std::rc::Rc;

use ember_core::{
    ComponentDefinition, EmberConfig, EmberError, Entity, EntityMgr, Quat, ScriptComponent,
    TransformComponent, UuidMgr, Vec3,
};

const COUNT: usize = 10;

/// Spawns `COUNT` entities with positions `(i, i, i)`.
fn spawn_positioned(
    entities: &mut EntityMgr,
    transforms: &mut TransformComponent,
) -> Vec<Entity> {
    (0..COUNT)
        .map(|i| {
            let e = entities.spawn_entity();
            let row = transforms.assign(e);
            #[allow(clippy::cast_precision_loss)]
            let value = i as f32;
            transforms.set_position(row, Vec3::splat(value)).unwrap();
            e
        })
        .collect()
}

// ============================================================================
// HANDLE SAFETY
// ============================================================================

#[test]
fn test_generation_safety_on_reuse() {
    let mut entities = EntityMgr::new();
    let old = entities.spawn_entity();
    assert!(entities.despawn_entity(old));

    let new = entities.spawn_entity();
    assert_eq!(new.index(), old.index());
    assert_ne!(new, old);
    assert!(!entities.is_alive(old));
    assert!(entities.is_alive(new));
}

#[test]
fn test_many_reuse_cycles_stay_distinct() {
    let mut entities = EntityMgr::new();
    let mut seen = HashSet::new();
    for _ in 0..1_000 {
        let e = entities.spawn_entity();
        assert!(seen.insert(e), "handle {e} issued twice");
        entities.despawn_entity(e);
    }
    assert_eq!(entities.capacity(), 1);
    assert_eq!(entities.alive_count(), 0);
}

#[test]
fn test_distinct_entities_get_distinct_instances() {
    let mut entities = EntityMgr::new();
    let mut transforms = TransformComponent::new(&entities);
    let spawned = spawn_positioned(&mut entities, &mut transforms);

    let rows: HashSet<_> = spawned.iter().map(|&e| transforms.lookup(e)).collect();
    assert_eq!(rows.len(), COUNT);
    assert!(rows.iter().all(|row| !row.is_invalid()));
}

// ============================================================================
// COMPACTION SCENARIOS
// ============================================================================

#[test]
fn test_despawn_middle_keeps_last_value() {
    let mut entities = EntityMgr::new();
    let mut transforms = TransformComponent::new(&entities);
    let spawned = spawn_positioned(&mut entities, &mut transforms);

    let tenth = spawned[9];
    let row = transforms.lookup(tenth);
    transforms.set_position(row, Vec3::splat(9001.0)).unwrap();

    entities.despawn_entity(spawned[4]);

    let row = transforms.lookup(tenth);
    assert_eq!(transforms.position(row), Some(Vec3::splat(9001.0)));
    assert_eq!(transforms.len(), COUNT - 1);
}

#[test]
fn test_despawn_last_keeps_neighbour() {
    let mut entities = EntityMgr::new();
    let mut transforms = TransformComponent::new(&entities);
    let spawned = spawn_positioned(&mut entities, &mut transforms);

    let before = transforms.len();
    entities.despawn_entity(spawned[9]);

    let row = transforms.lookup(spawned[8]);
    assert_eq!(transforms.position(row), Some(Vec3::splat(8.0)));
    assert_eq!(transforms.len(), before - 1);
}

#[test]
fn test_despawn_any_one_preserves_the_rest() {
    for victim in 0..COUNT {
        let mut entities = EntityMgr::new();
        let mut transforms = TransformComponent::new(&entities);
        let spawned = spawn_positioned(&mut entities, &mut transforms);

        entities.despawn_entity(spawned[victim]);

        for (i, &e) in spawned.iter().enumerate() {
            let row = transforms.lookup(e);
            if i == victim {
                assert!(row.is_invalid());
                continue;
            }
            assert!((row.index() as usize) < COUNT - 1);
            #[allow(clippy::cast_precision_loss)]
            let expected = Vec3::splat(i as f32);
            assert_eq!(transforms.position(row), Some(expected), "victim {victim}, entity {i}");
            assert_eq!(transforms.rotation(row), Some(Quat::IDENTITY));
        }
    }
}

#[test]
fn test_despawn_fans_out_to_every_definition() {
    let mut entities = EntityMgr::new();
    let mut transforms = TransformComponent::new(&entities);
    let mut scripts = ScriptComponent::new(&entities);
    let mut health: ComponentDefinition<(u32,)> = ComponentDefinition::new(&entities);

    let e = entities.spawn_entity();
    let keep = entities.spawn_entity();
    for target in [e, keep] {
        transforms.assign(target);
        scripts.assign(target);
        health.assign(target);
    }

    entities.despawn_entity(e);
    assert!(!transforms.contains(e));
    assert!(!scripts.contains(e));
    assert!(!health.contains(e));
    assert_eq!(transforms.entities(), vec![keep]);
    assert_eq!(scripts.entities(), vec![keep]);
    assert_eq!(health.entities(), vec![keep]);
}

#[test]
fn test_interleaved_churn_keeps_maps_consistent() {
    let mut entities = EntityMgr::new();
    let mut health: ComponentDefinition<(u32,)> = ComponentDefinition::new(&entities);
    let mut alive = Vec::new();

    for round in 0_u32..200 {
        let e = entities.spawn_entity();
        let row = health.assign(e);
        health.set::<0>(row, round).unwrap();
        alive.push((e, round));

        if round % 3 == 0 {
            let (victim, _) = alive.remove((round as usize * 7) % alive.len());
            entities.despawn_entity(victim);
        }
    }

    assert_eq!(health.len(), alive.len());
    for &(e, value) in &alive {
        let row = health.lookup(e);
        assert_eq!(health.entity_of(row), Some(e));
        assert_eq!(*health.get::<0>(row).unwrap(), value);
    }
}

#[test]
fn test_stale_instance_is_rejected_after_move() {
    let mut entities = EntityMgr::new();
    let mut transforms = TransformComponent::new(&entities);
    let spawned = spawn_positioned(&mut entities, &mut transforms);

    let held = transforms.lookup(spawned[9]);
    entities.despawn_entity(spawned[0]);

    assert!(!transforms.is_valid(held));
    assert_eq!(transforms.position(held), None);
    assert_eq!(
        transforms.set_position(held, Vec3::ZERO),
        Err(EmberError::StaleInstance(held))
    );
}

// ============================================================================
// DESTRUCTOR REGISTRY BALANCE
// ============================================================================

#[test]
fn test_definition_scope_brackets_registration() {
    let entities = EntityMgr::new();
    assert_eq!(entities.num_registered_destructors(), 0);
    {
        let _transforms = TransformComponent::new(&entities);
        assert_eq!(entities.num_registered_destructors(), 1);
    }
    assert_eq!(entities.num_registered_destructors(), 0);
}

#[test]
fn test_registry_tracks_live_definitions() {
    let entities = EntityMgr::new();
    let mut live: Vec<ComponentDefinition<(u8,)>> = Vec::new();

    for _ in 0..5 {
        live.push(ComponentDefinition::new(&entities));
        assert_eq!(entities.num_registered_destructors(), live.len());
    }
    live.remove(2);
    assert_eq!(entities.num_registered_destructors(), 4);
    live.clear();
    assert_eq!(entities.num_registered_destructors(), 0);
}

#[test]
fn test_manager_dropped_before_definition() {
    let uuids = Rc::new(UuidMgr::new());
    let mut entities = EntityMgr::with_uuids(Rc::clone(&uuids));
    let mut transforms = TransformComponent::new(&entities);
    let e = entities.spawn_entity();
    let row = transforms.assign(e);

    drop(entities);
    assert_eq!(transforms.position(row), Some(Vec3::ZERO));
    assert!(transforms.assign(e).is_invalid());
    drop(transforms);
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_config_drives_rejection_policy() {
    let config = EmberConfig::from_toml_str("entity_capacity = 8\ncomponent_capacity = 4").unwrap();
    let mut entities = EntityMgr::with_config(config, Rc::new(UuidMgr::new())).unwrap();
    let mut transforms = TransformComponent::new(&entities);

    let e = entities.spawn_entity();
    transforms.assign(e);
    assert!(transforms.assign(e).is_invalid());
    assert!(entities.despawn_entity(e));
    assert!(!entities.despawn_entity(e));
}

#[test]
#[should_panic(expected = "already assigned")]
fn test_strict_config_panics_on_double_assign() {
    let config = EmberConfig::from_toml_str("strict_handles = true").unwrap();
    let mut entities = EntityMgr::with_config(config, Rc::new(UuidMgr::new())).unwrap();
    let mut scripts = ScriptComponent::new(&entities);

    let e = entities.spawn_entity();
    scripts.assign(e);
    scripts.assign(e);
}
