//! Integration tests for multi-component views
//!
//! Tests join correctness across store-size skews, empty and missing
//! stores, and interplay with destruction.

use mosaic_foundation::Entity;
use mosaic_storage::EntityRegistry;

#[derive(Debug, Default)]
struct Position(u32);

#[derive(Debug, Default)]
struct Velocity(u32);

#[derive(Debug, Default)]
struct Renderable;

#[derive(Debug, Default)]
struct Frozen;

fn populated_registry() -> (EntityRegistry, Vec<Entity>) {
    let mut registry = EntityRegistry::new(32);
    let entities: Vec<_> = (0..10).map(|_| registry.create_entity().unwrap()).collect();

    // Positions everywhere, velocities on every second entity, renderables
    // on every third, one frozen entity.
    for (i, e) in entities.iter().enumerate() {
        registry.add_component(*e, Position(i as u32)).unwrap();
        if i % 2 == 0 {
            registry.add_component(*e, Velocity(1)).unwrap();
        }
        if i % 3 == 0 {
            registry.add_component(*e, Renderable).unwrap();
        }
    }
    registry.add_component(entities[6], Frozen).unwrap();

    (registry, entities)
}

// =============================================================================
// Join correctness
// =============================================================================

#[test]
fn pair_join_matches_manual_filtering() {
    let (registry, entities) = populated_registry();

    let expected: Vec<_> = entities.iter().copied().step_by(2).collect();
    let mut actual: Vec<_> = registry.view_of::<(Position, Velocity)>().collect();
    actual.sort_by_key(|e| e.id);

    assert_eq!(actual, expected);
}

#[test]
fn join_order_does_not_change_the_result_set() {
    let (registry, _) = populated_registry();

    let mut a: Vec<_> = registry
        .view_of::<(Position, Velocity, Renderable)>()
        .collect();
    let mut b: Vec<_> = registry
        .view_of::<(Renderable, Position, Velocity)>()
        .collect();
    let mut c: Vec<_> = registry
        .view_of::<(Velocity, Renderable, Position)>()
        .collect();
    a.sort_by_key(|e| e.id);
    b.sort_by_key(|e| e.id);
    c.sort_by_key(|e| e.id);

    assert_eq!(a, b);
    assert_eq!(b, c);
    // Multiples of 6 carry all three.
    let ids: Vec<_> = a.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![0, 6]);
}

#[test]
fn four_way_join_narrows_to_a_single_entity() {
    let (registry, entities) = populated_registry();

    let matched: Vec<_> = registry
        .view_of::<(Position, Velocity, Renderable, Frozen)>()
        .collect();
    assert_eq!(matched, vec![entities[6]]);
}

#[test]
fn view_yields_each_entity_at_most_once() {
    let (registry, _) = populated_registry();

    let ids: Vec<_> = registry
        .view_of::<(Position, Velocity)>()
        .map(|e| e.id)
        .collect();
    let mut deduped = ids.clone();
    deduped.sort_unstable();
    deduped.dedup();

    assert_eq!(ids.len(), deduped.len());
}

// =============================================================================
// Empty and missing stores
// =============================================================================

#[test]
fn unused_component_type_yields_an_empty_view() {
    let (registry, _) = populated_registry();

    #[derive(Debug)]
    struct NeverUsed;

    assert_eq!(registry.view_of::<(Position, NeverUsed)>().count(), 0);
}

#[test]
fn emptied_store_yields_an_empty_view() {
    let (mut registry, entities) = populated_registry();
    registry.remove_component::<Frozen>(entities[6]).unwrap();

    assert_eq!(registry.view_of::<(Position, Frozen)>().count(), 0);
}

#[test]
fn single_component_view_walks_the_whole_store() {
    let (registry, entities) = populated_registry();

    let all: Vec<_> = registry.view_of::<(Position,)>().collect();
    assert_eq!(all, entities);
}

// =============================================================================
// Interplay with destruction
// =============================================================================

#[test]
fn destroyed_entities_disappear_from_subsequent_views() {
    let (mut registry, entities) = populated_registry();

    registry.destroy_entity(entities[0]);
    registry.destroy_entity(entities[4]);

    let ids: Vec<_> = registry
        .view_of::<(Position, Velocity)>()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![entities[2].id, entities[6].id, entities[8].id]);
}

#[test]
fn destroying_unrelated_entities_is_invisible_to_the_join() {
    let (mut registry, entities) = populated_registry();

    let before: Vec<_> = registry.view_of::<(Position, Velocity)>().collect();
    // Entity 1 has no velocity, so the pair view never contained it.
    registry.destroy_entity(entities[1]);
    let after: Vec<_> = registry.view_of::<(Position, Velocity)>().collect();

    assert_eq!(before, after);
}
