//! Integration tests for the registry facade
//!
//! Tests cascade destruction, lifecycle hooks, deferred building, and a
//! full end-to-end lifecycle scenario, plus randomized churn.

use std::cell::RefCell;
use std::rc::Rc;

use mosaic_foundation::{Entity, ErrorKind};
use mosaic_storage::EntityRegistry;
use proptest::prelude::*;

#[derive(Debug, PartialEq, Default, Clone, Copy)]
struct Position(i64);

#[derive(Debug, PartialEq, Default)]
struct Hitpoints(u32);

#[derive(Debug, Default)]
struct Marker;

// =============================================================================
// End-to-end lifecycle
// =============================================================================

#[test]
fn full_lifecycle_scenario() {
    let mut registry = EntityRegistry::new(3);

    let e1 = registry.create_entity().unwrap();
    let e2 = registry.create_entity().unwrap();
    let e3 = registry.create_entity().unwrap();
    assert!(matches!(
        registry.create_entity().unwrap_err().kind,
        ErrorKind::CapacityExceeded { capacity: 3 }
    ));

    registry.add_component(e1, Position(1)).unwrap();
    registry.add_component(e3, Position(1)).unwrap();

    let positioned: Vec<_> = registry.view_of::<(Position,)>().collect();
    assert_eq!(positioned, vec![e1, e3]);

    // e2 never had a position, so destroying it leaves the view alone.
    registry.destroy_entity(e2);
    let positioned: Vec<_> = registry.view_of::<(Position,)>().collect();
    assert_eq!(positioned, vec![e1, e3]);

    registry.destroy_entity(e1);
    let positioned: Vec<_> = registry.view_of::<(Position,)>().collect();
    assert_eq!(positioned, vec![e3]);

    // Capacity was freed; the oldest freed slot (e2's) is recycled with a
    // bumped generation.
    let recycled = registry.create_entity().unwrap();
    assert_eq!(recycled, Entity::new(2, 1));
    assert!(!registry.is_alive(e1));
    assert!(!registry.is_alive(e2));
}

// =============================================================================
// Cascade destruction
// =============================================================================

#[test]
fn destroy_purges_every_component_type() {
    let mut registry = EntityRegistry::new(4);
    let e = registry.create_entity().unwrap();
    registry.add_component(e, Position(1)).unwrap();
    registry.add_component(e, Hitpoints(20)).unwrap();
    registry.add_component(e, Marker).unwrap();

    registry.destroy_entity(e);

    assert!(matches!(
        registry.has_component::<Position>(e).unwrap_err().kind,
        ErrorKind::EntityNotFound(_)
    ));
    for store in registry.stores() {
        assert!(!store.has(e));
        assert_eq!(store.len(), 0);
    }
}

#[test]
fn reused_slot_starts_without_components() {
    let mut registry = EntityRegistry::new(1);
    let first = registry.create_entity().unwrap();
    registry.add_component(first, Position(9)).unwrap();
    registry.destroy_entity(first);

    let second = registry.create_entity().unwrap();
    assert_eq!(second.id, first.id);
    assert!(!registry.has_component::<Position>(second).unwrap());
}

// =============================================================================
// Hooks
// =============================================================================

#[test]
fn lifecycle_hooks_bracket_creation_and_destruction() {
    let mut registry = EntityRegistry::new(4);
    let events = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&events);
    registry.on_entity_creating(move |r| log.borrow_mut().push(("creating", r.is_alive())));
    let log = Rc::clone(&events);
    registry.on_entity_created(move |r| log.borrow_mut().push(("created", r.is_alive())));
    let log = Rc::clone(&events);
    registry.on_entity_deleting(move |r| log.borrow_mut().push(("deleting", r.is_alive())));
    let log = Rc::clone(&events);
    registry.on_entity_deleted(move |_| log.borrow_mut().push(("deleted", false)));

    let e = registry.create_entity().unwrap();
    registry.destroy_entity(e);

    assert_eq!(
        &*events.borrow(),
        &[
            ("creating", true),
            ("created", true),
            ("deleting", true),
            ("deleted", false),
        ]
    );
}

#[test]
fn deleting_observers_read_doomed_data_deleted_observers_cannot() {
    let mut registry = EntityRegistry::new(4);
    let doomed_position = Rc::new(RefCell::new(None));

    let seen = Rc::clone(&doomed_position);
    registry.on_entity_deleting(move |r| {
        *seen.borrow_mut() = r.try_get::<Position>().unwrap().copied();
    });
    registry.on_entity_deleted(move |entity| {
        // By now the entity is gone; only the bare handle remains.
        assert!(!entity.is_null());
    });

    let e = registry.create_entity().unwrap();
    registry.add_component(e, Position(77)).unwrap();
    registry.destroy_entity(e);

    assert_eq!(*doomed_position.borrow(), Some(Position(77)));
}

// =============================================================================
// Deferred building
// =============================================================================

#[test]
fn built_entities_are_announced_fully_assembled() {
    let mut registry = EntityRegistry::new(4);
    let announced = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&announced);
    registry.on_entity_created(move |r| {
        let position = r.try_get::<Position>().unwrap().copied();
        let hitpoints = r.has::<Hitpoints>().unwrap();
        log.borrow_mut().push((r.entity(), position, hitpoints));
    });

    let mut builder = registry.build_entity().unwrap();
    builder.add(Position(5)).unwrap();
    builder.add(Hitpoints(3)).unwrap();
    let e = builder.finish();

    assert_eq!(&*announced.borrow(), &[(e, Some(Position(5)), true)]);
}

#[test]
fn finishing_twice_is_impossible_and_dropping_after_finish_is_quiet() {
    let mut registry = EntityRegistry::new(4);
    let count = Rc::new(RefCell::new(0));

    let n = Rc::clone(&count);
    registry.on_entity_created(move |_| *n.borrow_mut() += 1);

    let builder = registry.build_entity().unwrap();
    let _entity = builder.finish();

    assert_eq!(*count.borrow(), 1);
}

// =============================================================================
// Randomized churn
// =============================================================================

#[derive(Debug, Clone)]
enum Churn {
    Create,
    Destroy(usize),
    Attach(usize),
    Detach(usize),
}

fn churn_strategy() -> impl Strategy<Value = Churn> {
    prop_oneof![
        Just(Churn::Create),
        (0usize..16).prop_map(Churn::Destroy),
        (0usize..16).prop_map(Churn::Attach),
        (0usize..16).prop_map(Churn::Detach),
    ]
}

proptest! {
    /// Arbitrary create/destroy/attach/detach interleavings keep the
    /// registry's answers consistent with a naive model.
    #[test]
    fn registry_survives_arbitrary_churn(
        ops in proptest::collection::vec(churn_strategy(), 1..120)
    ) {
        let mut registry = EntityRegistry::new(16);
        let mut live: Vec<Entity> = Vec::new();
        let mut attached: Vec<Entity> = Vec::new();

        for op in ops {
            match op {
                Churn::Create => {
                    if live.len() < registry.capacity() {
                        live.push(registry.create_entity().unwrap());
                    } else {
                        prop_assert!(registry.create_entity().is_err());
                    }
                }
                Churn::Destroy(i) if !live.is_empty() => {
                    let victim = live.remove(i % live.len());
                    prop_assert!(registry.destroy_entity(victim));
                    prop_assert!(!registry.destroy_entity(victim));
                    attached.retain(|e| *e != victim);
                }
                Churn::Attach(i) if !live.is_empty() => {
                    let target = live[i % live.len()];
                    let result = registry.add_component(target, Position(1));
                    if attached.contains(&target) {
                        prop_assert!(result.is_err());
                    } else {
                        prop_assert!(result.is_ok());
                        attached.push(target);
                    }
                }
                Churn::Detach(i) if !live.is_empty() => {
                    let target = live[i % live.len()];
                    let removed = registry.remove_component::<Position>(target).unwrap();
                    prop_assert_eq!(removed, attached.contains(&target));
                    attached.retain(|e| *e != target);
                }
                Churn::Destroy(_) | Churn::Attach(_) | Churn::Detach(_) => {}
            }

            prop_assert_eq!(registry.entity_count(), live.len());
            let mut viewed: Vec<_> = registry.view_of::<(Position,)>().map(|e| e.id).collect();
            viewed.sort_unstable();
            let mut expected: Vec<_> = attached.iter().map(|e| e.id).collect();
            expected.sort_unstable();
            prop_assert_eq!(viewed, expected);
        }
    }
}
