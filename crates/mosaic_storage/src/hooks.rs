//! Lifecycle notification hooks.
//!
//! Subscribers run in subscription order. A panicking hook propagates to the
//! caller of the triggering registry operation; the subscriber lists survive
//! because the registry snapshots them (cheap `Rc` clones) before invoking.
//! Hooks receive a read-only [`EntityRef`](crate::EntityRef) and therefore
//! cannot re-enter registry mutation.

use std::rc::Rc;

use mosaic_foundation::Entity;

use crate::registry::EntityRef;

/// Hook observing an entity that can still be inspected.
pub(crate) type RefHook = Rc<dyn for<'a> Fn(EntityRef<'a>)>;

/// Hook observing an entity that is already gone.
pub(crate) type EntityHook = Rc<dyn Fn(Entity)>;

/// Subscriber lists for the four lifecycle events.
#[derive(Default)]
pub(crate) struct HookRegistry {
    /// Entity allocated, no components yet, observers not yet notified.
    pub(crate) creating: Vec<RefHook>,
    /// Entity fully built (immediately on plain creation, at finish for the
    /// deferred builder).
    pub(crate) created: Vec<RefHook>,
    /// Entity about to die; component data still present.
    pub(crate) deleting: Vec<RefHook>,
    /// Entity dead, component data purged.
    pub(crate) deleted: Vec<EntityHook>,
}
