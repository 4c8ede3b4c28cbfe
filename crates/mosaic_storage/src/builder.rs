//! Deferred entity construction.
//!
//! [`EntityRegistry::build_entity`](crate::EntityRegistry::build_entity)
//! fires the `creating` notification immediately but defers `created` until
//! the builder is finished (or dropped), so observers only ever see the
//! entity with its full component set.

use mosaic_foundation::{Entity, Result};

use crate::registry::EntityRegistry;

/// Scoped token that attaches components to a fresh entity before observers
/// learn about it.
///
/// The deferred `created` notification fires exactly once: at
/// [`EntityBuilder::finish`], or on drop if the builder is abandoned.
pub struct EntityBuilder<'a> {
    registry: &'a mut EntityRegistry,
    entity: Entity,
    notified: bool,
}

impl<'a> EntityBuilder<'a> {
    pub(crate) fn new(registry: &'a mut EntityRegistry, entity: Entity) -> Self {
        Self {
            registry,
            entity,
            notified: false,
        }
    }

    /// Returns the entity under construction.
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Attaches `component` to the entity under construction.
    ///
    /// # Errors
    ///
    /// Same contract as
    /// [`EntityRegistry::add_component`](crate::EntityRegistry::add_component).
    pub fn add<T: 'static>(&mut self, component: T) -> Result<&mut T> {
        self.registry.add_component(self.entity, component)
    }

    /// Finishes construction, firing the deferred `created` notification.
    pub fn finish(mut self) -> Entity {
        self.notify();
        self.entity
    }

    fn notify(&mut self) {
        if !self.notified {
            self.notified = true;
            self.registry.emit_created(self.entity);
        }
    }
}

impl Drop for EntityBuilder<'_> {
    fn drop(&mut self) {
        self.notify();
    }
}
