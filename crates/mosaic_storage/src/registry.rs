//! The entity registry: the facade tying the allocator, the component
//! stores, and the lifecycle hooks together.
//!
//! The registry is the sole entry point correlating entity validity with
//! component presence: component data is only ever meaningful for entities
//! the allocator considers alive, and destruction purges an entity from
//! every store before observers can see it dead with data still attached.

use std::any::{Any, type_name};

use log::{trace, warn};
use mosaic_foundation::{Entity, Error, Result};

use crate::allocator::EntityAllocator;
use crate::builder::EntityBuilder;
use crate::hooks::HookRegistry;
use crate::store::{AnyStore, ComponentAccessor, StoreRegistry};
use crate::view::{View, ViewQuery};

/// Construction-time capacity configuration for an [`EntityRegistry`].
///
/// Capacities are fixed for the registry's lifetime; size them for the
/// worst-case concurrent entity and component count.
#[derive(Debug, Clone, Copy)]
pub struct RegistryOptions {
    entity_capacity: usize,
    component_capacity: Option<usize>,
}

impl RegistryOptions {
    /// Starts options for a registry of at most `entity_capacity` live
    /// entities.
    #[must_use]
    pub fn new(entity_capacity: usize) -> Self {
        Self {
            entity_capacity,
            component_capacity: None,
        }
    }

    /// Overrides the per-type component capacity, which otherwise defaults
    /// to the entity capacity.
    #[must_use]
    pub fn with_component_capacity(mut self, capacity: usize) -> Self {
        self.component_capacity = Some(capacity);
        self
    }
}

/// In-process, single-threaded store associating typed components with
/// generational entity handles.
///
/// Owns exactly one [`EntityAllocator`] and one [`StoreRegistry`]. All
/// operations are synchronous and non-blocking; views borrow the live
/// stores directly, so the borrow checker enforces the rule that a view
/// must not outlive structural mutation of the stores it iterates.
pub struct EntityRegistry {
    allocator: EntityAllocator,
    stores: StoreRegistry,
    hooks: HookRegistry,
}

impl EntityRegistry {
    /// Creates a registry for at most `capacity` live entities, with
    /// component stores sized to match.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_options(RegistryOptions::new(capacity))
    }

    /// Creates a registry from explicit [`RegistryOptions`].
    #[must_use]
    pub fn with_options(options: RegistryOptions) -> Self {
        let component_capacity = options
            .component_capacity
            .unwrap_or(options.entity_capacity);

        Self {
            allocator: EntityAllocator::new(options.entity_capacity),
            stores: StoreRegistry::new(component_capacity, options.entity_capacity),
            hooks: HookRegistry::default(),
        }
    }

    /// Returns the fixed upper bound on live entities.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.allocator.capacity()
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.len()
    }

    /// Checks whether `entity` is currently alive.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    // --- Entity lifecycle ---

    /// Creates a new entity, notifying `creating` and `created` subscribers
    /// around the allocation.
    ///
    /// Keep the returned handle to refer to the entity later.
    ///
    /// # Errors
    ///
    /// [`CapacityExceeded`](mosaic_foundation::ErrorKind::CapacityExceeded)
    /// when the registry is full.
    pub fn create_entity(&mut self) -> Result<Entity> {
        let entity = self.allocator.create()?;
        trace!("created entity {entity}");

        self.emit_creating(entity);
        self.emit_created(entity);
        Ok(entity)
    }

    /// Creates a new entity behind an [`EntityBuilder`], deferring the
    /// `created` notification until the builder finishes.
    ///
    /// # Errors
    ///
    /// [`CapacityExceeded`](mosaic_foundation::ErrorKind::CapacityExceeded)
    /// when the registry is full.
    pub fn build_entity(&mut self) -> Result<EntityBuilder<'_>> {
        let entity = self.allocator.create()?;
        trace!("building entity {entity}");

        self.emit_creating(entity);
        Ok(EntityBuilder::new(self, entity))
    }

    /// Destroys `entity` and all its components.
    ///
    /// Idempotent: returns false for handles that are not alive. Otherwise
    /// `deleting` subscribers observe the entity with its data intact, the
    /// allocator invalidates the handle, every registered store is purged,
    /// and `deleted` subscribers observe the bare handle.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.allocator.is_alive(entity) {
            warn!("ignoring destroy of dead entity {entity}");
            return false;
        }

        self.emit_deleting(entity);

        self.allocator.destroy(entity);
        self.stores.purge(entity);
        trace!("destroyed entity {entity}");

        self.emit_deleted(entity);
        true
    }

    // --- Component operations ---

    /// Attaches `component` to `entity`, creating the store for `T` on
    /// first use.
    ///
    /// # Errors
    ///
    /// [`EntityNotFound`](mosaic_foundation::ErrorKind::EntityNotFound) when
    /// the entity is not alive;
    /// [`AlreadyExists`](mosaic_foundation::ErrorKind::AlreadyExists) and
    /// [`CapacityExceeded`](mosaic_foundation::ErrorKind::CapacityExceeded)
    /// pass through from the store unchanged.
    pub fn add_component<T: 'static>(&mut self, entity: Entity, component: T) -> Result<&mut T> {
        self.ensure_alive(entity)?;
        self.stores.get_or_create::<T>().add(entity, component)
    }

    /// Checks if `entity` carries a `T` component.
    ///
    /// # Errors
    ///
    /// [`EntityNotFound`](mosaic_foundation::ErrorKind::EntityNotFound) when
    /// the entity is not alive; the check runs before any component lookup.
    pub fn has_component<T: 'static>(&self, entity: Entity) -> Result<bool> {
        self.ensure_alive(entity)?;
        Ok(self.stores.get::<T>().is_some_and(|store| store.has(entity)))
    }

    /// Returns the `T` component of `entity`.
    ///
    /// # Errors
    ///
    /// [`EntityNotFound`](mosaic_foundation::ErrorKind::EntityNotFound) for
    /// dead entities,
    /// [`ComponentNotFound`](mosaic_foundation::ErrorKind::ComponentNotFound)
    /// for live entities lacking the component.
    pub fn get_component<T: 'static>(&self, entity: Entity) -> Result<&T> {
        self.ensure_alive(entity)?;
        match self.stores.get::<T>() {
            Some(store) => store.get(entity),
            None => Err(Error::component_not_found(entity, type_name::<T>())),
        }
    }

    /// Returns the `T` component of `entity`, mutably.
    ///
    /// # Errors
    ///
    /// Same as [`EntityRegistry::get_component`].
    pub fn get_component_mut<T: 'static>(&mut self, entity: Entity) -> Result<&mut T> {
        self.ensure_alive(entity)?;
        match self.stores.get_mut::<T>() {
            Some(store) => store.get_mut(entity),
            None => Err(Error::component_not_found(entity, type_name::<T>())),
        }
    }

    /// Returns the `T` component of `entity`, attaching a default one if
    /// absent.
    ///
    /// # Errors
    ///
    /// [`EntityNotFound`](mosaic_foundation::ErrorKind::EntityNotFound) for
    /// dead entities;
    /// [`CapacityExceeded`](mosaic_foundation::ErrorKind::CapacityExceeded)
    /// when a new component cannot be stored.
    pub fn get_or_add_component<T: Default + 'static>(&mut self, entity: Entity) -> Result<&mut T> {
        self.ensure_alive(entity)?;
        self.stores.get_or_create::<T>().get_or_add(entity)
    }

    /// Non-failing component lookup for a live entity.
    ///
    /// # Errors
    ///
    /// [`EntityNotFound`](mosaic_foundation::ErrorKind::EntityNotFound) when
    /// the entity is not alive; a missing component is `Ok(None)`.
    pub fn try_get_component<T: 'static>(&self, entity: Entity) -> Result<Option<&T>> {
        self.ensure_alive(entity)?;
        Ok(self.stores.get::<T>().and_then(|store| store.try_get(entity)))
    }

    /// Detaches the `T` component from `entity`.
    ///
    /// # Errors
    ///
    /// [`EntityNotFound`](mosaic_foundation::ErrorKind::EntityNotFound) when
    /// the entity is not alive. Once the entity checks out, a missing
    /// component (or store) is a silent `Ok(false)`.
    pub fn remove_component<T: 'static>(&mut self, entity: Entity) -> Result<bool> {
        self.ensure_alive(entity)?;
        Ok(self
            .stores
            .get_mut::<T>()
            .is_some_and(|store| store.remove(entity)))
    }

    // --- Queries ---

    /// Returns a view over the entities carrying every component of `Q`.
    ///
    /// Never fails: a component type that was never used produces an empty
    /// view. Views are cheap; obtain a fresh one per pass.
    #[must_use]
    pub fn view_of<Q: ViewQuery>(&self) -> View<'_> {
        match Q::stores(&self.stores) {
            Some(stores) => View::new(stores),
            None => View::empty(),
        }
    }

    /// Returns a read-only bulk-access handle for the `T` store.
    #[must_use]
    pub fn components<T: 'static>(&self) -> ComponentAccessor<'_, T> {
        ComponentAccessor::new(self.stores.get::<T>())
    }

    /// Couples `entity` with this registry for ergonomic access.
    #[must_use]
    pub fn entity_ref(&self, entity: Entity) -> EntityRef<'_> {
        EntityRef {
            registry: self,
            entity,
        }
    }

    /// Iterates the erased surface of every store ever used. Inspection
    /// only; order is unspecified.
    pub fn stores(&self) -> impl Iterator<Item = &dyn AnyStore> {
        self.stores.iter()
    }

    // --- Lifecycle hooks ---

    /// Subscribes to entity allocation, before `created` observers run. The
    /// entity is alive but has no components yet.
    pub fn on_entity_creating(&mut self, hook: impl for<'r> Fn(EntityRef<'r>) + 'static) {
        self.hooks.creating.push(std::rc::Rc::new(hook));
    }

    /// Subscribes to entity creation. For built entities the notification is
    /// deferred until the builder finishes.
    pub fn on_entity_created(&mut self, hook: impl for<'r> Fn(EntityRef<'r>) + 'static) {
        self.hooks.created.push(std::rc::Rc::new(hook));
    }

    /// Subscribes to entity destruction, before the data is purged: the
    /// doomed entity's components are still readable.
    pub fn on_entity_deleting(&mut self, hook: impl for<'r> Fn(EntityRef<'r>) + 'static) {
        self.hooks.deleting.push(std::rc::Rc::new(hook));
    }

    /// Subscribes to completed destruction: the entity is dead and its data
    /// is gone.
    pub fn on_entity_deleted(&mut self, hook: impl Fn(Entity) + 'static) {
        self.hooks.deleted.push(std::rc::Rc::new(hook));
    }

    // --- Internals ---

    fn ensure_alive(&self, entity: Entity) -> Result<()> {
        if self.allocator.is_alive(entity) {
            Ok(())
        } else {
            Err(Error::entity_not_found(entity))
        }
    }

    fn emit_creating(&self, entity: Entity) {
        for hook in self.hooks.creating.clone() {
            hook(self.entity_ref(entity));
        }
    }

    pub(crate) fn emit_created(&self, entity: Entity) {
        for hook in self.hooks.created.clone() {
            hook(self.entity_ref(entity));
        }
    }

    fn emit_deleting(&self, entity: Entity) {
        for hook in self.hooks.deleting.clone() {
            hook(self.entity_ref(entity));
        }
    }

    fn emit_deleted(&self, entity: Entity) {
        for hook in self.hooks.deleted.clone() {
            hook(entity);
        }
    }
}

/// An [`Entity`] coupled with its registry, for ergonomic read access.
///
/// This is what lifecycle hooks receive; it is also handy at call sites that
/// pass entity context around. The referenced entity may no longer exist.
#[derive(Clone, Copy)]
pub struct EntityRef<'a> {
    registry: &'a EntityRegistry,
    entity: Entity,
}

impl<'a> EntityRef<'a> {
    /// Returns the bare handle.
    #[must_use]
    pub fn entity(self) -> Entity {
        self.entity
    }

    /// Checks if the referenced entity is alive.
    #[must_use]
    pub fn is_alive(self) -> bool {
        self.registry.is_alive(self.entity)
    }

    /// Checks if the referenced entity carries a `T` component.
    ///
    /// # Errors
    ///
    /// Same as [`EntityRegistry::has_component`].
    pub fn has<T: 'static>(self) -> Result<bool> {
        self.registry.has_component::<T>(self.entity)
    }

    /// Returns the `T` component of the referenced entity.
    ///
    /// # Errors
    ///
    /// Same as [`EntityRegistry::get_component`].
    pub fn get<T: 'static>(self) -> Result<&'a T> {
        self.registry.get_component::<T>(self.entity)
    }

    /// Non-failing component lookup.
    ///
    /// # Errors
    ///
    /// Same as [`EntityRegistry::try_get_component`].
    pub fn try_get<T: 'static>(self) -> Result<Option<&'a T>> {
        self.registry.try_get_component::<T>(self.entity)
    }

    /// Collects every component attached to the referenced entity through
    /// the erased surface, in unspecified order. Debugging aid.
    #[must_use]
    pub fn components(self) -> Vec<&'a dyn Any> {
        self.registry
            .stores()
            .filter_map(|store| store.try_get_any(self.entity))
            .collect()
    }
}
