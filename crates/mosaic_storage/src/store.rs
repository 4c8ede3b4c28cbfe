//! Typed component stores, their type-erased capability surface, and the
//! per-type store registry.
//!
//! Each component type gets one [`ComponentStore`] wrapping a sparse set.
//! The [`StoreRegistry`] creates stores lazily on first typed access, keyed
//! by [`TypeId`], and exposes every store through the [`AnyStore`] trait so
//! registry-wide operations (cascade removal, inspection) need no
//! compile-time knowledge of the component types in play. Typed call sites
//! downcast once at the registry boundary, never inside iteration.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use log::debug;
use mosaic_foundation::{Entity, Error, Result};

use crate::sparse_set::{Entities, SparseSet};

/// Stores one component type for a set of entities.
///
/// A thin typed facade over a [`SparseSet`]; all operation contracts
/// (duplicate rejection, idempotent removal, fixed capacity, lazy stale
/// invalidation) are the sparse set's.
#[derive(Debug)]
pub struct ComponentStore<T> {
    set: SparseSet<T>,
}

impl<T: 'static> ComponentStore<T> {
    pub(crate) fn new(dense_capacity: usize, sparse_capacity: usize) -> Self {
        Self {
            set: SparseSet::new(dense_capacity, sparse_capacity),
        }
    }

    /// Returns the number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns true if no entity carries this component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Attaches `component` to `entity`.
    ///
    /// # Errors
    ///
    /// Same contract as [`SparseSet::add`].
    pub fn add(&mut self, entity: Entity, component: T) -> Result<&mut T> {
        self.set.add(entity, component)
    }

    /// Returns the component for `entity`, attaching a default one if absent.
    ///
    /// # Errors
    ///
    /// Same contract as [`SparseSet::get_or_create`].
    pub fn get_or_add(&mut self, entity: Entity) -> Result<&mut T>
    where
        T: Default,
    {
        self.set.get_or_create(entity)
    }

    /// Checks if `entity` carries this component.
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.set.has(entity)
    }

    /// Returns the component for `entity`.
    ///
    /// # Errors
    ///
    /// Same contract as [`SparseSet::get`].
    pub fn get(&self, entity: Entity) -> Result<&T> {
        self.set.get(entity)
    }

    /// Returns the component for `entity`, mutably.
    ///
    /// # Errors
    ///
    /// Same contract as [`SparseSet::get_mut`].
    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut T> {
        self.set.get_mut(entity)
    }

    /// Non-failing lookup.
    #[must_use]
    pub fn try_get(&self, entity: Entity) -> Option<&T> {
        self.set.try_get(entity)
    }

    /// Non-failing mutable lookup.
    #[must_use]
    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.set.try_get_mut(entity)
    }

    /// Detaches the component from `entity`. Idempotent.
    pub fn remove(&mut self, entity: Entity) -> bool {
        self.set.remove(entity)
    }

    /// Detaches this component from every entity.
    pub fn clear(&mut self) {
        self.set.clear();
    }

    /// Iterates the entities carrying this component, in dense order.
    #[must_use]
    pub fn entities(&self) -> Entities<'_> {
        self.set.entities()
    }

    /// Iterates `(entity, component)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.set.iter()
    }

    /// Iterates `(entity, component)` pairs, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.set.iter_mut()
    }
}

/// Type-erased capability surface over a [`ComponentStore`].
///
/// Used for registry-wide operations and debugging across stores without
/// compile-time knowledge of the component type. Not performance-critical;
/// hot paths go through the typed store.
pub trait AnyStore {
    /// The [`TypeId`] of the stored component type.
    fn component_type_id(&self) -> TypeId;

    /// Human-readable name of the stored component type.
    fn component_type_name(&self) -> &'static str;

    /// Number of stored components.
    fn len(&self) -> usize;

    /// True if no entity carries the component.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if `entity` carries the component.
    fn has(&self, entity: Entity) -> bool;

    /// Detaches the component from `entity`. Idempotent.
    fn remove(&mut self, entity: Entity) -> bool;

    /// Returns the component for `entity` as `&dyn Any` for downcasting.
    ///
    /// # Errors
    ///
    /// Same contract as the typed [`ComponentStore::get`].
    fn get_any(&self, entity: Entity) -> Result<&dyn Any>;

    /// Non-failing variant of [`AnyStore::get_any`].
    fn try_get_any(&self, entity: Entity) -> Option<&dyn Any>;

    /// Iterates the entities carrying the component, in dense order.
    fn entities(&self) -> Entities<'_>;

    /// Upcast for typed downcasting at the registry boundary.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed downcasting at the registry boundary.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> AnyStore for ComponentStore<T> {
    fn component_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn component_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        self.set.len()
    }

    fn has(&self, entity: Entity) -> bool {
        self.set.has(entity)
    }

    fn remove(&mut self, entity: Entity) -> bool {
        self.set.remove(entity)
    }

    fn get_any(&self, entity: Entity) -> Result<&dyn Any> {
        self.set.get(entity).map(|component| component as &dyn Any)
    }

    fn try_get_any(&self, entity: Entity) -> Option<&dyn Any> {
        self.set
            .try_get(entity)
            .map(|component| component as &dyn Any)
    }

    fn entities(&self) -> Entities<'_> {
        self.set.entities()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owns one [`ComponentStore`] per component type ever used, created lazily
/// on first access and keyed by the type's process-wide [`TypeId`].
pub struct StoreRegistry {
    stores: HashMap<TypeId, Box<dyn AnyStore>>,
    dense_capacity: usize,
    sparse_capacity: usize,
}

impl StoreRegistry {
    /// Creates a registry whose stores are built with the given capacities.
    #[must_use]
    pub fn new(dense_capacity: usize, sparse_capacity: usize) -> Self {
        Self {
            stores: HashMap::new(),
            dense_capacity,
            sparse_capacity,
        }
    }

    /// Returns the number of registered stores (component types ever used).
    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Returns true if no component type was ever used.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Returns the store for `T`, creating it on first use.
    pub fn get_or_create<T: 'static>(&mut self) -> &mut ComponentStore<T> {
        let store = self.stores.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!("registering component store for {}", type_name::<T>());
            Box::new(ComponentStore::<T>::new(
                self.dense_capacity,
                self.sparse_capacity,
            ))
        });

        store
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .unwrap_or_else(|| unreachable!("store registered under a foreign type id"))
    }

    /// Returns the store for `T` if it was ever used.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<&ComponentStore<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|store| store.as_any().downcast_ref())
    }

    /// Returns the store for `T` mutably, if it was ever used.
    #[must_use]
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut ComponentStore<T>> {
        self.stores
            .get_mut(&TypeId::of::<T>())
            .and_then(|store| store.as_any_mut().downcast_mut())
    }

    /// Returns the erased store for `T` if it was ever used.
    #[must_use]
    pub fn erased<T: 'static>(&self) -> Option<&dyn AnyStore> {
        self.stores.get(&TypeId::of::<T>()).map(Box::as_ref)
    }

    /// Iterates every registered store through the erased surface.
    pub fn iter(&self) -> impl Iterator<Item = &dyn AnyStore> {
        self.stores.values().map(Box::as_ref)
    }

    /// Removes `entity` from every registered store, whether or not it
    /// carries the component.
    pub(crate) fn purge(&mut self, entity: Entity) {
        for store in self.stores.values_mut() {
            store.remove(entity);
        }
    }
}

/// Read-only handle to one component store for bulk operations.
///
/// Skips the per-call type-map lookup and entity-aliveness checks of the
/// registry facade; obtained from
/// [`EntityRegistry::components`](crate::EntityRegistry::components). A
/// never-used component type yields an empty accessor.
#[derive(Debug)]
pub struct ComponentAccessor<'a, T> {
    store: Option<&'a ComponentStore<T>>,
}

impl<T> Clone for ComponentAccessor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentAccessor<'_, T> {}

impl<'a, T: 'static> ComponentAccessor<'a, T> {
    pub(crate) fn new(store: Option<&'a ComponentStore<T>>) -> Self {
        Self { store }
    }

    /// Returns the number of stored components.
    #[must_use]
    pub fn len(self) -> usize {
        self.store.map_or(0, ComponentStore::len)
    }

    /// Returns true if no entity carries the component.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Checks if `entity` carries the component.
    #[must_use]
    pub fn has(self, entity: Entity) -> bool {
        self.store.is_some_and(|store| store.has(entity))
    }

    /// Returns the component for `entity`.
    ///
    /// # Errors
    ///
    /// [`ComponentNotFound`](mosaic_foundation::ErrorKind::ComponentNotFound)
    /// when absent (including when the store was never created),
    /// [`InvalidEntity`](mosaic_foundation::ErrorKind::InvalidEntity) for
    /// null handles.
    pub fn get(self, entity: Entity) -> Result<&'a T> {
        match self.store {
            Some(store) => store.get(entity),
            None if entity.is_null() => Err(Error::invalid_entity()),
            None => Err(Error::component_not_found(entity, type_name::<T>())),
        }
    }

    /// Non-failing lookup.
    #[must_use]
    pub fn try_get(self, entity: Entity) -> Option<&'a T> {
        self.store.and_then(|store| store.try_get(entity))
    }

    /// Iterates the entities carrying the component.
    #[must_use]
    pub fn entities(self) -> Entities<'a> {
        self.store.map_or_else(Entities::empty, ComponentStore::entities)
    }

    /// Iterates `(entity, component)` pairs.
    pub fn iter(self) -> impl Iterator<Item = (Entity, &'a T)> {
        self.store.into_iter().flat_map(ComponentStore::iter)
    }
}
