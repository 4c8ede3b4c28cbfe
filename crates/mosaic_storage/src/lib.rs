//! Sparse-set component storage, entity lifecycle, and view joins for
//! Mosaic.
//!
//! This crate provides:
//! - [`EntityAllocator`] - Generational entity allocation within a fixed
//!   capacity
//! - [`SparseSet`] - Dense/sparse storage with O(1) add, remove, and lookup
//! - [`ComponentStore`] / [`StoreRegistry`] - Per-type stores behind a
//!   type-erased capability surface
//! - [`View`] - Lazy joins over entities holding a combination of components
//! - [`EntityRegistry`] - The facade tying allocation, storage, views, and
//!   lifecycle hooks together
//!
//! Everything is single-threaded and in-memory: no locking, no I/O, no
//! persistence. Capacities are fixed at construction.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod allocator;
pub mod builder;
mod hooks;
pub mod registry;
pub mod sparse_set;
pub mod store;
pub mod view;

pub use allocator::EntityAllocator;
pub use builder::EntityBuilder;
pub use registry::{EntityRef, EntityRegistry, RegistryOptions};
pub use sparse_set::{Entities, SparseSet};
pub use store::{AnyStore, ComponentAccessor, ComponentStore, StoreRegistry};
pub use view::{View, ViewQuery};
