//! Mosaic - sparse-set entity-component storage engine
//!
//! This crate re-exports both layers of the Mosaic system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: mosaic_storage    — Allocator, sparse sets, stores, views, registry
//! Layer 0: mosaic_foundation — Core types (Entity, Error)
//! ```

pub use mosaic_foundation as foundation;
pub use mosaic_storage as storage;
