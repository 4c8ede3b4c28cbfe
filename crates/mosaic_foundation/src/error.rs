//! Error types for Mosaic storage operations.
//!
//! Uses `thiserror` for ergonomic error definition. All failures are local
//! and synchronous; nothing is retried internally and no operation leaves
//! partial state behind on error.

use thiserror::Error;

use crate::entity::Entity;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for storage operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a capacity exceeded error.
    #[must_use]
    pub fn capacity_exceeded(capacity: usize) -> Self {
        Self::new(ErrorKind::CapacityExceeded { capacity })
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(entity: Entity) -> Self {
        Self::new(ErrorKind::EntityNotFound(entity))
    }

    /// Creates an invalid entity error.
    #[must_use]
    pub fn invalid_entity() -> Self {
        Self::new(ErrorKind::InvalidEntity)
    }

    /// Creates a duplicate component error.
    #[must_use]
    pub fn already_exists(entity: Entity, component: &'static str) -> Self {
        Self::new(ErrorKind::AlreadyExists { entity, component })
    }

    /// Creates a missing component error.
    #[must_use]
    pub fn component_not_found(entity: Entity, component: &'static str) -> Self {
        Self::new(ErrorKind::ComponentNotFound { entity, component })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// An allocator or component store is full.
    ///
    /// Recoverable: the caller may free capacity and retry. State is never
    /// corrupted by a rejected operation.
    #[error("capacity exceeded ({capacity} slots)")]
    CapacityExceeded {
        /// The fixed capacity that was exhausted.
        capacity: usize,
    },

    /// The operation addressed a dead or never-issued entity.
    #[error("entity {0} does not exist")]
    EntityNotFound(Entity),

    /// A null (generation 0) handle was passed where a live entity is
    /// required. Precondition violation on the caller's side.
    #[error("the null entity cannot be used here")]
    InvalidEntity,

    /// The entity already carries a component of this type.
    #[error("entity {entity} already has a {component} component")]
    AlreadyExists {
        /// The addressed entity.
        entity: Entity,
        /// Type name of the duplicate component.
        component: &'static str,
    },

    /// A live entity lacks the requested component. Distinct from
    /// [`ErrorKind::EntityNotFound`], which fires first for dead entities.
    #[error("no {component} component found for entity {entity}")]
    ComponentNotFound {
        /// The addressed entity.
        entity: Entity,
        /// Type name of the missing component.
        component: &'static str,
    },
}
