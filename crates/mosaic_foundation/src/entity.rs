//! Entity handles with generational indices.

use std::fmt;

/// Handle to an entity, combining a slot id with a generation counter.
///
/// The generation increments whenever an entity slot is reused, so a handle
/// kept across a destroy/create cycle never compares equal to the new
/// occupant of the same slot. Equality and hashing are structural over both
/// fields; comparing by `id` alone is exactly the bug class the generation
/// exists to eliminate.
///
/// Generation 0 is reserved: no live entity ever carries it, and
/// [`Entity::NULL`] uses it as the "no entity" sentinel.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Entity {
    /// Generation counter for stale handle detection.
    pub generation: u32,
    /// Index into allocator and sparse-set tables.
    pub id: u32,
}

impl Entity {
    /// The "no entity" sentinel (generation 0).
    pub const NULL: Self = Self {
        generation: 0,
        id: 0,
    };

    /// Creates a handle from a generation and slot id.
    #[must_use]
    pub const fn new(generation: u32, id: u32) -> Self {
        Self { generation, id }
    }

    /// Returns true if this is a null handle (generation 0).
    ///
    /// Null handles are never alive and never carry components.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.generation == 0
    }

    /// Returns the slot id as a table index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.id as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}@{})", self.id, self.generation)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "<null>")
        } else {
            write!(f, "<{}@{}>", self.id, self.generation)
        }
    }
}
