//! Entity lifecycle management with generational slot reuse.
//!
//! The [`EntityAllocator`] issues entity handles from a fixed pool of id
//! slots and tracks a generation per slot to detect stale references to
//! destroyed entities.

use std::collections::VecDeque;

use mosaic_foundation::{Entity, Error, Result};

/// Issues and recycles entity handles within a fixed capacity.
///
/// Fresh ids are drawn monotonically; destroyed ids go into a FIFO queue and
/// are recycled before new ids are drawn. Destroying a slot bumps its
/// generation, so every handle to the old occupant is permanently invalid
/// the moment the slot is freed. A slot's generation only ever increases,
/// which guarantees no two entities sharing an id compare equal.
#[derive(Debug, Clone)]
pub struct EntityAllocator {
    /// Current generation per id slot. 0 means the slot was never issued.
    generations: Vec<u32>,
    /// Freed ids awaiting reuse, oldest first.
    free: VecDeque<u32>,
    /// Next never-issued id.
    next_id: u32,
    /// Count of live entities.
    live_count: usize,
}

impl EntityAllocator {
    /// Creates an allocator for at most `capacity` concurrently live
    /// entities.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            generations: vec![0; capacity],
            free: VecDeque::new(),
            next_id: 0,
            live_count: 0,
        }
    }

    /// Creates a new entity, recycling the oldest freed id if one exists.
    ///
    /// A recycled slot keeps the generation it received when it was freed; a
    /// fresh slot is bumped from generation 0 to 1. Either way the returned
    /// handle carries a nonzero generation.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::CapacityExceeded`](mosaic_foundation::ErrorKind::CapacityExceeded)
    /// when `live_count` has reached capacity.
    pub fn create(&mut self) -> Result<Entity> {
        if self.live_count == self.capacity() {
            return Err(Error::capacity_exceeded(self.capacity()));
        }

        let id = if let Some(id) = self.free.pop_front() {
            id
        } else {
            let id = self.next_id;
            self.next_id += 1;
            // The destroy-time bump covers recycled slots; fresh slots are
            // bumped here, 0 -> 1.
            self.generations[id as usize] += 1;
            id
        };

        self.live_count += 1;
        Ok(Entity::new(self.generations[id as usize], id))
    }

    /// Checks whether `entity` is currently alive.
    ///
    /// False for [`Entity::NULL`], for ids beyond any ever issued, and for
    /// handles whose generation no longer matches the slot.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        !entity.is_null()
            && entity.index() < self.generations.len()
            && self.generations[entity.index()] == entity.generation
    }

    /// Destroys `entity`, invalidating the handle and all copies of it.
    ///
    /// Idempotent: returns false without touching state when the entity is
    /// not alive.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.generations[entity.index()] += 1;
        self.free.push_back(entity.id);
        self.live_count -= 1;
        true
    }

    /// Returns the fixed upper bound on live entities.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if no entities are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }
}
