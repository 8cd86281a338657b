//! Slot table with an embedded free list.
//!
//! Alive slot `i` holds `(i, generation)`. A dead slot holds
//! `(next free index | ACTOR_INVALID, last generation)`, so the free list
//! costs no extra memory. Freed slots are appended at the tail and handed
//! out from the head.

use crate::actors::{Actor, ActorError, ActorId, ACTOR_INVALID, ACTOR_MAX_VERSION};

/// Outcome of [`ActorTable::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Allocation {
    /// The table grew by one slot; per-actor arrays must grow with it.
    Grown(Actor),
    /// A freed slot was reused with a bumped generation.
    Reused(Actor),
}

impl Allocation {
    pub fn actor(self) -> Actor {
        match self {
            Allocation::Grown(actor) | Allocation::Reused(actor) => actor,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ActorTable {
    slots: Vec<Actor>,
    next_free: ActorId,
    last_free: ActorId,
    free_count: u32,
}

impl ActorTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            next_free: ACTOR_INVALID,
            last_free: ACTOR_INVALID,
            free_count: 0,
        }
    }

    /// Number of slots ever allocated, alive or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free_count as usize
    }

    #[inline]
    pub fn free_count(&self) -> u32 {
        self.free_count
    }

    #[inline]
    pub fn slots(&self) -> &[Actor] {
        &self.slots
    }

    #[inline]
    pub fn is_alive(&self, actor: Actor) -> bool {
        !actor.is_null() && self.slots.get(actor.index() as usize) == Some(&actor)
    }

    /// Live handles in slot order.
    pub fn alive(&self) -> impl Iterator<Item = Actor> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(index, slot)| slot.index() as usize == *index)
            .map(|(_, slot)| *slot)
    }

    pub fn allocate(&mut self) -> Result<Allocation, ActorError> {
        if self.free_count == 0 {
            let index = self.slots.len();
            if index >= ACTOR_INVALID as usize {
                return Err(ActorError::ActorCapacityExhausted { max: ACTOR_INVALID });
            }
            let actor = Actor::new(index as ActorId, 0);
            self.slots.push(actor);
            return Ok(Allocation::Grown(actor));
        }

        let index = self.next_free;
        let link = self.slots[index as usize];
        if link.generation() >= ACTOR_MAX_VERSION {
            return Err(ActorError::GenerationExhausted { index });
        }

        self.next_free = link.index();
        self.free_count -= 1;
        if self.free_count == 0 {
            self.next_free = ACTOR_INVALID;
            self.last_free = ACTOR_INVALID;
        }

        let actor = Actor::new(index, link.generation() + 1);
        self.slots[index as usize] = actor;
        Ok(Allocation::Reused(actor))
    }

    /// Append `actor`'s slot to the tail of the free list.
    ///
    /// The caller has already checked that `actor` is alive.
    pub fn release(&mut self, actor: Actor) {
        debug_assert!(self.is_alive(actor), "releasing dead actor {actor}");
        let index = actor.index();
        self.slots[index as usize] = actor.with_index(ACTOR_INVALID);
        if self.free_count == 0 {
            self.next_free = index;
        } else {
            let tail = self.last_free as usize;
            self.slots[tail] = self.slots[tail].with_index(index);
        }
        self.last_free = index;
        self.free_count += 1;
    }

    /// Release a batch of live actors in one pass. The batch is linked into
    /// a single chain in the given order and spliced onto the tail.
    pub fn release_batch(&mut self, actors: &[Actor]) {
        let (Some(first), Some(last)) = (actors.first(), actors.last()) else {
            return;
        };
        let links = actors
            .iter()
            .skip(1)
            .map(|actor| actor.index())
            .chain(std::iter::once(ACTOR_INVALID));
        for (actor, next) in actors.iter().zip(links) {
            debug_assert!(self.is_alive(*actor), "releasing dead actor {actor}");
            self.slots[actor.index() as usize] = actor.with_index(next);
        }

        if self.free_count == 0 {
            self.next_free = first.index();
        } else {
            let tail = self.last_free as usize;
            self.slots[tail] = self.slots[tail].with_index(first.index());
        }
        self.last_free = last.index();
        self.free_count += actors.len() as u32;
    }

    /// Free every slot at once, chaining them in index order.
    pub fn release_all(&mut self) {
        let len = self.slots.len();
        if len == 0 {
            return;
        }
        for index in 0..len {
            let next = if index + 1 < len {
                (index + 1) as ActorId
            } else {
                ACTOR_INVALID
            };
            self.slots[index] = self.slots[index].with_index(next);
        }
        self.next_free = 0;
        self.last_free = (len - 1) as ActorId;
        self.free_count = len as u32;
    }

    #[cfg(test)]
    pub fn set_generation(&mut self, index: ActorId, generation: u32) {
        let slot = &mut self.slots[index as usize];
        *slot = Actor::new(slot.index(), generation);
    }
}
