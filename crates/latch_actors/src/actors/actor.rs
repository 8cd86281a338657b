//! Actor handle with generational index
//!
//! Actors are 8-byte handles into the manager's slot table. The generation
//! half goes up every time a slot is reused, so a handle kept past its
//! actor's destruction simply stops being alive instead of aliasing the
//! next occupant.

use std::fmt;

/// Slot index half of a handle.
pub type ActorId = u32;
/// Generation half of a handle.
pub type ActorVersion = u32;

/// Index sentinel. Also terminates free lists.
pub const ACTOR_INVALID: ActorId = ActorId::MAX;
/// Generation cap. Reusing a slot that has reached it is fatal.
pub const ACTOR_MAX_VERSION: ActorVersion = ActorVersion::MAX;

/// Actor handle
///
/// Format: [32-bit index | 32-bit generation]
/// - Index: position in the manager's slot table
/// - Generation: bumped each time the slot is handed out again
///
/// Example:
/// ```ignore
/// let actor = manager.create_actor();
/// manager.destroy_actor(actor);
/// assert!(!manager.is_actor_alive(actor));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Actor(u64);

impl Actor {
    pub const NULL: Actor = Actor::new(ACTOR_INVALID, ACTOR_MAX_VERSION);

    pub(crate) const fn new(index: ActorId, generation: ActorVersion) -> Self {
        Self(((index as u64) << 32) | generation as u64)
    }

    #[inline]
    pub const fn index(self) -> ActorId {
        (self.0 >> 32) as ActorId
    }

    #[inline]
    pub const fn generation(self) -> ActorVersion {
        self.0 as ActorVersion
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.index() == ACTOR_INVALID
    }

    /// Same generation, different index. Dead slots use the index half as
    /// the free-list link.
    #[inline]
    pub(crate) const fn with_index(self, index: ActorId) -> Self {
        Self::new(index, self.generation())
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("null")
        } else {
            write!(f, "{}v{}", self.index(), self.generation())
        }
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lives_in_the_high_half() {
        let actor = Actor::new(3, 9);
        assert_eq!(actor.index(), 3);
        assert_eq!(actor.generation(), 9);
    }

    #[test]
    fn null_actor() {
        assert!(Actor::NULL.is_null());
        assert_eq!(Actor::default(), Actor::NULL);
        assert_eq!(Actor::NULL.index(), ACTOR_INVALID);
        assert!(!Actor::new(0, 0).is_null());
    }

    #[test]
    fn with_index_keeps_generation() {
        let link = Actor::new(5, 12).with_index(ACTOR_INVALID);
        assert_eq!(link.index(), ACTOR_INVALID);
        assert_eq!(link.generation(), 12);
    }

    #[test]
    fn formatting() {
        assert_eq!(Actor::new(4, 1).to_string(), "4v1");
        assert_eq!(format!("{:?}", Actor::NULL), "Actor(null)");
    }
}
