use crate::actors::{Actor, ComponentMask, Family};

const NOT_MEMBER: u32 = u32::MAX;

/// Live membership of one [`Family`], kept current by the manager.
///
/// `members` is dense and unordered across removals (swap-remove);
/// `positions` maps an actor index to its place in `members`.
#[derive(Debug)]
pub(crate) struct FamilyActorSet {
    family: Family,
    members: Vec<Actor>,
    positions: Vec<u32>,
}

impl FamilyActorSet {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            members: Vec::new(),
            positions: Vec::new(),
        }
    }

    #[inline]
    pub fn family(&self) -> &Family {
        &self.family
    }

    #[inline]
    pub fn members(&self) -> &[Actor] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    fn position_of(&self, actor: Actor) -> Option<usize> {
        let position = *self.positions.get(actor.index() as usize)?;
        if position == NOT_MEMBER || self.members[position as usize] != actor {
            return None;
        }
        Some(position as usize)
    }

    #[inline]
    pub fn contains(&self, actor: Actor) -> bool {
        self.position_of(actor).is_some()
    }

    pub fn add(&mut self, actor: Actor) {
        let index = actor.index() as usize;
        if index >= self.positions.len() {
            self.positions.resize(index + 1, NOT_MEMBER);
        }
        debug_assert_eq!(self.positions[index], NOT_MEMBER, "{actor} added twice");
        self.positions[index] = self.members.len() as u32;
        self.members.push(actor);
    }

    pub fn remove(&mut self, actor: Actor) -> bool {
        let Some(position) = self.position_of(actor) else {
            return false;
        };
        self.members.swap_remove(position);
        if let Some(moved) = self.members.get(position) {
            self.positions[moved.index() as usize] = position as u32;
        }
        self.positions[actor.index() as usize] = NOT_MEMBER;
        true
    }

    /// Apply one mask transition: join on no-match -> match, leave on
    /// match -> no-match.
    pub fn reconcile(&mut self, actor: Actor, previous: ComponentMask, current: ComponentMask) {
        match (self.family.matches(previous), self.family.matches(current)) {
            (false, true) => self.add(actor),
            (true, false) => {
                self.remove(actor);
            }
            _ => {}
        }
    }

    pub fn clear(&mut self) {
        for actor in self.members.drain(..) {
            self.positions[actor.index() as usize] = NOT_MEMBER;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::mask_of;
    use crate::actors::test_components::{Position, Tag};

    #[test]
    fn add_remove_contains() {
        let mut set = FamilyActorSet::new(Family::everything());
        let actors: Vec<Actor> = (0..4).map(|i| Actor::new(i, 0)).collect();
        for actor in &actors {
            set.add(*actor);
        }
        assert!(set.remove(actors[1]));
        assert!(!set.remove(actors[1]));
        assert!(!set.contains(actors[1]));
        assert_eq!(set.len(), 3);
        // The last member fills the hole.
        assert_eq!(set.members(), &[actors[0], actors[3], actors[2]]);
        assert!(set.contains(actors[3]));
        assert!(set.remove(actors[3]));
        assert_eq!(set.members(), &[actors[0], actors[2]]);
    }

    #[test]
    fn stale_generation_is_not_a_member() {
        let mut set = FamilyActorSet::new(Family::everything());
        set.add(Actor::new(0, 0));
        assert!(!set.contains(Actor::new(0, 1)));
        assert!(!set.remove(Actor::new(0, 1)));
    }

    #[test]
    fn reconcile_follows_transitions() {
        let family = Family::all::<Position>().exclude::<Tag>().get();
        let mut set = FamilyActorSet::new(family);
        let actor = Actor::new(2, 0);
        let position = mask_of::<Position>();
        let tag = mask_of::<Tag>();

        set.reconcile(actor, ComponentMask::EMPTY, position);
        assert!(set.contains(actor));
        set.reconcile(actor, position, position);
        assert_eq!(set.len(), 1);
        set.reconcile(actor, position, position | tag);
        assert!(!set.contains(actor));
        set.reconcile(actor, position | tag, tag);
        assert!(!set.contains(actor));
    }

    #[test]
    fn clear_forgets_positions() {
        let mut set = FamilyActorSet::new(Family::everything());
        set.add(Actor::new(1, 0));
        set.clear();
        assert_eq!(set.len(), 0);
        set.add(Actor::new(1, 1));
        assert!(set.contains(Actor::new(1, 1)));
    }
}
