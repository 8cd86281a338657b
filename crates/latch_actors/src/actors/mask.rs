use crate::actors::Actor;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// One bit per registered component type.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentMask(u64);

impl ComponentMask {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn from_bit(bit: u32) -> Self {
        Self(1 << bit)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for ComponentMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ComponentMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ComponentMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentMask({:#b})", self.0)
    }
}

/// Per-actor masks, indexed by actor slot.
#[derive(Debug, Default)]
pub(crate) struct ComponentMaskSet {
    masks: Vec<ComponentMask>,
}

impl ComponentMaskSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            masks: Vec::with_capacity(capacity),
        }
    }

    pub fn add_empty_actor(&mut self) {
        self.masks.push(ComponentMask::EMPTY);
    }

    #[inline]
    pub fn mask(&self, actor: Actor) -> ComponentMask {
        self.masks
            .get(actor.index() as usize)
            .copied()
            .unwrap_or_default()
    }

    #[inline]
    pub fn has_component(&self, actor: Actor, component: ComponentMask) -> bool {
        self.mask(actor).contains_all(component)
    }

    #[inline]
    pub fn add_component(&mut self, actor: Actor, component: ComponentMask) {
        self.masks[actor.index() as usize] |= component;
    }

    #[inline]
    pub fn remove_component(&mut self, actor: Actor, component: ComponentMask) {
        let mask = &mut self.masks[actor.index() as usize];
        *mask = mask.without(component);
    }

    #[inline]
    pub fn clear(&mut self, actor: Actor) {
        self.masks[actor.index() as usize] = ComponentMask::EMPTY;
    }

    pub fn clear_all(&mut self) {
        self.masks.fill(ComponentMask::EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_algebra() {
        let a = ComponentMask::from_bit(0);
        let b = ComponentMask::from_bit(3);
        let ab = a | b;
        assert_eq!(ab.bits(), 0b1001);
        assert!(ab.contains_all(a));
        assert!(!a.contains_all(ab));
        assert!(ab.intersects(b));
        assert_eq!(ab.without(a), b);
        assert_eq!((ab & a), a);
        assert_eq!(ab.count(), 2);
        assert!(ComponentMask::EMPTY.is_empty());
        assert!(a.contains_all(ComponentMask::EMPTY));
    }

    #[test]
    fn per_actor_masks() {
        let mut set = ComponentMaskSet::with_capacity(2);
        set.add_empty_actor();
        set.add_empty_actor();
        let first = Actor::new(0, 0);
        let second = Actor::new(1, 0);
        let bit = ComponentMask::from_bit(5);

        set.add_component(second, bit);
        assert!(set.has_component(second, bit));
        assert!(!set.has_component(first, bit));

        set.remove_component(second, bit);
        assert_eq!(set.mask(second), ComponentMask::EMPTY);

        set.add_component(first, bit);
        set.clear_all();
        assert!(set.mask(first).is_empty());
    }

    #[test]
    fn unknown_actor_reads_as_empty() {
        let set = ComponentMaskSet::default();
        assert_eq!(set.mask(Actor::NULL), ComponentMask::EMPTY);
    }
}
