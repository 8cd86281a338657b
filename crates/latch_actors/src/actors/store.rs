//! Per-type component storage.
//!
//! Values live in a [`PagedPool`] of fixed pages that are never moved or
//! freed, so `&T` handed out by the store stays at the same address while
//! other actors gain and lose the component. Two side tables tie it
//! together:
//! - `actor_slots`: actor index -> pool slot (sparse, one entry per actor)
//! - `owners`: pool slot -> owning actor, or the next abandoned slot
//!
//! Abandoned slots form a singly linked list threaded through `owners`;
//! removals append at the tail and insertions pop the head.

use crate::actors::{
    Actor, ActorError, Component, ComponentMask, ComponentMeta, ComponentRemoved,
    RemovalListener,
};
use crate::pool::PagedPool;
use std::any::Any;

/// Rows per component page.
pub const COMPONENT_PAGE_SIZE: usize = 256;

const NO_SLOT: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotOwner {
    Owned(Actor),
    Abandoned { next: u32 },
}

/// Type-erased view of a [`ComponentStore`], used by the manager for
/// operations that do not need `T`.
pub(crate) trait ErasedStore {
    fn mask(&self) -> ComponentMask;
    fn name(&self) -> &'static str;
    fn add_empty_actor(&mut self);
    fn has(&self, actor: Actor) -> bool;
    /// Notify listeners and reset the actor's slot. `false` if it had none.
    fn remove(&mut self, actor: Actor) -> bool;
    /// Remove every stored component, notifying for each.
    fn remove_all(&mut self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub(crate) struct ComponentStore<T: Component> {
    meta: ComponentMeta,
    actor_slots: Vec<u32>,
    owners: Vec<SlotOwner>,
    values: PagedPool<T>,
    next_abandoned: u32,
    last_abandoned: u32,
    abandoned_count: usize,
    listeners: Vec<RemovalListener<T>>,
}

impl<T: Component> ComponentStore<T> {
    pub fn new(meta: ComponentMeta) -> Self {
        Self {
            meta,
            actor_slots: Vec::new(),
            owners: Vec::new(),
            values: PagedPool::with_rows_per_page(COMPONENT_PAGE_SIZE),
            next_abandoned: NO_SLOT,
            last_abandoned: NO_SLOT,
            abandoned_count: 0,
            listeners: Vec::new(),
        }
    }

    /// Grow the sparse index to cover `population` actor slots.
    pub fn add_empty_actors(&mut self, population: usize) {
        if population > self.actor_slots.len() {
            self.actor_slots.resize(population, NO_SLOT);
        }
    }

    /// Components currently stored.
    pub fn len(&self) -> usize {
        self.owners.len() - self.abandoned_count
    }

    pub fn page_count(&self) -> usize {
        self.values.page_count()
    }

    pub fn listen(&mut self, listener: RemovalListener<T>) {
        self.listeners.push(listener);
    }

    fn slot_of(&self, actor: Actor) -> Option<usize> {
        let slot = *self.actor_slots.get(actor.index() as usize)?;
        if slot == NO_SLOT || self.owners[slot as usize] != SlotOwner::Owned(actor) {
            return None;
        }
        Some(slot as usize)
    }

    pub fn get(&self, actor: Actor) -> Option<&T> {
        let slot = self.slot_of(actor)?;
        self.values.get(slot).ok()
    }

    pub fn get_mut(&mut self, actor: Actor) -> Option<&mut T> {
        let slot = self.slot_of(actor)?;
        self.values.get_mut(slot).ok()
    }

    pub fn insert(&mut self, actor: Actor, value: T) -> Result<&mut T, ActorError> {
        if self.slot_of(actor).is_some() {
            return Err(ActorError::ComponentAlreadyPresent {
                actor,
                component: self.meta.name,
            });
        }
        if self.abandoned_count == 0 {
            self.add_page();
        }

        let slot = self.next_abandoned;
        let next = match self.owners[slot as usize] {
            SlotOwner::Abandoned { next } => next,
            SlotOwner::Owned(owner) => {
                unreachable!("abandoned list reached slot {slot} owned by {owner}")
            }
        };
        self.next_abandoned = next;
        self.abandoned_count -= 1;
        if self.abandoned_count == 0 {
            self.next_abandoned = NO_SLOT;
            self.last_abandoned = NO_SLOT;
        }

        self.owners[slot as usize] = SlotOwner::Owned(actor);
        self.add_empty_actors(actor.index() as usize + 1);
        self.actor_slots[actor.index() as usize] = slot;

        let row = self
            .values
            .get_mut(slot as usize)
            .expect("abandoned slots are backed by allocated pages");
        *row = value;
        Ok(row)
    }

    fn add_page(&mut self) {
        let span = self.values.push_page();
        let first = span.start as u32;
        let last = (span.end - 1) as u32;
        self.owners.extend(span.map(|slot| SlotOwner::Abandoned {
            next: if slot as u32 == last { NO_SLOT } else { slot as u32 + 1 },
        }));

        if self.abandoned_count == 0 {
            self.next_abandoned = first;
        } else {
            self.owners[self.last_abandoned as usize] = SlotOwner::Abandoned { next: first };
        }
        self.last_abandoned = last;
        self.abandoned_count += COMPONENT_PAGE_SIZE;

        tracing::trace!(
            component = self.meta.name,
            pages = self.page_count(),
            stored = self.len(),
            "allocated component page"
        );
    }

    fn abandon(&mut self, slot: usize) {
        self.owners[slot] = SlotOwner::Abandoned { next: NO_SLOT };
        if self.abandoned_count == 0 {
            self.next_abandoned = slot as u32;
        } else {
            self.owners[self.last_abandoned as usize] = SlotOwner::Abandoned { next: slot as u32 };
        }
        self.last_abandoned = slot as u32;
        self.abandoned_count += 1;
    }
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn mask(&self) -> ComponentMask {
        self.meta.mask()
    }

    fn name(&self) -> &'static str {
        self.meta.name
    }

    fn add_empty_actor(&mut self) {
        self.actor_slots.push(NO_SLOT);
    }

    fn has(&self, actor: Actor) -> bool {
        self.slot_of(actor).is_some()
    }

    fn remove(&mut self, actor: Actor) -> bool {
        let Some(slot) = self.slot_of(actor) else {
            return false;
        };

        if let Ok(value) = self.values.get(slot) {
            let event = ComponentRemoved::new(actor);
            for listener in &mut self.listeners {
                listener(&event, value);
            }
        }
        // Swapping in a default drops the old value here, exactly once.
        drop(self.values.take(slot));

        self.actor_slots[actor.index() as usize] = NO_SLOT;
        self.abandon(slot);
        true
    }

    fn remove_all(&mut self) -> usize {
        let owned: Vec<Actor> = self
            .owners
            .iter()
            .filter_map(|owner| match owner {
                SlotOwner::Owned(actor) => Some(*actor),
                SlotOwner::Abandoned { .. } => None,
            })
            .collect();
        for actor in &owned {
            self.remove(*actor);
        }
        owned.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::register_component;
    use crate::actors::test_components::{Health, Position, Resource};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store<T: Component>(population: usize) -> ComponentStore<T> {
        let mut store = ComponentStore::new(register_component::<T>().unwrap());
        store.add_empty_actors(population);
        store
    }

    #[test]
    fn insert_get_remove() {
        let mut positions = store::<Position>(2);
        let actor = Actor::new(1, 0);
        positions.insert(actor, Position { x: 1.0, y: 2.0 }).unwrap();
        assert!(positions.has(actor));
        assert_eq!(positions.get(actor), Some(&Position { x: 1.0, y: 2.0 }));
        assert_eq!(positions.len(), 1);
        assert_eq!(positions.page_count(), 1);

        assert!(positions.remove(actor));
        assert!(!positions.has(actor));
        assert!(!positions.remove(actor));
        assert_eq!(positions.len(), 0);
    }

    #[test]
    fn duplicate_insert_is_an_error() {
        let mut health = store::<Health>(1);
        let actor = Actor::new(0, 0);
        health.insert(actor, Health(3)).unwrap();
        let err = health.insert(actor, Health(4)).unwrap_err();
        assert!(matches!(err, ActorError::ComponentAlreadyPresent { .. }));
        assert_eq!(health.get(actor), Some(&Health(3)));
    }

    #[test]
    fn stale_handle_does_not_see_new_owner() {
        let mut health = store::<Health>(1);
        let old = Actor::new(0, 0);
        let new = Actor::new(0, 1);
        health.insert(old, Health(1)).unwrap();
        health.remove(old);
        health.insert(new, Health(2)).unwrap();
        assert!(health.get(old).is_none());
        assert_eq!(health.get(new), Some(&Health(2)));
    }

    #[test]
    fn abandoned_slots_are_reused_from_the_tail() {
        let mut health = store::<Health>(3);
        let actors: Vec<Actor> = (0..3).map(|i| Actor::new(i, 0)).collect();
        for (i, actor) in actors.iter().enumerate() {
            health.insert(*actor, Health(i as i32)).unwrap();
        }
        let first_addr = health.get(actors[0]).unwrap() as *const Health;
        health.remove(actors[0]);

        // Slots 3..255 of the first page were abandoned before slot 0, so
        // the freed slot goes to the back of the line.
        let late = Actor::new(3, 0);
        health.insert(late, Health(9)).unwrap();
        assert_ne!(health.get(late).unwrap() as *const Health, first_addr);
    }

    #[test]
    fn page_overflow_keeps_addresses() {
        let population = COMPONENT_PAGE_SIZE + 10;
        let mut health = store::<Health>(population);
        health.insert(Actor::new(0, 0), Health(7)).unwrap();
        let addr = health.get(Actor::new(0, 0)).unwrap() as *const Health;
        for i in 1..population as u32 {
            health.insert(Actor::new(i, 0), Health(i as i32)).unwrap();
        }
        assert_eq!(health.page_count(), 2);
        assert_eq!(health.get(Actor::new(0, 0)).unwrap() as *const Health, addr);
        assert_eq!(health.len(), population);
    }

    #[test]
    fn listener_sees_value_before_reset_and_value_is_dropped() {
        let mut resources = store::<Resource>(1);
        let actor = Actor::new(0, 0);
        let shared = Rc::new(5);
        resources.insert(actor, Resource(Some(shared.clone()))).unwrap();
        assert_eq!(Rc::strong_count(&shared), 2);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        resources.listen(Box::new(move |event: &ComponentRemoved<Resource>, value: &Resource| {
            sink.borrow_mut()
                .push((event.actor, value.0.as_deref().copied()));
        }));

        resources.remove(actor);
        assert_eq!(*seen.borrow(), vec![(actor, Some(5))]);
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn remove_all_empties_the_store() {
        let mut health = store::<Health>(4);
        for i in 0..4 {
            health.insert(Actor::new(i, 0), Health(1)).unwrap();
        }
        assert_eq!(health.remove_all(), 4);
        assert_eq!(health.len(), 0);
        assert!(!health.has(Actor::new(2, 0)));
    }
}
