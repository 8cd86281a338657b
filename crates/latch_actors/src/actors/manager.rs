//! Actor manager
//!
//! Owns everything: the slot table, one mask per actor, one store per
//! component type (created on first use) and the cached family sets. Every
//! structural change goes through here so that the four stay consistent:
//! the store is updated first, then the actor's mask, then each cached set
//! is reconciled against the mask transition.

use crate::actors::actor_set::ActorSet;
use crate::actors::family_set::FamilyActorSet;
use crate::actors::mask::ComponentMaskSet;
use crate::actors::store::{ComponentStore, ErasedStore};
use crate::actors::table::{ActorTable, Allocation};
use crate::actors::{
    fatal, register_component, Actor, ActorError, Component, ComponentMask, ComponentRemoved,
    Family,
};
use latch_metrics::Counter;
use std::any::{type_name, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, trace};

type StoreMap = HashMap<TypeId, Box<dyn ErasedStore>>;

#[derive(Default)]
pub struct ActorManager {
    actors: ActorTable,
    masks: ComponentMaskSet,
    stores: StoreMap,
    families: HashMap<Family, FamilyActorSet>,
    counters: Counter,
}

impl ActorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the slot table and mask registry for `capacity` actors.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            actors: ActorTable::with_capacity(capacity),
            masks: ComponentMaskSet::with_capacity(capacity),
            ..Self::default()
        }
    }

    #[track_caller]
    pub fn create_actor(&mut self) -> Actor {
        let allocation = match self.actors.allocate() {
            Ok(allocation) => allocation,
            Err(err) => fatal(err),
        };
        if let Allocation::Grown(_) = allocation {
            for store in self.stores.values_mut() {
                store.add_empty_actor();
            }
            self.masks.add_empty_actor();
        }
        let actor = allocation.actor();

        for set in self.families.values_mut() {
            if set.family().matches(ComponentMask::EMPTY) {
                set.add(actor);
            }
        }

        self.counters.increment("actors.created", 1);
        trace!(%actor, "created actor");
        actor
    }

    #[inline]
    pub fn is_actor_alive(&self, actor: Actor) -> bool {
        self.actors.is_alive(actor)
    }

    /// Destroy `actor` and every component it holds. Dead handles are ignored.
    pub fn destroy_actor(&mut self, actor: Actor) {
        if !self.actors.is_alive(actor) {
            return;
        }

        let previous = self.masks.mask(actor);
        for store in self.stores.values_mut() {
            if previous.intersects(store.mask()) {
                store.remove(actor);
            }
        }
        self.masks.clear(actor);
        for set in self.families.values_mut() {
            set.remove(actor);
        }
        self.actors.release(actor);

        self.counters.increment("actors.destroyed", 1);
        trace!(%actor, "destroyed actor");
    }

    /// Destroy the whole population. Each store is swept once.
    pub fn destroy_all_actors(&mut self) {
        let destroyed = self.actors.live_count();
        if destroyed == 0 {
            return;
        }

        for store in self.stores.values_mut() {
            let removed = store.remove_all();
            trace!(component = store.name(), removed, "cleared component store");
        }
        self.masks.clear_all();
        for set in self.families.values_mut() {
            set.clear();
        }
        self.actors.release_all();

        self.counters.increment("actors.destroyed", destroyed as u64);
        debug!(destroyed, "destroyed all actors");
    }

    /// Destroy every actor currently matching `family`.
    pub fn destroy_all_actors_for(&mut self, family: &Family) {
        let doomed = self.get_actors_for(family).to_vec();
        if doomed.is_empty() {
            return;
        }

        for store in self.stores.values_mut() {
            for &actor in &doomed {
                if store.has(actor) {
                    store.remove(actor);
                }
            }
        }
        for &actor in &doomed {
            self.masks.clear(actor);
        }
        for set in self.families.values_mut() {
            if set.family() == family {
                set.clear();
            } else {
                for &actor in &doomed {
                    set.remove(actor);
                }
            }
        }
        self.actors.release_batch(&doomed);

        self.counters.increment("actors.destroyed", doomed.len() as u64);
        debug!(?family, destroyed = doomed.len(), "destroyed family");
    }

    /// Every live actor.
    pub fn get_actors(&self) -> ActorSet<'_> {
        ActorSet::population(&self.actors)
    }

    /// Actors matching `family`. The first call for a family scans the
    /// population and caches the result; later calls reuse the cached set,
    /// which every structural change keeps current.
    pub fn get_actors_for(&mut self, family: &Family) -> ActorSet<'_> {
        let set = match self.families.entry(*family) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let mut set = FamilyActorSet::new(*family);
                for actor in self.actors.alive() {
                    if family.matches(self.masks.mask(actor)) {
                        set.add(actor);
                    }
                }
                self.counters.increment("families.cached", 1);
                debug!(?family, members = set.len(), "cached family");
                entry.insert(set)
            }
        };
        ActorSet::cached(set)
    }

    /// Read-only variant of [`get_actors_for`](Self::get_actors_for): uses
    /// the cached set if there is one, otherwise filters the population
    /// without caching.
    pub fn actors_for(&self, family: &Family) -> ActorSet<'_> {
        match self.families.get(family) {
            Some(set) => ActorSet::cached(set),
            None => ActorSet::filtered(&self.actors, &self.masks, *family),
        }
    }

    pub fn actor_count(&self) -> usize {
        self.actors.live_count()
    }

    pub fn cached_family_count(&self) -> usize {
        self.families.len()
    }

    /// Empty mask for dead handles.
    pub fn get_component_mask(&self, actor: Actor) -> ComponentMask {
        if self.actors.is_alive(actor) {
            self.masks.mask(actor)
        } else {
            ComponentMask::EMPTY
        }
    }

    pub fn counters(&self) -> &Counter {
        &self.counters
    }

    /// Attach `value` to `actor`. Fatal if the actor is dead or already has a `T`.
    #[track_caller]
    pub fn add_component<T: Component>(&mut self, actor: Actor, value: T) -> &mut T {
        match self.try_add_component(actor, value) {
            Ok(component) => component,
            Err(err) => fatal(err),
        }
    }

    pub fn try_add_component<T: Component>(
        &mut self,
        actor: Actor,
        value: T,
    ) -> Result<&mut T, ActorError> {
        if !self.actors.is_alive(actor) {
            return Err(ActorError::ActorNotAlive { actor });
        }

        let store = Self::store_entry::<T>(&mut self.stores, self.actors.len())?;
        let component = store.mask();
        let stored = store.insert(actor, value)?;

        let previous = self.masks.mask(actor);
        self.masks.add_component(actor, component);
        let current = previous | component;
        for set in self.families.values_mut() {
            set.reconcile(actor, previous, current);
        }

        self.counters.increment("components.added", 1);
        Ok(stored)
    }

    /// Detach `T` from `actor`, notifying removal listeners first. No-op if absent.
    pub fn remove_component<T: Component>(&mut self, actor: Actor) {
        if !self.actors.is_alive(actor) {
            return;
        }
        let Some(store) = self.stores.get_mut(&TypeId::of::<T>()) else {
            return;
        };
        if !store.remove(actor) {
            return;
        }

        let component = store.mask();
        let previous = self.masks.mask(actor);
        self.masks.remove_component(actor, component);
        let current = previous.without(component);
        for set in self.families.values_mut() {
            set.reconcile(actor, previous, current);
        }

        self.counters.increment("components.removed", 1);
        trace!(%actor, component = store.name(), "removed component");
    }

    pub fn has_component<T: Component>(&self, actor: Actor) -> bool {
        self.actors.is_alive(actor)
            && self
                .store::<T>()
                .is_some_and(|store| self.masks.has_component(actor, store.mask()))
    }

    /// Fatal if the actor is dead or has no `T`.
    #[track_caller]
    pub fn get_component<T: Component>(&self, actor: Actor) -> &T {
        match self.try_get_component(actor) {
            Ok(component) => component,
            Err(err) => fatal(err),
        }
    }

    #[track_caller]
    pub fn get_component_mut<T: Component>(&mut self, actor: Actor) -> &mut T {
        match self.try_get_component_mut(actor) {
            Ok(component) => component,
            Err(err) => fatal(err),
        }
    }

    pub fn try_get_component<T: Component>(&self, actor: Actor) -> Result<&T, ActorError> {
        if !self.actors.is_alive(actor) {
            return Err(ActorError::ActorNotAlive { actor });
        }
        self.store::<T>()
            .and_then(|store| store.get(actor))
            .ok_or(ActorError::ComponentMissing {
                actor,
                component: type_name::<T>(),
            })
    }

    pub fn try_get_component_mut<T: Component>(
        &mut self,
        actor: Actor,
    ) -> Result<&mut T, ActorError> {
        if !self.actors.is_alive(actor) {
            return Err(ActorError::ActorNotAlive { actor });
        }
        self.stores
            .get_mut(&TypeId::of::<T>())
            .and_then(|store| store.as_any_mut().downcast_mut::<ComponentStore<T>>())
            .and_then(|store| store.get_mut(actor))
            .ok_or(ActorError::ComponentMissing {
                actor,
                component: type_name::<T>(),
            })
    }

    /// Register a synchronous listener for removals of `T`. Listeners run
    /// before the component is reset and see its final value.
    #[track_caller]
    pub fn on_component_removed<T, F>(&mut self, listener: F)
    where
        T: Component,
        F: FnMut(&ComponentRemoved<T>, &T) + 'static,
    {
        match Self::store_entry::<T>(&mut self.stores, self.actors.len()) {
            Ok(store) => store.listen(Box::new(listener)),
            Err(err) => fatal(err),
        }
    }

    fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|store| store.as_any().downcast_ref())
    }

    // Takes the map rather than `self` so callers can keep the store borrowed
    // while touching masks and families.
    fn store_entry<T: Component>(
        stores: &mut StoreMap,
        population: usize,
    ) -> Result<&mut ComponentStore<T>, ActorError> {
        let store = match stores.entry(TypeId::of::<T>()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let meta = register_component::<T>()?;
                debug!(component = meta.name, bit = meta.bit, "created component store");
                let mut store = ComponentStore::<T>::new(meta);
                store.add_empty_actors(population);
                entry.insert(Box::new(store))
            }
        };
        Ok(store
            .as_any_mut()
            .downcast_mut()
            .expect("component stores are keyed by their own TypeId"))
    }
}

impl std::fmt::Debug for ActorManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorManager")
            .field("actors", &self.actors.live_count())
            .field("slots", &self.actors.len())
            .field("free_slots", &self.actors.free_count())
            .field("stores", &self.stores.len())
            .field("families", &self.families.len())
            .finish()
    }
}
