//! Deferred structural changes.
//!
//! Systems iterate an [`ActorSet`](crate::actors::ActorSet) while holding a
//! borrow of the manager, so they record what they want to change here and
//! apply it once iteration is done. Commands run in recording order.

use crate::actors::{Actor, ActorManager, Component};
use std::fmt;

type Command = Box<dyn FnOnce(&mut ActorManager)>;

#[derive(Default)]
pub struct ActorCommands {
    queue: Vec<Command>,
}

impl ActorCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Create an actor and hand it to `build` when applied.
    pub fn spawn<F>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut ActorManager, Actor) + 'static,
    {
        self.queue.push(Box::new(move |manager: &mut ActorManager| {
            let actor = manager.create_actor();
            build(manager, actor);
        }));
        self
    }

    /// Destroy `actor`. Safe to record more than once for the same actor.
    pub fn destroy(&mut self, actor: Actor) -> &mut Self {
        self.queue
            .push(Box::new(move |manager: &mut ActorManager| manager.destroy_actor(actor)));
        self
    }

    /// Attach `value`, unless the actor is gone by the time this runs.
    pub fn add<T: Component>(&mut self, actor: Actor, value: T) -> &mut Self {
        self.queue.push(Box::new(move |manager: &mut ActorManager| {
            if manager.is_actor_alive(actor) {
                manager.add_component(actor, value);
            }
        }));
        self
    }

    pub fn remove<T: Component>(&mut self, actor: Actor) -> &mut Self {
        self.queue
            .push(Box::new(move |manager: &mut ActorManager| manager.remove_component::<T>(actor)));
        self
    }

    /// Run every recorded command against `manager`, leaving the buffer empty.
    pub fn apply(&mut self, manager: &mut ActorManager) -> usize {
        let applied = self.queue.len();
        for command in self.queue.drain(..) {
            command(manager);
        }
        if applied > 0 {
            tracing::trace!(applied, "applied actor commands");
        }
        applied
    }
}

impl fmt::Debug for ActorCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorCommands")
            .field("queued", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::test_components::{Health, Tag};
    use crate::actors::Family;

    #[test]
    fn commands_wait_for_apply() {
        let mut manager = ActorManager::new();
        let actor = manager.create_actor();
        let mut commands = ActorCommands::new();
        commands.add(actor, Tag).destroy(actor);
        assert_eq!(commands.len(), 2);
        assert!(manager.is_actor_alive(actor));

        assert_eq!(commands.apply(&mut manager), 2);
        assert!(commands.is_empty());
        assert!(!manager.is_actor_alive(actor));
    }

    #[test]
    fn destroy_during_iteration() {
        let mut manager = ActorManager::new();
        let with_health = Family::all::<Health>().get();
        for hp in [0, 5, 0, 8] {
            let actor = manager.create_actor();
            manager.add_component(actor, Health(hp));
        }

        let mut commands = ActorCommands::new();
        manager.actors_for(&with_health).each(|actor| {
            if manager.get_component::<Health>(actor).0 == 0 {
                commands.destroy(actor);
                commands.destroy(actor);
            }
        });
        commands.apply(&mut manager);
        assert_eq!(manager.actor_count(), 2);
    }

    #[test]
    fn add_to_an_actor_destroyed_earlier_is_skipped() {
        let mut manager = ActorManager::new();
        let actor = manager.create_actor();
        let mut commands = ActorCommands::new();
        commands.destroy(actor).add(actor, Tag).remove::<Tag>(actor);
        commands.apply(&mut manager);
        assert_eq!(manager.actor_count(), 0);
    }

    #[test]
    fn spawn_builds_the_new_actor() {
        let mut manager = ActorManager::new();
        let mut commands = ActorCommands::new();
        commands.spawn(|manager, actor| {
            manager.add_component(actor, Health(3));
        });
        commands.apply(&mut manager);
        let tagged = manager.get_actors_for(&Family::all::<Health>().get()).to_vec();
        assert_eq!(tagged.len(), 1);
        assert_eq!(manager.get_component::<Health>(tagged[0]), &Health(3));
    }
}
