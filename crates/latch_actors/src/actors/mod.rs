//! Actors, components and families.
//!
//! An actor is an identity plus an open set of components. Systems ask the
//! [`ActorManager`] for every actor matching a [`Family`] each tick; the
//! manager answers from a cached set that it keeps current as components
//! come and go, so a steady-state query does not rescan the population.

mod actor;
mod actor_set;
mod commands;
mod component;
mod error;
mod events;
mod family;
mod family_set;
mod manager;
mod mask;
mod store;
mod table;

pub use actor::{Actor, ActorId, ActorVersion, ACTOR_INVALID, ACTOR_MAX_VERSION};
pub use actor_set::{ActorSet, Iter as ActorSetIter};
pub use commands::ActorCommands;
pub use component::{
    mask_of, meta_of, register_component, Component, ComponentMeta, ComponentSet, MAX_COMPONENTS,
};
pub use error::ActorError;
pub(crate) use error::fatal;
pub use events::{ComponentRemoved, RemovalListener};
pub use family::{Family, FamilyBuilder};
pub use manager::ActorManager;
pub use mask::ComponentMask;
pub use store::COMPONENT_PAGE_SIZE;
