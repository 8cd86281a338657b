use crate::actors::{Actor, ActorId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActorError {
    #[error("actor {actor} already has a {component} component")]
    ComponentAlreadyPresent {
        actor: Actor,
        component: &'static str,
    },

    #[error("actor {actor} has no {component} component")]
    ComponentMissing {
        actor: Actor,
        component: &'static str,
    },

    #[error("actor {actor} is not alive")]
    ActorNotAlive { actor: Actor },

    #[error("maximum number of simultaneous actors reached ({max})")]
    ActorCapacityExhausted { max: u32 },

    #[error("slot {index} reached the maximum actor version")]
    GenerationExhausted { index: ActorId },

    #[error("cannot register {component}: all {max} component bits are taken")]
    ComponentTypesExhausted { max: u32, component: &'static str },
}

/// Log a broken precondition, then panic with the same message.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: ActorError) -> ! {
    tracing::error!(error = %err, "actor manager precondition violated");
    panic!("{err}");
}
