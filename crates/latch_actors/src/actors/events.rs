use crate::actors::Actor;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

/// Raised right before an actor's `T` component is reset.
pub struct ComponentRemoved<T> {
    pub actor: Actor,
    _component: PhantomData<fn() -> T>,
}

impl<T> ComponentRemoved<T> {
    pub(crate) fn new(actor: Actor) -> Self {
        Self {
            actor,
            _component: PhantomData,
        }
    }

    /// Event name, one per component type.
    pub fn name() -> String {
        format!("evt_component_removed_{}", type_name::<T>())
    }
}

impl<T> Clone for ComponentRemoved<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentRemoved<T> {}

impl<T> fmt::Debug for ComponentRemoved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRemoved")
            .field("component", &type_name::<T>())
            .field("actor", &self.actor)
            .finish()
    }
}

impl<T> fmt::Display for ComponentRemoved<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from actor: {}", type_name::<T>(), self.actor)
    }
}

/// Synchronous removal listener. Sees the event and the value being removed.
pub type RemovalListener<T> = Box<dyn FnMut(&ComponentRemoved<T>, &T)>;
