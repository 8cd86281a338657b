// component.rs - Component type registration
//
// Every component type gets one bit of the 64-bit component mask the first
// time it is seen. Bits are process-wide and never reassigned, so a Family
// built anywhere agrees with every ActorManager.

use crate::actors::{fatal, ActorError, ComponentMask};
use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Number of distinct component types one mask can describe.
pub const MAX_COMPONENTS: u32 = u64::BITS;

/// Registry entry for one component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentMeta {
    pub bit: u32,
    pub name: &'static str,
}

impl ComponentMeta {
    #[inline]
    pub fn mask(&self) -> ComponentMask {
        ComponentMask::from_bit(self.bit)
    }
}

#[derive(Default)]
struct Registry {
    by_type: HashMap<TypeId, ComponentMeta>,
    next_bit: u32,
}

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::default()));

// The registry is only mutated by a single insert, so a poisoned lock still
// holds a consistent map.
fn read_registry() -> RwLockReadGuard<'static, Registry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_registry() -> RwLockWriteGuard<'static, Registry> {
    REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

/// Assign `T` its mask bit, or return the one it already has.
pub fn register_component<T: Component>() -> Result<ComponentMeta, ActorError> {
    let type_id = TypeId::of::<T>();
    if let Some(meta) = read_registry().by_type.get(&type_id) {
        return Ok(meta.clone());
    }

    let mut registry = write_registry();
    if let Some(meta) = registry.by_type.get(&type_id) {
        return Ok(meta.clone());
    }
    if registry.next_bit >= MAX_COMPONENTS {
        return Err(ActorError::ComponentTypesExhausted {
            max: MAX_COMPONENTS,
            component: type_name::<T>(),
        });
    }

    let meta = ComponentMeta {
        bit: registry.next_bit,
        name: type_name::<T>(),
    };
    registry.next_bit += 1;
    registry.by_type.insert(type_id, meta.clone());
    tracing::debug!(component = meta.name, bit = meta.bit, "registered component type");
    Ok(meta)
}

/// Look up `T` without registering it.
pub fn meta_of<T: Component>() -> Option<ComponentMeta> {
    read_registry().by_type.get(&TypeId::of::<T>()).cloned()
}

/// Mask bit of `T`, registering it on first use. Running out of bits is fatal.
#[track_caller]
pub fn mask_of<T: Component>() -> ComponentMask {
    match register_component::<T>() {
        Ok(meta) => meta.mask(),
        Err(err) => fatal(err),
    }
}

/// Data record attachable to an actor.
///
/// Removing a component resets its slot to `Default::default()`, which also
/// drops whatever the old value owned.
pub trait Component: Default + 'static {}

/// One component type or a tuple of them, folded into a single mask.
pub trait ComponentSet {
    fn mask() -> ComponentMask;
}

macro_rules! impl_component_set {
    ($($ty:ident),+) => {
        impl<$($ty: Component),+> ComponentSet for ($($ty,)+) {
            fn mask() -> ComponentMask {
                ComponentMask::EMPTY $(| mask_of::<$ty>())+
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

/// Helper macro to implement [`Component`] and [`ComponentSet`] for types.
///
/// # Example
/// ```ignore
/// #[derive(Default)]
/// struct Position { x: f32, y: f32 }
///
/// define_component!(Position);
/// ```
#[macro_export]
macro_rules! define_component {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::actors::Component for $ty {}

            impl $crate::actors::ComponentSet for $ty {
                fn mask() -> $crate::actors::ComponentMask {
                    $crate::actors::mask_of::<$ty>()
                }
            }
        )+
    };
}
