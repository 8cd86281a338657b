//! Component-presence predicates.
//!
//! A [`Family`] is three masks:
//! - `all`: every one of these types must be present
//! - `one`: at least one of these must be present (ignored when empty)
//! - `exclude`: none of these may be present
//!
//! Families are plain `Copy` values with structural equality and hashing, so
//! the manager keys its cached actor sets by them.
//!
//! ```ignore
//! let movers = Family::all::<(Position, Velocity)>()
//!     .exclude::<Frozen>()
//!     .get();
//! ```

use crate::actors::{Actor, ActorManager, ComponentMask, ComponentSet};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Family {
    all: ComponentMask,
    one: ComponentMask,
    exclude: ComponentMask,
}

impl Family {
    /// Matches every actor, including ones without components.
    pub const fn everything() -> Self {
        Self {
            all: ComponentMask::EMPTY,
            one: ComponentMask::EMPTY,
            exclude: ComponentMask::EMPTY,
        }
    }

    pub fn all<S: ComponentSet>() -> FamilyBuilder {
        FamilyBuilder::default().all::<S>()
    }

    pub fn one<S: ComponentSet>() -> FamilyBuilder {
        FamilyBuilder::default().one::<S>()
    }

    pub fn exclude<S: ComponentSet>() -> FamilyBuilder {
        FamilyBuilder::default().exclude::<S>()
    }

    #[inline]
    pub const fn all_mask(&self) -> ComponentMask {
        self.all
    }

    #[inline]
    pub const fn one_mask(&self) -> ComponentMask {
        self.one
    }

    #[inline]
    pub const fn exclude_mask(&self) -> ComponentMask {
        self.exclude
    }

    #[inline]
    pub const fn matches(&self, mask: ComponentMask) -> bool {
        mask.contains_all(self.all)
            && (self.one.is_empty() || mask.intersects(self.one))
            && !mask.intersects(self.exclude)
    }

    /// Test a live actor's current components. Dead actors never match.
    pub fn matches_actor(&self, manager: &ActorManager, actor: Actor) -> bool {
        manager.is_actor_alive(actor) && self.matches(manager.get_component_mask(actor))
    }
}

/// Chainable [`Family`] constructor. Each call ORs into the matching mask.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[must_use = "call .get() to finish the family"]
pub struct FamilyBuilder {
    family: Family,
}

impl FamilyBuilder {
    pub fn all<S: ComponentSet>(mut self) -> Self {
        self.family.all |= S::mask();
        self
    }

    pub fn one<S: ComponentSet>(mut self) -> Self {
        self.family.one |= S::mask();
        self
    }

    pub fn exclude<S: ComponentSet>(mut self) -> Self {
        self.family.exclude |= S::mask();
        self
    }

    pub fn get(self) -> Family {
        self.family
    }
}

impl From<FamilyBuilder> for Family {
    fn from(builder: FamilyBuilder) -> Self {
        builder.get()
    }
}
