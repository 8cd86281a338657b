//! One iteration surface for every "set of actors" the manager hands out.
//!
//! Whether the actors come from the whole population, from a cached family
//! set, or from an uncached filtered scan, callers get an [`ActorSet`] and
//! iterate it the same way. The set borrows the manager, so structural
//! changes found while iterating go through
//! [`ActorCommands`](crate::actors::ActorCommands) or `to_vec()`.

use crate::actors::family_set::FamilyActorSet;
use crate::actors::mask::ComponentMaskSet;
use crate::actors::table::ActorTable;
use crate::actors::{Actor, Family};
use std::iter::Enumerate;
use std::slice;

#[derive(Clone, Copy)]
pub struct ActorSet<'a> {
    source: Source<'a>,
}

#[derive(Clone, Copy)]
enum Source<'a> {
    Population(&'a ActorTable),
    Cached(&'a FamilyActorSet),
    Filtered {
        table: &'a ActorTable,
        masks: &'a ComponentMaskSet,
        family: Family,
    },
}

impl<'a> ActorSet<'a> {
    pub(crate) fn population(table: &'a ActorTable) -> Self {
        Self {
            source: Source::Population(table),
        }
    }

    pub(crate) fn cached(set: &'a FamilyActorSet) -> Self {
        Self {
            source: Source::Cached(set),
        }
    }

    pub(crate) fn filtered(table: &'a ActorTable, masks: &'a ComponentMaskSet, family: Family) -> Self {
        Self {
            source: Source::Filtered {
                table,
                masks,
                family,
            },
        }
    }

    /// Call `f` once per actor in the set.
    pub fn each<F: FnMut(Actor)>(&self, f: F) {
        self.iter().for_each(f);
    }

    pub fn count(&self) -> usize {
        match self.source {
            Source::Population(table) => table.live_count(),
            Source::Cached(set) => set.len(),
            Source::Filtered { .. } => self.iter().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.source {
            Source::Population(table) => table.live_count() == 0,
            Source::Cached(set) => set.len() == 0,
            Source::Filtered { .. } => self.iter().next().is_none(),
        }
    }

    pub fn contains(&self, actor: Actor) -> bool {
        match self.source {
            Source::Population(table) => table.is_alive(actor),
            Source::Cached(set) => set.contains(actor),
            Source::Filtered {
                table,
                masks,
                family,
            } => table.is_alive(actor) && family.matches(masks.mask(actor)),
        }
    }

    pub fn iter(&self) -> Iter<'a> {
        let inner = match self.source {
            Source::Population(table) => IterInner::Slots {
                slots: table.slots().iter().enumerate(),
                filter: None,
            },
            Source::Cached(set) => IterInner::Members(set.members().iter()),
            Source::Filtered {
                table,
                masks,
                family,
            } => IterInner::Slots {
                slots: table.slots().iter().enumerate(),
                filter: Some((masks, family)),
            },
        };
        Iter { inner }
    }

    /// Snapshot of the current members, detached from the manager borrow.
    pub fn to_vec(&self) -> Vec<Actor> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for ActorSet<'a> {
    type Item = Actor;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<'a> IntoIterator for &ActorSet<'a> {
    type Item = Actor;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl std::fmt::Debug for ActorSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over an [`ActorSet`].
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Slots {
        slots: Enumerate<slice::Iter<'a, Actor>>,
        filter: Option<(&'a ComponentMaskSet, Family)>,
    },
    Members(slice::Iter<'a, Actor>),
}

impl Iterator for Iter<'_> {
    type Item = Actor;

    fn next(&mut self) -> Option<Actor> {
        match &mut self.inner {
            IterInner::Members(members) => members.next().copied(),
            IterInner::Slots { slots, filter } => {
                let filter = *filter;
                slots.find_map(|(index, &slot)| {
                    // Dead slots hold a free-list link instead of their own index.
                    let alive = slot.index() as usize == index;
                    let selected = match filter {
                        None => true,
                        Some((masks, family)) => family.matches(masks.mask(slot)),
                    };
                    (alive && selected).then_some(slot)
                })
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Members(members) => members.size_hint(),
            IterInner::Slots { slots, .. } => (0, slots.size_hint().1),
        }
    }
}
