//! Demo simulation driven by the actor manager.
//!
//! Actors are spawned on a ring, drift with their velocity, freeze briefly
//! when they hit the edge of the unit square and expire after a fixed number
//! of ticks.

use latch_actors::actors::{ActorCommands, ActorManager, ComponentRemoved, Family};
use latch_actors::define_component;
use latch_metrics::SystemProfiler;
use latch_services::settings::SimulationSettings;
use std::cell::Cell;
use std::f32::consts::PI;
use std::rc::Rc;
use tracing::{debug, info};

pub const TICK_DURATION_SECS: f32 = 1.0 / 60.0;
const FREEZE_TICKS: u32 = 5;

// ============================================================================
// Components
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Ticks left before the actor is destroyed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lifetime {
    pub remaining: u32,
}

/// Skips physics until it thaws.
#[derive(Clone, Copy, Debug, Default)]
pub struct Frozen {
    pub ticks: u32,
}

define_component!(Position, Velocity, Lifetime, Frozen);

// ============================================================================
// Systems
// ============================================================================

fn spawn_system(manager: &mut ActorManager, settings: &SimulationSettings, tick: u32) {
    let count = settings.spawn_per_tick.max(1);
    for i in 0..settings.spawn_per_tick {
        let angle = (i as f32 / count as f32) * 2.0 * PI + tick as f32 * 0.1;
        let radius = 0.5 + (i as f32 / count as f32) * 0.3;

        let actor = manager.create_actor();
        manager.add_component(
            actor,
            Position {
                x: angle.cos() * radius,
                y: angle.sin() * radius,
            },
        );
        manager.add_component(
            actor,
            Velocity {
                x: (angle + PI / 2.0).cos() * 0.2,
                y: (angle + PI / 2.0).sin() * 0.2,
            },
        );
        manager.add_component(
            actor,
            Lifetime {
                remaining: settings.lifetime_ticks,
            },
        );
    }
}

fn physics_system(manager: &mut ActorManager, movers: &Family, dt: f32) -> usize {
    let actors = manager.get_actors_for(movers).to_vec();
    let mut bounced = 0;

    for actor in actors {
        let mut velocity = *manager.get_component::<Velocity>(actor);
        let position = manager.get_component_mut::<Position>(actor);
        let mut new_x = position.x + velocity.x * dt;
        let mut new_y = position.y + velocity.y * dt;

        let bounce_x = !(-1.0..=1.0).contains(&new_x);
        let bounce_y = !(-1.0..=1.0).contains(&new_y);
        if bounce_x {
            new_x = new_x.clamp(-1.0, 1.0);
            velocity.x = -velocity.x;
        }
        if bounce_y {
            new_y = new_y.clamp(-1.0, 1.0);
            velocity.y = -velocity.y;
        }
        position.x = new_x;
        position.y = new_y;

        if bounce_x || bounce_y {
            *manager.get_component_mut::<Velocity>(actor) = velocity;
            manager.add_component(actor, Frozen { ticks: FREEZE_TICKS });
            bounced += 1;
        }
    }
    bounced
}

fn thaw_system(manager: &mut ActorManager, frozen: &Family) {
    for actor in manager.get_actors_for(frozen).to_vec() {
        let state = manager.get_component_mut::<Frozen>(actor);
        state.ticks = state.ticks.saturating_sub(1);
        if state.ticks == 0 {
            manager.remove_component::<Frozen>(actor);
        }
    }
}

fn lifetime_system(manager: &mut ActorManager, aging: &Family, commands: &mut ActorCommands) {
    for actor in manager.get_actors_for(aging).to_vec() {
        let lifetime = manager.get_component_mut::<Lifetime>(actor);
        if lifetime.remaining == 0 {
            commands.destroy(actor);
        } else {
            lifetime.remaining -= 1;
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

pub struct Simulation {
    settings: SimulationSettings,
    tick: u32,
    movers: Family,
    frozen: Family,
    aging: Family,
    commands: ActorCommands,
    expired: Rc<Cell<u64>>,
    bounced: u64,
}

impl Simulation {
    pub fn new(settings: &SimulationSettings) -> Self {
        Self {
            settings: settings.clone(),
            tick: 0,
            movers: Family::all::<(Position, Velocity)>().exclude::<Frozen>().get(),
            frozen: Family::all::<Frozen>().get(),
            aging: Family::all::<Lifetime>().get(),
            commands: ActorCommands::new(),
            expired: Rc::new(Cell::new(0)),
            bounced: 0,
        }
    }

    /// Hook the simulation's listeners into `manager`.
    pub fn install(&self, manager: &mut ActorManager) {
        let expired = self.expired.clone();
        manager.on_component_removed(move |_: &ComponentRemoved<Lifetime>, lifetime: &Lifetime| {
            if lifetime.remaining == 0 {
                expired.set(expired.get() + 1);
            }
        });
    }

    pub fn tick(&mut self, manager: &mut ActorManager, profiler: &mut SystemProfiler) {
        let tick = self.tick;
        profiler.time_system("spawn", || spawn_system(manager, &self.settings, tick));
        let bounced = profiler.time_system("physics", || {
            physics_system(manager, &self.movers, TICK_DURATION_SECS)
        });
        profiler.time_system("thaw", || thaw_system(manager, &self.frozen));
        profiler.time_system("lifetime", || {
            lifetime_system(manager, &self.aging, &mut self.commands)
        });
        let destroyed = self.commands.apply(manager);

        self.bounced += bounced as u64;
        self.tick += 1;
        debug!(tick, bounced, destroyed, "tick complete");

        if self.tick % self.settings.report_every.max(1) == 0 {
            info!(
                tick = self.tick,
                alive = manager.actor_count(),
                moving = manager.actors_for(&self.movers).count(),
                frozen = manager.actors_for(&self.frozen).count(),
                expired = self.expired(),
                "simulation report"
            );
        }
    }

    pub fn ticks_run(&self) -> u32 {
        self.tick
    }

    pub fn expired(&self) -> u64 {
        self.expired.get()
    }

    pub fn bounced(&self) -> u64 {
        self.bounced
    }
}
