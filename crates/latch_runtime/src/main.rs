//! Latch Actors Runtime
//!
//! Boots logging and settings, then drives the demo simulation over an
//! actor manager for the configured number of ticks.

mod simulation;

use anyhow::{Context, Result};
use latch_actors::actors::ActorManager;
use latch_metrics::SystemProfiler;
use latch_services::Settings;
use simulation::Simulation;
use tracing_subscriber::EnvFilter;

const DEFAULT_SETTINGS_PATH: &str = "latch.json";

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let settings =
        Settings::load(&path).with_context(|| format!("loading settings from {path}"))?;

    // RUST_LOG wins over the settings file
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.filter))
        .context("invalid logging filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Latch Actors v{}", latch_actors::VERSION);
    tracing::info!(
        ticks = settings.simulation.ticks,
        spawn_per_tick = settings.simulation.spawn_per_tick,
        lifetime_ticks = settings.simulation.lifetime_ticks,
        "starting simulation"
    );

    let mut manager = ActorManager::with_capacity(settings.actors.initial_capacity);
    let mut profiler = SystemProfiler::new();
    let mut simulation = Simulation::new(&settings.simulation);
    simulation.install(&mut manager);

    for _ in 0..settings.simulation.ticks {
        simulation.tick(&mut manager, &mut profiler);
    }

    tracing::info!(
        ticks = simulation.ticks_run(),
        alive = manager.actor_count(),
        expired = simulation.expired(),
        bounced = simulation.bounced(),
        cached_families = manager.cached_family_count(),
        "simulation finished"
    );

    latch_metrics::metrics! {
        for (name, timing) in profiler.iter() {
            tracing::info!(
                system = name,
                calls = timing.calls,
                average_us = timing.average().as_micros() as u64,
                "system timing"
            );
        }
        for (name, value) in manager.counters().iter() {
            tracing::info!(counter = name, value, "actor counter");
        }
    }

    manager.destroy_all_actors();
    Ok(())
}
