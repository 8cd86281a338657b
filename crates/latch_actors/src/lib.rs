//! Latch Actors
//!
//! Actor/component core for the simulation:
//! - Generational actor handles with slot recycling
//! - Paged, address-stable component storage per type
//! - Family queries with incrementally cached results

pub mod actors;
pub mod pool;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
