//! Latch Services Layer
//!
//! Platform-facing pieces the simulation needs before it starts. For now
//! that is settings: loading, defaults and validation.

pub mod settings;

pub use settings::{Settings, SettingsError};
