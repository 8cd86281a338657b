//! System profiler for timing named systems

use crate::SystemTiming;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Default)]
pub struct SystemProfiler {
    timings: HashMap<&'static str, SystemTiming>,
}

impl SystemProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_system<F, R>(&mut self, name: &'static str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let timing = self.timings.entry(name).or_default();
        timing.total += elapsed;
        timing.calls += 1;
        result
    }

    pub fn get_timing(&self, name: &str) -> SystemTiming {
        self.timings.get(name).copied().unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }

    /// Timings sorted by total time, slowest first.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, SystemTiming)> {
        let mut entries: Vec<_> = self.timings.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_unstable_by(|a, b| b.1.total.cmp(&a.1.total));
        entries.into_iter()
    }
}
