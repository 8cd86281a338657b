//! Named counters for tracking events

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Counter {
    counters: HashMap<&'static str, u64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, name: &'static str, value: u64) {
        *self.counters.entry(name).or_insert(0) += value;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn reset_all(&mut self) {
        self.counters.clear();
    }

    /// Counters sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> {
        let mut entries: Vec<_> = self.counters.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_accumulate() {
        let mut counter = Counter::new();
        counter.increment("spawned", 2);
        counter.increment("spawned", 3);
        counter.increment("despawned", 1);
        assert_eq!(counter.get("spawned"), 5);
        assert_eq!(counter.get("missing"), 0);
        assert_eq!(
            counter.iter().collect::<Vec<_>>(),
            vec![("despawned", 1), ("spawned", 5)]
        );
        counter.reset_all();
        assert_eq!(counter.get("spawned"), 0);
    }
}
