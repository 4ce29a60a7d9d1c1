//! Named counters for runtime statistics.

use serde::Serialize;
use std::collections::BTreeMap;

/// A fixed set of named counters.
///
/// Names must be registered up front; increments of unknown names are
/// ignored so a typo can never grow the set.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Counters {
    counters: BTreeMap<&'static str, u64>,
}

impl Counters {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            counters: names.iter().map(|&name| (name, 0)).collect(),
        }
    }

    pub fn increment(&mut self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get_mut(name) {
            *counter = counter.saturating_add(value);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }
}
