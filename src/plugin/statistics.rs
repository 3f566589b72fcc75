//! Per-method call counters

use serde::Serialize;
use std::collections::BTreeMap;

/// Invocation attempts keyed by `"interface.method"`
///
/// Counters only grow; they are reset by `clear` alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CallStatistics {
    counters: BTreeMap<String, u64>,
}

impl CallStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(interface: &str, method: &str) -> String {
        format!("{}.{}", interface, method)
    }

    /// Count one attempt and return the new total for that key
    pub fn record(&mut self, interface: &str, method: &str) -> u64 {
        let counter = self
            .counters
            .entry(Self::key(interface, method))
            .or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn get(&self, key: &str) -> u64 {
        self.counters.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counters.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn clear(&mut self) {
        self.counters.clear();
    }
}
