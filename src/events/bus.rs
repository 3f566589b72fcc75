//! EventBus implementation
//!
//! Named-event publish/subscribe with a bounded history. Delivery is
//! synchronous: `publish` runs every handler before it returns.

use crate::core::cleanup::Cleanup;
use crate::core::error_handling::guard_external_call;
use crate::core::validation::{validate_history_limit, ValidationError};
use crate::events::event::{AnyEventHandler, EventHandler, EventRecord, Payload};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Default number of records kept before the history is trimmed
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// History settings for an `EventBus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventBusConfig {
    history_limit: usize,
}

impl EventBusConfig {
    pub fn new(history_limit: usize) -> Result<Self, ValidationError> {
        let history_limit = validate_history_limit(history_limit)
            .map_err(|message| ValidationError::for_field("history-limit", message))?;
        Ok(Self { history_limit })
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Records kept after a trim
    pub fn retained_after_trim(&self) -> usize {
        self.history_limit / 2
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Outcome of one `publish`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Handlers that returned normally, catch-all observers included
    pub delivered: usize,
    /// Handlers that returned an error or panicked
    pub failed: usize,
}

impl DeliveryReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Running totals across all publishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStatistics {
    pub published: u64,
    pub delivered: u64,
    pub failed: u64,
    pub trims: u64,
}

/// Publish/subscribe hub
pub struct EventBus {
    config: EventBusConfig,
    subscribers: HashMap<String, Vec<EventHandler>>,
    any_subscribers: Vec<AnyEventHandler>,
    history: Vec<EventRecord>,
    statistics: BusStatistics,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("config", &self.config)
            .field("events", &self.subscribers.keys().collect::<Vec<_>>())
            .field("any_subscribers", &self.any_subscribers.len())
            .field("history", &self.history.len())
            .field("statistics", &self.statistics)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            config,
            subscribers: HashMap::new(),
            any_subscribers: Vec::new(),
            history: Vec::new(),
            statistics: BusStatistics::default(),
        }
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Add `handler` for `event_name`
    ///
    /// Returns false when this exact handler is already subscribed.
    pub fn subscribe(&mut self, event_name: &str, handler: EventHandler) -> bool {
        let handlers = self.subscribers.entry(event_name.to_string()).or_default();
        if handlers.iter().any(|existing| Arc::ptr_eq(existing, &handler)) {
            log::trace!("Handler already subscribed to '{}'", event_name);
            return false;
        }
        handlers.push(handler);
        log::trace!(
            "Subscribed handler to '{}' ({} total)",
            event_name,
            handlers.len()
        );
        true
    }

    /// Remove `handler` from `event_name`; returns whether it was present
    pub fn unsubscribe(&mut self, event_name: &str, handler: &EventHandler) -> bool {
        let Some(handlers) = self.subscribers.get_mut(event_name) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|existing| !Arc::ptr_eq(existing, handler));
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.subscribers.remove(event_name);
        }
        removed
    }

    /// Observe every published event
    pub fn subscribe_all(&mut self, handler: AnyEventHandler) -> bool {
        if self
            .any_subscribers
            .iter()
            .any(|existing| Arc::ptr_eq(existing, &handler))
        {
            return false;
        }
        self.any_subscribers.push(handler);
        true
    }

    pub fn unsubscribe_all(&mut self, handler: &AnyEventHandler) -> bool {
        let before = self.any_subscribers.len();
        self.any_subscribers
            .retain(|existing| !Arc::ptr_eq(existing, handler));
        self.any_subscribers.len() != before
    }

    /// Record and deliver an event
    ///
    /// Handlers for `event_name` run in subscription order, then the catch-all
    /// observers. A failing handler is logged and counted; it never stops the
    /// remaining handlers and never reaches the publisher.
    pub fn publish(&mut self, event_name: &str, payload: Payload) -> DeliveryReport {
        let record = EventRecord::new(event_name, payload);
        self.append_history(record.clone());
        self.statistics.published += 1;

        // Snapshot so the subscriber lists at publish time decide delivery
        let handlers: Vec<EventHandler> = self
            .subscribers
            .get(event_name)
            .cloned()
            .unwrap_or_default();
        let observers = self.any_subscribers.clone();

        let mut report = DeliveryReport::default();

        for (index, handler) in handlers.iter().enumerate() {
            match guard_external_call(|| handler(&record)) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    log::warn!(
                        "Handler #{} for event '{}' failed: {}",
                        index,
                        event_name,
                        e
                    );
                }
            }
        }

        for (index, observer) in observers.iter().enumerate() {
            match guard_external_call(|| observer(&record.name, &record.payload)) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    log::warn!(
                        "Event observer #{} failed on '{}': {}",
                        index,
                        event_name,
                        e
                    );
                }
            }
        }

        self.statistics.delivered += report.delivered as u64;
        self.statistics.failed += report.failed as u64;
        log::trace!(
            "Published '{}': {} delivered, {} failed",
            event_name,
            report.delivered,
            report.failed
        );
        report
    }

    fn append_history(&mut self, record: EventRecord) {
        self.history.push(record);
        if self.history.len() > self.config.history_limit {
            let keep = self.config.retained_after_trim();
            let dropped = self.history.len() - keep;
            self.history.drain(..dropped);
            self.statistics.trims += 1;
            log::debug!(
                "Event history trimmed: dropped {} oldest record(s), kept {}",
                dropped,
                keep
            );
        }
    }

    /// Recorded events, oldest first, optionally only those named `event_name`
    pub fn history(&self, event_name: Option<&str>) -> Vec<EventRecord> {
        match event_name {
            Some(name) => self
                .history
                .iter()
                .filter(|record| record.name == name)
                .cloned()
                .collect(),
            None => self.history.clone(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn subscriber_count(&self, event_name: &str) -> usize {
        self.subscribers.get(event_name).map_or(0, Vec::len)
    }

    pub fn any_subscriber_count(&self) -> usize {
        self.any_subscribers.len()
    }

    /// Event names with at least one handler, sorted
    pub fn subscribed_events(&self) -> Vec<String> {
        let mut names: Vec<String> = self.subscribers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn statistics(&self) -> BusStatistics {
        self.statistics
    }
}

/// Drops every subscriber; the history is kept for post-mortem inspection
impl Cleanup for EventBus {
    fn cleanup(&mut self) {
        self.subscribers.clear();
        self.any_subscribers.clear();
    }
}
