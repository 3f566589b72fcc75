//! Event System Module
//!
//! Synchronous named-event publish/subscribe with a bounded, queryable history.

// Internal modules - all access should go through api module
pub(crate) mod bus;
pub(crate) mod event;

// Public API module - the only public interface for the event system
pub mod api;

#[cfg(test)]
mod tests;
