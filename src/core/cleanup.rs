//! Generic Cleanup Interface
//!
//! Components that own subscriber lists, bindings or graph nodes implement this
//! trait so a single owner can reset them without knowing their internals.

/// Reset all state held by the implementor
///
/// Implementations must be idempotent: calling `cleanup` twice leaves the
/// component in the same empty state as calling it once.
pub trait Cleanup {
    /// Clean up all resources managed by this instance
    fn cleanup(&mut self);
}
