//! Plugin interaction subsystem: dependency-ordered activation, interface
//! dispatch between plugins and a bounded event bus, plus the `plugmesh` CLI.

pub mod app;
pub mod core;
pub mod events;
pub mod plugin;
