//! Built-in Plugin Implementations
//!
//! Plugins that ship with the binary. Each registers itself with `builtin!`
//! and is found by `BuiltinLoader`.

pub mod api;
pub mod audit;
pub mod math;
pub mod text;
