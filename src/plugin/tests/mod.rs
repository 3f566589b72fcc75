//! Test modules for the plugin system
//!
//! Dependency resolution, interface dispatch, the interaction manager and the
//! lifecycle host, sharing the mocks in `utils`.

mod utils;
