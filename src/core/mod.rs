//! Core services and infrastructure shared by the plugin and event subsystems

pub mod cleanup;
pub mod error_handling;
pub mod logging;
pub mod styles;
pub mod validation;
pub mod version;
