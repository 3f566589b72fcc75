//! CLI Integration Tests
//!
//! Tests are organized by functionality:
//! - `cli::argument_parsing` - clap parsing of global options and commands
//! - `cli::toml_config` - configuration file application and CLI overrides
//! - `cli::binary` - runs the built `plugmesh` binary end to end

mod cli;
mod common;
