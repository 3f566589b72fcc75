//! CLI module: argument parsing, configuration file handling, command
//! execution and table output

pub mod args;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
