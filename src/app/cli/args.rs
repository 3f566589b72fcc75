//! Command-line arguments
//!
//! Global options shared by every command plus one subcommand. Values given
//! here override the configuration file.

use crate::core::validation::{validate_history_limit, validate_identifier, ValidationError};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "plugmesh")]
#[command(about = "Plugin dependency resolution, interface dispatch and event inspection")]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error", "off"],
        global = true
    )]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(
        short = 'o',
        long = "log-format",
        value_name = "FORMAT",
        value_parser = ["text", "ext", "json"],
        global = true
    )]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Force colored output
    #[arg(long = "color", conflicts_with = "no_color", global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color", global = true)]
    pub no_color: bool,

    /// Event history size before the oldest half is dropped
    #[arg(
        long = "history-limit",
        value_name = "COUNT",
        value_parser = parse_history_limit,
        global = true
    )]
    pub history_limit: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List built-in plugins with their dependencies and enable flags
    List,

    /// Print the dependency load order
    Order,

    /// Activate plugins and report dependency checks
    Check {
        /// Only report this plugin
        #[arg(value_name = "PLUGIN")]
        plugin: Option<String>,
    },

    /// Activate plugins, perform calls and show interfaces, statistics and events
    Run {
        /// Method call to perform, e.g. math.add=[1,2] (repeatable)
        #[arg(long = "call", value_name = "INTERFACE.METHOD[=JSON_ARRAY]", value_parser = parse_call_spec)]
        calls: Vec<CallSpec>,

        /// Print one JSON document instead of tables
        #[arg(long = "json")]
        json: bool,
    },

    /// Enable a plugin and persist the flag
    Enable {
        #[arg(value_name = "PLUGIN")]
        plugin: String,
    },

    /// Disable a plugin and persist the flag
    Disable {
        #[arg(value_name = "PLUGIN")]
        plugin: String,
    },

    /// Show version and build information
    Info,
}

impl Args {
    /// `Some(true)` for `--color`, `Some(false)` for `--no-color`, else `None`
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// One `--call` request
#[derive(Debug, Clone, PartialEq)]
pub struct CallSpec {
    pub interface: String,
    pub method: String,
    pub args: Vec<Value>,
}

impl fmt::Display for CallSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.interface, self.method)
    }
}

/// Parse `INTERFACE.METHOD[=JSON_ARRAY]`
///
/// The method is the part after the last dot, so interface names may contain
/// dots themselves.
pub fn parse_call_spec(value: &str) -> Result<CallSpec, ValidationError> {
    let (target, raw_args) = match value.split_once('=') {
        Some((target, raw_args)) => (target, Some(raw_args)),
        None => (value, None),
    };

    let (interface, method) = target.rsplit_once('.').ok_or_else(|| {
        ValidationError::for_field("call", format!("expected INTERFACE.METHOD, got '{}'", target))
    })?;
    validate_identifier(interface).map_err(|e| ValidationError::for_field("call", e))?;
    if method.is_empty() {
        return Err(ValidationError::for_field("call", "method name cannot be empty"));
    }

    let args = match raw_args {
        None => Vec::new(),
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                return Err(ValidationError::for_field(
                    "call",
                    "arguments must be a JSON array",
                ))
            }
            Err(e) => {
                return Err(ValidationError::for_field(
                    "call",
                    format!("invalid JSON arguments: {}", e),
                ))
            }
        },
    };

    Ok(CallSpec {
        interface: interface.to_string(),
        method: method.to_string(),
        args,
    })
}

fn parse_history_limit(value: &str) -> Result<usize, String> {
    let limit = value
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a valid count", value))?;
    validate_history_limit(limit)
}
