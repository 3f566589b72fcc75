//! TOML configuration file parsing and loading
//!
//! Settings are assembled in two steps: values from the configuration file,
//! then command-line overrides. The `[plugins]` table belongs to the enable
//! flag store and is ignored here.

use super::args::Args;
use crate::core::logging::LogFormat;
use crate::core::validation::{validate_history_limit, ValidationError};
use crate::events::api::DEFAULT_HISTORY_LIMIT;
use crate::plugin::api::ManagerConfig;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "Plugmesh";
const CONFIG_FILE_NAME: &str = "plugmesh.toml";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Effective settings after merging the configuration file and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_level: String,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
    pub color: Option<bool>,
    pub history_limit: usize,
    /// File holding the persisted plugin enable flags
    pub config_path: Option<PathBuf>,
    /// Unrecognised top-level keys, reported once logging is up
    pub ignored_keys: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            log_file: None,
            color: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            config_path: None,
            ignored_keys: Vec::new(),
        }
    }
}

impl Settings {
    /// Resolve, read and apply the configuration file, then the arguments
    pub fn load(args: &Args) -> Result<Self, ValidationError> {
        let mut settings = Settings {
            config_path: resolve_config_path(args.config_file.as_deref()),
            ..Settings::default()
        };

        if let Some(path) = settings.config_path.clone() {
            if let Some(config) = read_config_file(&path)? {
                settings.apply_toml_values(&config)?;
            }
        }

        settings.apply_args(args)?;
        Ok(settings)
    }

    /// Apply recognised top-level keys; unknown keys are collected in `ignored_keys`
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), ValidationError> {
        for (key, value) in config {
            match key.as_str() {
                "log-level" => {
                    self.log_level = parse_log_level(expect_str(key, value)?)?;
                }
                "log-format" => {
                    self.log_format = parse_log_format(expect_str(key, value)?)?;
                }
                "log-file" => {
                    let log_file = expect_str(key, value)?;
                    self.log_file = if log_file.eq_ignore_ascii_case("none") || log_file == "-" {
                        None
                    } else {
                        Some(PathBuf::from(log_file))
                    };
                }
                "color" => {
                    let color = value
                        .as_bool()
                        .ok_or_else(|| ValidationError::for_field(key, "must be a boolean"))?;
                    self.color = Some(color);
                }
                "history-limit" => {
                    let limit = value
                        .as_integer()
                        .ok_or_else(|| ValidationError::for_field(key, "must be an integer"))?;
                    let limit = usize::try_from(limit)
                        .map_err(|_| ValidationError::for_field(key, "must not be negative"))?;
                    self.history_limit = validate_history_limit(limit)
                        .map_err(|e| ValidationError::for_field(key, e))?;
                }
                "plugins" => {}
                other => self.ignored_keys.push(other.to_string()),
            }
        }
        Ok(())
    }

    /// Command-line values win over file values
    pub fn apply_args(&mut self, args: &Args) -> Result<(), ValidationError> {
        if let Some(level) = &args.log_level {
            self.log_level = parse_log_level(level)?;
        }
        if let Some(format) = &args.log_format {
            self.log_format = parse_log_format(format)?;
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = if log_file.as_os_str().eq_ignore_ascii_case("none") {
                None
            } else {
                Some(log_file.clone())
            };
        }
        if let Some(color) = args.color_override() {
            self.color = Some(color);
        }
        if let Some(limit) = args.history_limit {
            self.history_limit = validate_history_limit(limit)
                .map_err(|e| ValidationError::for_field("history-limit", e))?;
        }
        Ok(())
    }

    /// Warn about every ignored configuration key
    pub fn report_ignored_keys(&self) {
        for key in &self.ignored_keys {
            log::warn!("Ignoring unknown configuration key '{}'", key);
        }
    }

    pub fn manager_config(&self) -> Result<ManagerConfig, ValidationError> {
        ManagerConfig::with_history_limit(self.history_limit)
    }

    /// Explicit color choice, otherwise whether stdout is a terminal
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;
        self.color.unwrap_or_else(|| std::io::stdout().is_terminal())
    }
}

/// `<config_dir>/Plugmesh/plugmesh.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// The explicit path when given, otherwise the default location
///
/// The file does not have to exist; `enable`/`disable` create it.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(default_config_path)
}

/// Read a configuration file; `Ok(None)` when it does not exist
pub fn read_config_file(path: &Path) -> Result<Option<toml::Table>, ValidationError> {
    if !path.exists() {
        log::debug!("No configuration file at {}", path.display());
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        ValidationError::for_field(
            "config-file",
            format!("cannot read {}: {}", path.display(), e),
        )
    })?;
    let config = toml::from_str::<toml::Table>(&contents).map_err(|e| {
        ValidationError::for_field(
            "config-file",
            format!("cannot parse {}: {}", path.display(), e),
        )
    })?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(Some(config))
}

fn expect_str<'a>(key: &str, value: &'a toml::Value) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| ValidationError::for_field(key, "must be a string"))
}

fn parse_log_level(level: &str) -> Result<String, ValidationError> {
    let normalized = level.to_ascii_lowercase();
    if LOG_LEVELS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(ValidationError::for_field(
            "log-level",
            format!("'{}' is not one of {}", level, LOG_LEVELS.join(", ")),
        ))
    }
}

fn parse_log_format(format: &str) -> Result<LogFormat, ValidationError> {
    format.to_ascii_lowercase().parse::<LogFormat>().map_err(|_| {
        ValidationError::for_field(
            "log-format",
            format!("'{}' is not one of text, ext, json", format),
        )
    })
}
