//! Plugin enable flags
//!
//! Persistence of which plugins an administrator has switched off. Nothing
//! else about a plugin is stored.

use crate::plugin::error::{PluginError, PluginResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Plugin id to enabled flag; ids without an entry are enabled
pub type EnabledFlags = BTreeMap<String, bool>;

/// Storage for plugin enable flags
pub trait ConfigStore {
    fn load_enabled_flags(&self) -> PluginResult<EnabledFlags>;
    fn save_enabled_flags(&mut self, flags: &EnabledFlags) -> PluginResult<()>;
}

/// In-process store, used by tests and embedders without a config file
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    flags: EnabledFlags,
    saves: usize,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: EnabledFlags) -> Self {
        Self { flags, saves: 0 }
    }

    /// Number of successful `save_enabled_flags` calls
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load_enabled_flags(&self) -> PluginResult<EnabledFlags> {
        Ok(self.flags.clone())
    }

    fn save_enabled_flags(&mut self, flags: &EnabledFlags) -> PluginResult<()> {
        self.flags = flags.clone();
        self.saves += 1;
        Ok(())
    }
}

/// Flags kept in the `[plugins.enabled]` table of a TOML file
///
/// Other keys in the file are preserved on save. A missing file reads as no
/// flags and is created on the first save.
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> PluginResult<toml::Table> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error("read", e))?;
        toml::from_str(&content).map_err(|e| PluginError::Config {
            message: format!("Invalid TOML in '{}': {}", self.path.display(), e),
        })
    }

    fn io_error(&self, operation: &str, source: std::io::Error) -> PluginError {
        PluginError::Io {
            operation: operation.to_string(),
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ConfigStore for TomlConfigStore {
    fn load_enabled_flags(&self) -> PluginResult<EnabledFlags> {
        let document = self.read_document()?;
        let Some(enabled) = document
            .get("plugins")
            .and_then(|plugins| plugins.get("enabled"))
        else {
            return Ok(EnabledFlags::new());
        };

        let table = enabled.as_table().ok_or_else(|| PluginError::Config {
            message: "'plugins.enabled' must be a table".to_string(),
        })?;

        table
            .iter()
            .map(|(id, value)| {
                value
                    .as_bool()
                    .map(|flag| (id.clone(), flag))
                    .ok_or_else(|| PluginError::Config {
                        message: format!("'plugins.enabled.{}' must be a boolean", id),
                    })
            })
            .collect()
    }

    fn save_enabled_flags(&mut self, flags: &EnabledFlags) -> PluginResult<()> {
        let mut document = self.read_document()?;

        let plugins = document
            .entry("plugins")
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        let plugins = plugins.as_table_mut().ok_or_else(|| PluginError::Config {
            message: "'plugins' must be a table".to_string(),
        })?;

        let enabled: toml::Table = flags
            .iter()
            .map(|(id, flag)| (id.clone(), toml::Value::Boolean(*flag)))
            .collect();
        plugins.insert("enabled".to_string(), toml::Value::Table(enabled));

        let content = toml::to_string_pretty(&document).map_err(|e| PluginError::Config {
            message: format!("Failed to serialize plugin flags: {}", e),
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error("create directory", e))?;
            }
        }
        std::fs::write(&self.path, content).map_err(|e| self.io_error("write", e))?;
        log::debug!(
            "Saved {} plugin flag(s) to {}",
            flags.len(),
            self.path.display()
        );
        Ok(())
    }
}
