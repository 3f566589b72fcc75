//! Plugin Error Handling
//!
//! Error types for dependency ordering, interface dispatch and plugin lifecycle.
//! Failures of the subsystem's own bookkeeping (duplicate registrations, unknown
//! names in boolean APIs) are reported as `false`/`None` instead of errors.

use crate::plugin::types::PluginStatus;

/// Result type alias for plugin operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Error raised by a plugin method or event handler
pub type MethodError = crate::core::error_handling::ExternalError;

/// A dependency cycle found while computing the load order
///
/// `path` starts and ends with the same plugin id, e.g. `[a, b, a]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Dependency cycle detected: {}", .path.join(" -> "))]
pub struct CycleError {
    pub path: Vec<String>,
}

impl CycleError {
    pub fn new(path: Vec<String>) -> Self {
        Self { path }
    }

    /// Whether `plugin_id` takes part in the cycle
    pub fn involves(&self, plugin_id: &str) -> bool {
        self.path.iter().any(|id| id == plugin_id)
    }
}

/// Error types for plugin system operations
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// No interface is registered under this name
    #[error("Unknown interface: {name}")]
    UnknownInterface { name: String },

    /// The interface exists but does not expose the method
    #[error("Unknown method '{method}' on interface '{interface}'")]
    UnknownMethod { interface: String, method: String },

    /// The invoked method returned an error or panicked
    #[error("Method '{interface}.{method}' failed: {source}")]
    MethodInvocation {
        interface: String,
        method: String,
        #[source]
        source: MethodError,
    },

    /// Load ordering found a cycle
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// Plugin not known to the resolver or host
    #[error("Plugin not found: {plugin_name}")]
    PluginNotFound { plugin_name: String },

    /// Status change not allowed by the lifecycle state machine
    #[error("Invalid status transition for plugin '{plugin_id}': {from} -> {to}")]
    InvalidTransition {
        plugin_id: String,
        from: PluginStatus,
        to: PluginStatus,
    },

    /// Declared dependencies are not satisfied
    #[error("Dependencies not satisfied for plugin '{plugin_id}': {}", .errors.join("; "))]
    DependencyUnsatisfied {
        plugin_id: String,
        errors: Vec<String>,
    },

    /// Plugin or interface identifier is malformed
    #[error("Invalid identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },

    /// Plugin failed to load or initialize
    #[error("Failed to load plugin '{plugin_name}': {cause}")]
    LoadError { plugin_name: String, cause: String },

    /// Plugin lifecycle operation failed
    #[error("Plugin '{plugin_name}' failed during '{operation}': {cause}")]
    ExecutionError {
        plugin_name: String,
        operation: String,
        cause: String,
    },

    /// Enable flags could not be read or written
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error during {operation} on '{path}': {source}")]
    Io {
        operation: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PluginError {
    /// Cycle path when this error came from load ordering
    pub fn cycle_path(&self) -> Option<&[String]> {
        match self {
            PluginError::Cycle(cycle) => Some(&cycle.path),
            _ => None,
        }
    }
}

impl crate::core::error_handling::ContextualError for PluginError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            PluginError::UnknownInterface { .. }
                | PluginError::UnknownMethod { .. }
                | PluginError::Cycle(_)
                | PluginError::PluginNotFound { .. }
                | PluginError::InvalidTransition { .. }
                | PluginError::DependencyUnsatisfied { .. }
                | PluginError::InvalidIdentifier { .. }
                | PluginError::Config { .. }
        )
    }

    fn user_message(&self) -> Option<String> {
        if self.is_user_actionable() {
            Some(self.to_string())
        } else {
            None
        }
    }
}
