//! Generic error handling utilities
//!
//! Provides unified error reporting that works across the plugin, event and CLI
//! error types while keeping each domain's own error enum.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// Generic reporting functions use this to decide whether to show the error's own
/// message or a generic operation context with the details pushed to debug level.
///
/// # Implementation Consistency
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`. When it returns `false`, `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on directly
    ///
    /// Examples of user-actionable errors:
    /// - Unknown interface or method names
    /// - Dependency cycles in declared plugins
    /// - Invalid configuration values
    ///
    /// Examples of system errors:
    /// - A plugin method failing internally
    /// - IO failures while persisting configuration
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<String>;
}

/// Log errors with a detail level based on error specificity
///
/// - User-actionable errors log their own message
/// - System errors log the operation context, with the error itself at debug level
///
/// # Arguments
/// * `error` - The error to report
/// * `operation_context` - Human-readable description of the operation that failed
///
/// # Examples
/// ```rust,no_run
/// # use plugmesh::core::error_handling::log_error_with_context;
/// # use plugmesh::plugin::api::PluginError;
/// let err = PluginError::UnknownInterface { name: "storage".to_string() };
/// log_error_with_context(&err, "Calling plugin method");
/// // Logs: "FATAL: Unknown interface: storage"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::error!("FATAL: {}", user_msg);
        }
        _ => {
            log::error!("FATAL: {}", operation_context);
        }
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Error produced by code the subsystem calls but does not own
pub type ExternalError = Box<dyn std::error::Error + Send + Sync>;

/// Run a plugin-supplied callable, turning a panic into an ordinary error
///
/// Plugin methods and event handlers must never unwind into the caller's
/// control flow; both a returned error and a panic come back as `Err`.
pub(crate) fn guard_external_call<T, F>(call: F) -> Result<T, ExternalError>
where
    F: FnOnce() -> Result<T, ExternalError>,
{
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(panic_message(payload.as_ref()).into()),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}
