//! Errors surfaced by the command-line front end

use crate::core::error_handling::ContextualError;
use crate::core::validation::ValidationError;
use crate::plugin::api::PluginError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl ContextualError for CliError {
    fn is_user_actionable(&self) -> bool {
        match self {
            CliError::Plugin(e) => e.is_user_actionable(),
            CliError::Validation(_) => true,
            _ => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            CliError::Plugin(e) => e.user_message(),
            CliError::Validation(_) => Some(self.to_string()),
            _ => None,
        }
    }
}
