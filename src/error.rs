use thiserror::Error;

use crate::model::RecipeId;

/// Errors that can occur while browsing, searching or saving recipes
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Missing or empty required input; the request is never issued
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// Transport failure, timeout or a failure reported by the recipe service
    #[error("Recipe service error: {0}")]
    UpstreamError(String),

    /// The recipe service has no recipe with this id
    #[error("Recipe {0} not found")]
    NotFoundError(RecipeId),

    /// The persisted saved-recipes document could not be read or written
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

// Timeouts surface as an ordinary upstream failure.
impl From<reqwest::Error> for RecipeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RecipeError::UpstreamError("request timed out".to_string())
        } else {
            RecipeError::UpstreamError(err.to_string())
        }
    }
}

impl From<std::io::Error> for RecipeError {
    fn from(err: std::io::Error) -> Self {
        RecipeError::StorageError(err.to_string())
    }
}
