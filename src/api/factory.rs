use std::sync::Arc;

use crate::api::{ProxyClient, RecipeApi, SpoonacularClient};
use crate::config::ApiConfig;
use crate::error::RecipeError;

pub struct ApiFactory;

impl ApiFactory {
    /// Create the backend named in configuration
    pub fn create(config: &ApiConfig) -> Result<Arc<dyn RecipeApi>, RecipeError> {
        match config.backend.as_str() {
            "spoonacular" => Ok(Arc::new(SpoonacularClient::new(config)?)),
            "proxy" => Ok(Arc::new(ProxyClient::new(config)?)),
            other => Err(RecipeError::ConfigError(config::ConfigError::Message(
                format!("Unknown recipe backend: {}", other),
            ))),
        }
    }

    /// List all available backend names
    pub fn available_backends() -> Vec<&'static str> {
        vec!["spoonacular", "proxy"]
    }
}
