use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::api::wire::{self, RecipeInformation, SearchResponse};
use crate::api::{RecipeApi, SearchRequest};
use crate::config::ApiConfig;
use crate::error::RecipeError;
use crate::model::{RecipeDetail, RecipeId, ResultPage};

const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

/// Talks to the Spoonacular API directly with an API key
pub struct SpoonacularClient {
    client: Client,
    api_key: String,
    base_url: String,
    include_nutrition: bool,
}

impl SpoonacularClient {
    /// Create a new client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self, RecipeError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("SPOONACULAR_API_KEY").ok())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                RecipeError::ConfigError(config::ConfigError::Message(
                    "SPOONACULAR_API_KEY not found in config or environment".to_string(),
                ))
            })?;

        Ok(SpoonacularClient {
            client: build_client(config.timeout())?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            include_nutrition: config.include_nutrition,
        })
    }

    /// Create a client with simple parameters and the default timeout
    pub fn with_api_key(api_key: String) -> Result<Self, RecipeError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, RecipeError> {
        Ok(SpoonacularClient {
            client: build_client(ApiConfig::default().timeout())?,
            api_key,
            base_url,
            include_nutrition: true,
        })
    }

    async fn get(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
        recipe: Option<RecipeId>,
    ) -> Result<Value, RecipeError> {
        debug!("GET {}/{} {:?}", self.base_url, path, params);
        params.push(("apiKey", self.api_key.clone()));

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(wire::failure_to_error(
                    Some(status.as_u16() as u64),
                    format!("HTTP {}", status),
                    recipe,
                ))
            }
            Err(e) => {
                return Err(RecipeError::UpstreamError(format!(
                    "Invalid JSON from recipe service: {}",
                    e
                )))
            }
        };
        debug!("{} response from {}", status, path);

        if let Some((code, message)) = wire::failure_envelope(&value) {
            return Err(wire::failure_to_error(
                code.or(Some(status.as_u16() as u64)),
                message,
                recipe,
            ));
        }
        if !status.is_success() {
            return Err(wire::failure_to_error(
                Some(status.as_u16() as u64),
                format!("HTTP {}", status),
                recipe,
            ));
        }

        Ok(value)
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, RecipeError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("recipe-browser/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(RecipeError::from)
}

#[async_trait]
impl RecipeApi for SpoonacularClient {
    fn backend_name(&self) -> &str {
        "spoonacular"
    }

    async fn search(&self, request: &SearchRequest) -> Result<ResultPage, RecipeError> {
        let mut params = request.params();
        params.push(("addRecipeInformation", "true".to_string()));

        let value = self.get("recipes/complexSearch", params, None).await?;
        let response: SearchResponse = wire::decode(value)?;
        Ok(response.into())
    }

    async fn fetch_by_id(&self, id: RecipeId) -> Result<RecipeDetail, RecipeError> {
        let params = vec![("includeNutrition", self.include_nutrition.to_string())];
        let value = self
            .get(&format!("recipes/{}/information", id), params, Some(id))
            .await?;
        let info: RecipeInformation = wire::decode(value)?;
        Ok(info.into())
    }
}
