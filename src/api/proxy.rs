use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use crate::api::spoonacular::build_client;
use crate::api::wire::{self, RecipeInformation, SearchResponse};
use crate::api::{RecipeApi, SearchRequest};
use crate::config::ApiConfig;
use crate::error::RecipeError;
use crate::model::{RecipeDetail, RecipeId, ResultPage};

/// Goes through the hosting site's AJAX endpoint instead of calling the
/// recipe service directly. Every call carries the per-session nonce the page
/// hands out; the endpoint answers with `{"success": bool, "data": ...}`.
pub struct ProxyClient {
    client: Client,
    ajax_url: String,
    nonce: String,
    include_nutrition: bool,
}

impl ProxyClient {
    /// Create a new proxy client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self, RecipeError> {
        let ajax_url = config.ajax_url.clone().ok_or_else(|| {
            RecipeError::ConfigError(config::ConfigError::Message(
                "api.ajax_url is required for the proxy backend".to_string(),
            ))
        })?;
        let nonce = config.nonce.clone().ok_or_else(|| {
            RecipeError::ConfigError(config::ConfigError::Message(
                "api.nonce is required for the proxy backend".to_string(),
            ))
        })?;

        Ok(ProxyClient {
            client: build_client(config.timeout())?,
            ajax_url,
            nonce,
            include_nutrition: config.include_nutrition,
        })
    }

    #[doc(hidden)]
    pub fn with_endpoint(ajax_url: String, nonce: String) -> Result<Self, RecipeError> {
        Ok(ProxyClient {
            client: build_client(ApiConfig::default().timeout())?,
            ajax_url,
            nonce,
            include_nutrition: true,
        })
    }

    async fn call(
        &self,
        action: &'static str,
        params: Vec<(&'static str, String)>,
        recipe: Option<RecipeId>,
    ) -> Result<Value, RecipeError> {
        debug!("POST {} action={} {:?}", self.ajax_url, action, params);

        let mut form = vec![("action", action.to_string()), ("nonce", self.nonce.clone())];
        form.extend(params);

        let response = self.client.post(&self.ajax_url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // A rejected nonce comes back as a bare "-1" or "0", not as an envelope
        let envelope: Value = serde_json::from_str(&body).map_err(|_| {
            warn!("Proxy rejected {} (HTTP {}): {}", action, status, body.trim());
            RecipeError::UpstreamError(format!("Request rejected by proxy (HTTP {})", status))
        })?;
        let Some(success) = envelope.get("success").and_then(Value::as_bool) else {
            return Err(RecipeError::UpstreamError(
                "Malformed response from proxy".to_string(),
            ));
        };

        let data = envelope.get("data").cloned().unwrap_or(Value::Null);
        if !success {
            let message = match &data {
                Value::String(s) => s.clone(),
                other => other
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Request failed")
                    .to_string(),
            };
            return Err(RecipeError::UpstreamError(message));
        }

        // The proxy passes the upstream body through even when it is a failure
        if let Some((code, message)) = wire::failure_envelope(&data) {
            return Err(wire::failure_to_error(code, message, recipe));
        }
        if data.is_null() {
            return Err(match recipe {
                Some(id) => RecipeError::NotFoundError(id),
                None => RecipeError::UpstreamError("Empty response from proxy".to_string()),
            });
        }

        Ok(data)
    }
}

#[async_trait]
impl RecipeApi for ProxyClient {
    fn backend_name(&self) -> &str {
        "proxy"
    }

    async fn search(&self, request: &SearchRequest) -> Result<ResultPage, RecipeError> {
        let data = self.call("search_recipes", request.params(), None).await?;
        let response: SearchResponse = wire::decode(data)?;
        Ok(response.into())
    }

    async fn popular(&self, number: u32, offset: u32) -> Result<ResultPage, RecipeError> {
        let params = vec![("number", number.to_string()), ("offset", offset.to_string())];
        let data = self.call("get_popular_recipes", params, None).await?;
        let response: SearchResponse = wire::decode(data)?;
        Ok(response.into())
    }

    async fn fetch_by_id(&self, id: RecipeId) -> Result<RecipeDetail, RecipeError> {
        let params = vec![
            ("recipe_id", id.to_string()),
            ("includeNutrition", self.include_nutrition.to_string()),
        ];
        let data = self.call("get_recipe_by_id", params, Some(id)).await?;
        let info: RecipeInformation = wire::decode(data)?;
        Ok(info.into())
    }
}
