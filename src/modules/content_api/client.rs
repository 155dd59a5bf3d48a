use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::core::config::ContentApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::categories::ordering::OrderUpdate;
use crate::features::categories::payload::CategoryPayload;
use crate::features::categories::store::CategoryStore;
use crate::modules::content_api::wire::{
    categories_from_list, ApiCategory, ApiErrorBody, CategoryRequestBody, OrderBatchBody,
};

/// Client for the category endpoints of the content API
pub struct ContentApiClient {
    base_url: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl ContentApiClient {
    pub fn new(config: &ContentApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = self.with_auth(request).send().await.map_err(|e| {
            tracing::error!("Failed to {}: {}", action, e);
            AppError::Remote(format!("Failed to {}: {}", action, e))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        tracing::warn!("Content API refused to {}: HTTP {} - {}", action, status, message);

        Err(match status {
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AppError::Validation(message)
            }
            _ => AppError::Remote(format!("HTTP {} - {}", status, message)),
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response, action: &str) -> Result<T> {
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse response to {}: {}", action, e);
            AppError::Remote(format!("Invalid response to {}: {}", action, e))
        })
    }
}

#[async_trait]
impl CategoryStore for ContentApiClient {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let url = format!("{}/categories", self.base_url);
        let cache_buster = chrono::Utc::now().timestamp_millis();
        tracing::debug!("Fetching categories from {}", url);

        let request = self
            .http_client
            .get(&url)
            .query(&[("_t", cache_buster.to_string())]);
        let response = self.send(request, "list categories").await?;
        let records: Vec<serde_json::Value> = Self::parse(response, "list categories").await?;

        Ok(categories_from_list(records))
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<Category> {
        let url = format!("{}/categories", self.base_url);
        let request = self
            .http_client
            .post(&url)
            .json(&CategoryRequestBody::from(payload));

        let response = self.send(request, "create category").await?;
        let created: ApiCategory = Self::parse(response, "create category").await?;
        Ok(created.into())
    }

    async fn update_category(&self, id: i64, payload: &CategoryPayload) -> Result<Category> {
        let url = format!("{}/categories/{}", self.base_url, id);
        let request = self
            .http_client
            .put(&url)
            .json(&CategoryRequestBody::from(payload));

        let response = self.send(request, "update category").await?;
        let updated: ApiCategory = Self::parse(response, "update category").await?;
        Ok(updated.into())
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        let url = format!("{}/categories/{}", self.base_url, id);
        self.send(self.http_client.delete(&url), "delete category")
            .await?;
        Ok(())
    }

    async fn update_display_order(&self, updates: &[OrderUpdate]) -> Result<()> {
        let url = format!("{}/categories/update-order", self.base_url);
        let request = self
            .http_client
            .put(&url)
            .json(&OrderBatchBody { categories: updates });

        self.send(request, "update category order").await?;
        Ok(())
    }
}
