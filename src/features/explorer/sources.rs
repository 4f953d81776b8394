//! Geocoding, district and chat sources for the controllers.
//!
//! `ProxyClient` talks to the backend proxy routes; in direct mode the
//! server-side `AmapService` and `LlmClient` are used as they are.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::core::error::{AppError, Result};
use crate::features::explorer::collaborators::{DistrictLookup, Geocoder};
use crate::features::geo::models::{
    AddressComponent, DistrictSearchResult, RegeoResponse, STATUS_OK,
};
use crate::features::geo::services::AmapService;
use crate::shared::llm::{ChatBackend, ChatMessage};
use crate::shared::types::LngLat;

fn address_from_regeo(raw: Value) -> Result<Option<AddressComponent>> {
    let parsed: RegeoResponse = serde_json::from_value(raw).map_err(|e| {
        tracing::error!("Failed to parse reverse geocoding response: {:?}", e);
        AppError::ExternalServiceError(format!("Failed to parse geocode response: {}", e))
    })?;

    if parsed.status.as_deref() != Some(STATUS_OK) {
        tracing::warn!(
            "Reverse geocoding unsuccessful: {}",
            parsed.info.as_deref().unwrap_or("unknown")
        );
        return Ok(None);
    }

    Ok(parsed.into_address_component())
}

/// Client for the same-origin backend proxy
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ProxyChatRequest<'a> {
    messages: &'a [ChatMessage],
    style: &'a str,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Proxy request to {} failed: {}", path, e);
            AppError::ExternalServiceError(format!("Proxy request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Proxy {} returned status {}", path, status);
            return Err(AppError::ApiRequestFailed {
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse proxy {} response: {}", path, e);
            AppError::ExternalServiceError(format!("Failed to parse proxy response: {}", e))
        })
    }
}

#[async_trait]
impl Geocoder for ProxyClient {
    async fn reverse_geocode(&self, location: LngLat) -> Result<Option<AddressComponent>> {
        let path = "/api/geocode";
        let request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("lng", location.lng), ("lat", location.lat)]);

        let raw: Value = self.read_json(request, path).await?;
        address_from_regeo(raw)
    }
}

#[async_trait]
impl DistrictLookup for ProxyClient {
    async fn search_district(&self, adcode: &str) -> Result<DistrictSearchResult> {
        let path = "/api/district";
        let request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[("adcode", adcode)]);

        self.read_json(request, path).await
    }
}

#[async_trait]
impl ChatBackend for ProxyClient {
    async fn chat(&self, messages: Vec<ChatMessage>, style: &str) -> Result<Value> {
        let path = "/api/deepseek/chat";
        let request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&ProxyChatRequest {
                messages: &messages,
                style,
            });

        self.read_json(request, path).await
    }
}

#[async_trait]
impl Geocoder for AmapService {
    async fn reverse_geocode(&self, location: LngLat) -> Result<Option<AddressComponent>> {
        let raw = AmapService::reverse_geocode(self, location).await?;
        address_from_regeo(raw)
    }
}

#[async_trait]
impl DistrictLookup for AmapService {
    async fn search_district(&self, adcode: &str) -> Result<DistrictSearchResult> {
        AmapService::search_district(self, adcode).await
    }
}
