use serde_json::Value;

use crate::core::config::AmapConfig;
use crate::core::error::{AppError, Result};
use crate::features::geo::models::{AmapDistrictResponse, DistrictSearchResult};
use crate::shared::types::LngLat;

/// Service for AMap (Gaode) reverse geocoding and district boundaries
pub struct AmapService {
    client: reqwest::Client,
    base_url: String,
    key: String,
}

impl AmapService {
    pub fn new(config: &AmapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key: config.key.clone(),
        }
    }

    /// Reverse geocode a coordinate; returns the provider payload as-is
    pub async fn reverse_geocode(&self, location: LngLat) -> Result<Value> {
        let url = format!(
            "{}/v3/geocode/regeo?location={},{}&key={}&extensions=all",
            self.base_url,
            location.lng,
            location.lat,
            urlencoding::encode(&self.key)
        );

        tracing::debug!(
            "Reverse geocoding {},{}",
            location.lng,
            location.lat
        );

        self.execute_request(&url).await
    }

    /// Fetch the boundary of the district identified by `adcode`
    ///
    /// Only the district itself is requested (`subdistrict=0`); its polyline
    /// is parsed into boundary rings.
    pub async fn search_district(&self, adcode: &str) -> Result<DistrictSearchResult> {
        let url = format!(
            "{}/v3/config/district?keywords={}&subdistrict=0&extensions=all&key={}",
            self.base_url,
            urlencoding::encode(adcode),
            urlencoding::encode(&self.key)
        );

        tracing::debug!("District lookup for adcode {}", adcode);

        let raw = self.execute_request(&url).await?;
        let parsed: AmapDistrictResponse = serde_json::from_value(raw).map_err(|e| {
            tracing::error!("Failed to parse AMap district response: {:?}", e);
            AppError::ExternalServiceError(format!("Failed to parse district response: {}", e))
        })?;

        Ok(parsed.into())
    }

    /// Execute HTTP request to AMap and parse the JSON body
    async fn execute_request(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await.map_err(|e| {
            // The URL carries the key, so only the error kind is logged
            tracing::error!("AMap request failed: {}", e.without_url());
            AppError::ExternalServiceError("AMap request failed".to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("AMap returned status: {}", status);
            return Err(AppError::ApiRequestFailed {
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            tracing::error!("Failed to parse AMap response: {}", e.without_url());
            AppError::ExternalServiceError("Failed to parse AMap response".to_string())
        })
    }
}
