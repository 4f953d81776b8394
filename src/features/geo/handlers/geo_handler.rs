use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::geo::dtos::{DistrictQuery, GeocodeQuery};
use crate::features::geo::models::DistrictSearchResult;
use crate::features::geo::services::AmapService;

/// Reverse geocode a coordinate
///
/// Forwards to AMap `v3/geocode/regeo` with the server-held key and returns
/// the provider payload unchanged.
#[utoipa::path(
    get,
    path = "/api/geocode",
    params(GeocodeQuery),
    responses(
        (status = 200, description = "AMap reverse geocoding payload", body = Object),
        (status = 400, description = "Missing or invalid coordinates"),
        (status = 502, description = "AMap unavailable")
    ),
    tag = "geo"
)]
pub async fn geocode(
    State(service): State<Arc<AmapService>>,
    AppQuery(query): AppQuery<GeocodeQuery>,
) -> Result<Json<Value>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let location = query
        .location()
        .ok_or_else(|| AppError::BadRequest("缺少参数".to_string()))?;

    let body = service.reverse_geocode(location).await?;
    Ok(Json(body))
}

/// Look up a district boundary
///
/// Returns the district with its polyline parsed into `[lng, lat]` rings.
#[utoipa::path(
    get,
    path = "/api/district",
    params(DistrictQuery),
    responses(
        (status = 200, description = "District boundary", body = DistrictSearchResult),
        (status = 400, description = "Missing or invalid adcode"),
        (status = 502, description = "AMap unavailable")
    ),
    tag = "geo"
)]
pub async fn district(
    State(service): State<Arc<AmapService>>,
    AppQuery(query): AppQuery<DistrictQuery>,
) -> Result<Json<DistrictSearchResult>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let adcode = query
        .adcode
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("缺少参数".to_string()))?;

    let result = service.search_district(adcode).await?;
    Ok(Json(result))
}
