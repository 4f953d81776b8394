use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::shared::types::LngLat;
use crate::shared::validation::ADCODE_REGEX;

/// Query parameters for reverse geocoding
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
pub struct GeocodeQuery {
    /// Longitude (WGS-84/GCJ-02 degrees)
    #[param(example = 121.4737)]
    #[validate(
        required(message = "缺少参数: lng"),
        range(min = -180.0, max = 180.0, message = "lng must be within [-180, 180]")
    )]
    pub lng: Option<f64>,

    /// Latitude
    #[param(example = 31.2304)]
    #[validate(
        required(message = "缺少参数: lat"),
        range(min = -90.0, max = 90.0, message = "lat must be within [-90, 90]")
    )]
    pub lat: Option<f64>,
}

impl GeocodeQuery {
    /// Coordinate pair, available once validation passed
    pub fn location(&self) -> Option<LngLat> {
        Some(LngLat::new(self.lng?, self.lat?))
    }
}

/// Query parameters for a district boundary lookup
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
pub struct DistrictQuery {
    /// Six-digit administrative code
    #[param(example = "310100")]
    #[validate(
        required(message = "缺少参数: adcode"),
        regex(path = *ADCODE_REGEX, message = "adcode must be six digits")
    )]
    pub adcode: Option<String>,
}
