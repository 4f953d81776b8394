use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::shared::types::LngLat;

/// One closed polygon outline, as an ordered list of `[lng, lat]` pairs.
pub type BoundaryRing = Vec<LngLat>;

/// Status value AMap uses for a successful query
pub const STATUS_OK: &str = "1";

/// An administrative region with its boundary polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct District {
    pub name: String,
    pub adcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<f64>>)]
    pub center: Option<LngLat>,
    #[serde(default)]
    #[schema(value_type = Vec<Vec<Vec<f64>>>)]
    pub boundaries: Vec<BoundaryRing>,
}

/// Normalised result of a district boundary query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DistrictSearchResult {
    /// `"1"` on success, anything else on failure
    pub status: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub districts: Vec<District>,
}

impl DistrictSearchResult {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Reverse geocoding payload as returned by AMap `v3/geocode/regeo`.
///
/// AMap encodes absent text fields as `[]`, so every text field is lenient.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegeoResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub info: Option<String>,
    #[serde(default)]
    pub regeocode: Option<Regeocode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Regeocode {
    #[serde(default, deserialize_with = "lenient_string")]
    pub formatted_address: Option<String>,
    #[serde(rename = "addressComponent", default)]
    pub address_component: Option<AddressComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddressComponent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub adcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub district: Option<String>,
}

impl AddressComponent {
    /// The adcode, if present and non-empty
    pub fn adcode(&self) -> Option<&str> {
        self.adcode.as_deref().filter(|code| !code.is_empty())
    }
}

impl RegeoResponse {
    pub fn into_address_component(self) -> Option<AddressComponent> {
        self.regeocode.and_then(|r| r.address_component)
    }
}

/// Accept a JSON string; map `[]`, `null` and any other shape to `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// Raw district entry as returned by AMap `v3/config/district`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmapDistrict {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub adcode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub center: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub polyline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AmapDistrictResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub info: Option<String>,
    #[serde(default)]
    pub districts: Vec<AmapDistrict>,
}

fn parse_point(raw: &str) -> Option<LngLat> {
    let (lng, lat) = raw.trim().split_once(',')?;
    let lng = lng.trim().parse::<f64>().ok()?;
    let lat = lat.trim().parse::<f64>().ok()?;
    Some(LngLat::new(lng, lat))
}

/// Parse an AMap polyline (`lng,lat;lng,lat|lng,lat;...`) into rings.
///
/// Rings are kept in order. A ring containing an unparseable point comes back
/// empty so that the renderer skips it rather than drawing a distorted shape.
pub fn parse_polyline(polyline: &str) -> Vec<BoundaryRing> {
    if polyline.trim().is_empty() {
        return Vec::new();
    }

    polyline
        .split('|')
        .map(|segment| {
            let points: Option<BoundaryRing> = segment
                .split(';')
                .filter(|p| !p.trim().is_empty())
                .map(parse_point)
                .collect();
            points.unwrap_or_else(|| {
                tracing::warn!("Dropping boundary ring with malformed coordinates");
                Vec::new()
            })
        })
        .collect()
}

impl From<AmapDistrict> for District {
    fn from(raw: AmapDistrict) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            adcode: raw.adcode.unwrap_or_default(),
            level: raw.level,
            center: raw.center.as_deref().and_then(parse_point),
            boundaries: raw
                .polyline
                .as_deref()
                .map(parse_polyline)
                .unwrap_or_default(),
        }
    }
}

impl From<AmapDistrictResponse> for DistrictSearchResult {
    fn from(raw: AmapDistrictResponse) -> Self {
        Self {
            status: raw.status.unwrap_or_default(),
            info: raw.info.unwrap_or_default(),
            districts: raw.districts.into_iter().map(Into::into).collect(),
        }
    }
}
