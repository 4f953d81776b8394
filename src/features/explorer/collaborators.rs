//! Seams between the controllers and the outside world: the map widget, the
//! info panel, and the geocoding/district services.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::config::ExplorerConfig;
use crate::core::error::Result;
use crate::features::geo::models::{AddressComponent, DistrictSearchResult};
use crate::shared::types::LngLat;

/// Opaque reference to a polygon drawn on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolygonHandle(pub u64);

/// Stroke and fill used for district outlines
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub stroke_color: String,
    pub stroke_weight: u32,
    pub fill_color: String,
    pub fill_opacity: f32,
}

impl PolygonStyle {
    pub const STROKE_WEIGHT: u32 = 2;
    pub const FILL_OPACITY: f32 = 0.3;
}

impl From<&ExplorerConfig> for PolygonStyle {
    fn from(config: &ExplorerConfig) -> Self {
        Self {
            stroke_color: config.polygon_stroke_color.clone(),
            stroke_weight: Self::STROKE_WEIGHT,
            fill_color: config.polygon_fill_color.clone(),
            fill_opacity: Self::FILL_OPACITY,
        }
    }
}

impl Default for PolygonStyle {
    fn default() -> Self {
        Self::from(&ExplorerConfig::default())
    }
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to draw polygon: {0}")]
    Draw(String),
}

/// The map widget. Implementations are expected to be cheap, synchronous
/// calls into the rendering layer.
pub trait MapSurface: Send + Sync {
    fn draw_polygon(
        &self,
        ring: &[LngLat],
        style: &PolygonStyle,
    ) -> std::result::Result<PolygonHandle, MapError>;

    fn remove_polygon(&self, handle: PolygonHandle);

    /// Move the viewport so that all `handles` are visible
    fn fit_view(&self, handles: &[PolygonHandle]);

    /// Show or hide the satellite and road-network overlay layers
    fn set_overlay_layers(&self, visible: bool);
}

/// The info panel: a title, an HTML content area and a visibility toggle
pub trait InfoPanel: Send + Sync {
    fn set_title(&self, title: &str);
    fn set_content_html(&self, html: &str);
    fn show(&self);
    fn hide(&self);
    fn is_visible(&self) -> bool;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Address component for a coordinate, `None` when the provider has none
    async fn reverse_geocode(&self, location: LngLat) -> Result<Option<AddressComponent>>;
}

#[async_trait]
pub trait DistrictLookup: Send + Sync {
    /// Districts (with boundaries) matching an administrative code
    async fn search_district(&self, adcode: &str) -> Result<DistrictSearchResult>;
}
