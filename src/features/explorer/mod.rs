//! # Explorer Feature
//!
//! Interaction controllers behind the district explorer page.
//!
//! A map click is reverse geocoded, widened to its parent city (adcode
//! `xxxx00`), the city boundary is drawn and the info panel is filled with
//! a geography lesson from the chat backend at the selected difficulty.
//!
//! The map widget and the panel are abstracted as [`MapSurface`] and
//! [`InfoPanel`]; the network side is [`Geocoder`], [`DistrictLookup`] and
//! [`ChatBackend`], served either by the backend proxy ([`ProxyClient`]) or
//! directly by the server-side provider clients.

pub mod collaborators;
pub mod info_panel;
pub mod level;
pub mod map_controller;
pub mod map_type;
pub mod sources;

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::core::config::{Config, ExplorerConfig, GeoSource};
use crate::features::geo::services::AmapService;
use crate::shared::llm::{ChatBackend, LlmClient};
use crate::shared::types::LngLat;

pub use collaborators::{
    DistrictLookup, Geocoder, InfoPanel, MapError, MapSurface, PolygonHandle, PolygonStyle,
};
pub use info_panel::{InfoOutcome, InfoPanelController};
pub use level::{get_level_name, DifficultyLevel};
pub use map_controller::{derive_city_adcode, ClickError, ClickOutcome, MapInteractionController};
pub use map_type::MapType;
pub use sources::ProxyClient;

/// Page-level entry points: wires the controllers together and routes UI
/// events to them.
pub struct Explorer {
    map: Arc<dyn MapSurface>,
    map_controller: MapInteractionController,
    info: Arc<InfoPanelController>,
}

impl Explorer {
    pub fn new(
        map: Arc<dyn MapSurface>,
        panel: Arc<dyn InfoPanel>,
        geocoder: Arc<dyn Geocoder>,
        districts: Arc<dyn DistrictLookup>,
        chat: Arc<dyn ChatBackend>,
        style: PolygonStyle,
    ) -> Self {
        let info = Arc::new(InfoPanelController::new(panel, chat));
        let map_controller =
            MapInteractionController::new(map.clone(), geocoder, districts, info.clone(), style);

        Self {
            map,
            map_controller,
            info,
        }
    }

    /// Build an explorer whose sources follow `explorer.geo_source`.
    ///
    /// Provider credentials come from the server `config` and are only used
    /// in direct mode.
    pub fn from_config(
        config: &Config,
        explorer: &ExplorerConfig,
        map: Arc<dyn MapSurface>,
        panel: Arc<dyn InfoPanel>,
    ) -> Self {
        let style = PolygonStyle::from(explorer);

        match explorer.geo_source {
            GeoSource::Proxy => {
                tracing::info!("Explorer using proxy at {}", explorer.proxy_base_url);
                let proxy = Arc::new(ProxyClient::new(&explorer.proxy_base_url));
                Self::new(map, panel, proxy.clone(), proxy.clone(), proxy, style)
            }
            GeoSource::Direct => {
                tracing::info!("Explorer calling providers directly");
                let amap = Arc::new(AmapService::new(&config.amap));
                let llm = Arc::new(LlmClient::new(&config.llm));
                Self::new(map, panel, amap.clone(), amap, llm, style)
            }
        }
    }

    /// Map click: dismiss an open panel, then run the click pipeline
    pub async fn on_map_click(&self, location: LngLat) -> ClickOutcome {
        self.info.hide_if_visible();
        self.map_controller.handle_click(location).await
    }

    pub fn select_level(&self, level: DifficultyLevel) -> Option<JoinHandle<InfoOutcome>> {
        self.info.select_level(level)
    }

    /// Level change from a raw `data-level` key; unknown keys are ignored
    pub fn select_level_key(&self, key: &str) -> Option<JoinHandle<InfoOutcome>> {
        match key.parse::<DifficultyLevel>() {
            Ok(level) => self.select_level(level),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    pub fn close_panel(&self) {
        self.info.close();
    }

    /// Map-type button from a raw `data-type` value
    pub fn set_map_type(&self, data_type: &str) -> MapType {
        let map_type = MapType::from_data_type(data_type);
        self.map.set_overlay_layers(map_type.shows_overlays());
        tracing::debug!("Map type set to {}", map_type);
        map_type
    }

    pub fn current_level(&self) -> DifficultyLevel {
        self.info.current_level()
    }

    pub fn map_controller(&self) -> &MapInteractionController {
        &self.map_controller
    }

    pub fn info_panel(&self) -> &Arc<InfoPanelController> {
        &self.info
    }
}
