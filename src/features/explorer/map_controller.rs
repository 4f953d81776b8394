use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::core::error::AppError;
use crate::features::explorer::collaborators::{
    DistrictLookup, Geocoder, MapSurface, PolygonHandle, PolygonStyle,
};
use crate::features::explorer::info_panel::{InfoOutcome, InfoPanelController};
use crate::features::geo::models::District;
use crate::shared::types::LngLat;

/// Why a click did not produce a district
#[derive(Debug, Error)]
pub enum ClickError {
    #[error("Reverse geocoding failed: {0}")]
    Geocode(#[source] AppError),

    #[error("Reverse geocoding returned no usable address component")]
    MissingAddress,

    #[error("District lookup failed: {0}")]
    DistrictLookup(#[source] AppError),

    #[error("No city-level district found for {0}")]
    DistrictNotFound(String),
}

/// Result of one map click
#[derive(Debug)]
pub enum ClickOutcome {
    /// Another query was in flight; the click was ignored
    Dropped,
    /// The district was drawn and its info fetch started
    Highlighted {
        district: String,
        polygons: usize,
        info_task: JoinHandle<InfoOutcome>,
    },
    /// The district was found but came without boundary rings
    NoBoundaries { district: String },
    Failed(ClickError),
}

/// Map an administrative code to its parent city: first four characters + `00`.
pub fn derive_city_adcode(adcode: &str) -> String {
    let prefix: String = adcode.chars().take(4).collect();
    format!("{}00", prefix)
}

/// Releases the single-flight flag when dropped, whatever the exit path.
struct SearchGuard<'a>(&'a AtomicBool);

impl<'a> SearchGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SearchGuard(flag))
    }
}

impl Drop for SearchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives click → geocode → district → render → info fetch.
///
/// Only one click pipeline runs at a time. Clicks arriving while one is in
/// flight are dropped, not queued.
pub struct MapInteractionController {
    map: Arc<dyn MapSurface>,
    geocoder: Arc<dyn Geocoder>,
    districts: Arc<dyn DistrictLookup>,
    info: Arc<InfoPanelController>,
    style: PolygonStyle,
    searching: AtomicBool,
    polygons: Mutex<Vec<PolygonHandle>>,
}

impl MapInteractionController {
    pub fn new(
        map: Arc<dyn MapSurface>,
        geocoder: Arc<dyn Geocoder>,
        districts: Arc<dyn DistrictLookup>,
        info: Arc<InfoPanelController>,
        style: PolygonStyle,
    ) -> Self {
        Self {
            map,
            geocoder,
            districts,
            info,
            style,
            searching: AtomicBool::new(false),
            polygons: Mutex::new(Vec::new()),
        }
    }

    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::Acquire)
    }

    /// Handles of the polygons currently on the map
    pub fn rendered_polygons(&self) -> Vec<PolygonHandle> {
        self.polygons().clone()
    }

    fn polygons(&self) -> MutexGuard<'_, Vec<PolygonHandle>> {
        self.polygons.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn handle_click(&self, location: LngLat) -> ClickOutcome {
        let Some(_guard) = SearchGuard::try_acquire(&self.searching) else {
            tracing::info!("A query is already in progress, ignoring click");
            return ClickOutcome::Dropped;
        };

        self.clear_highlight();

        let district = match self.resolve_city_district(location).await {
            Ok(district) => district,
            Err(e) => {
                tracing::error!("Click query failed: {}", e);
                return ClickOutcome::Failed(e);
            }
        };

        if district.boundaries.is_empty() {
            tracing::error!("District has no boundary data: {}", district.name);
            return ClickOutcome::NoBoundaries {
                district: district.name,
            };
        }

        let polygons = self.render_district(&district);
        let info_task = self.info.spawn_region_info(district.name.clone());

        ClickOutcome::Highlighted {
            district: district.name,
            polygons,
            info_task,
        }
    }

    async fn resolve_city_district(&self, location: LngLat) -> Result<District, ClickError> {
        let component = self
            .geocoder
            .reverse_geocode(location)
            .await
            .map_err(ClickError::Geocode)?
            .ok_or(ClickError::MissingAddress)?;

        let adcode = component.adcode().ok_or(ClickError::MissingAddress)?;
        let city_adcode = derive_city_adcode(adcode);
        tracing::debug!("Clicked adcode {} -> city {}", adcode, city_adcode);

        let result = self
            .districts
            .search_district(&city_adcode)
            .await
            .map_err(ClickError::DistrictLookup)?;

        if !result.is_success() {
            return Err(ClickError::DistrictNotFound(city_adcode));
        }

        result
            .districts
            .into_iter()
            .next()
            .ok_or(ClickError::DistrictNotFound(city_adcode))
    }

    /// Remove every drawn polygon from the map and forget its handle
    pub fn clear_highlight(&self) {
        let handles = std::mem::take(&mut *self.polygons());
        for handle in handles {
            self.map.remove_polygon(handle);
        }
    }

    /// Draw every valid ring of `district`, then fit the viewport to them.
    ///
    /// Invalid rings and draw failures are logged and skipped. Returns the
    /// number of polygons drawn.
    pub fn render_district(&self, district: &District) -> usize {
        let mut drawn = Vec::with_capacity(district.boundaries.len());

        for (index, ring) in district.boundaries.iter().enumerate() {
            if ring.is_empty() || !ring.iter().all(LngLat::is_finite) {
                tracing::warn!(
                    "Skipping invalid boundary ring {} of {}",
                    index,
                    district.name
                );
                continue;
            }

            match self.map.draw_polygon(ring, &self.style) {
                Ok(handle) => drawn.push(handle),
                Err(e) => tracing::warn!("Boundary ring {} of {}: {}", index, district.name, e),
            }
        }

        let count = drawn.len();
        if count == 0 {
            tracing::error!("No boundary could be drawn for {}", district.name);
            return 0;
        }

        let all = {
            let mut polygons = self.polygons();
            polygons.extend(drawn);
            polygons.clone()
        };
        self.map.fit_view(&all);
        tracing::info!("Highlighted district {} ({} polygons)", district.name, count);

        count
    }
}
