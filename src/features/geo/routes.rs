use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::geo::handlers;
use crate::features::geo::services::AmapService;

/// Create routes for the geo proxy feature
pub fn routes(service: Arc<AmapService>) -> Router {
    Router::new()
        .route("/api/geocode", get(handlers::geocode))
        .route("/api/district", get(handlers::district))
        .with_state(service)
}
