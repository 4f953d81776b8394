//! Geo proxy feature.
//!
//! Forwards reverse geocoding and district boundary lookups to AMap so the
//! web service key stays on the server.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/geocode?lng=&lat=` | Reverse geocode (raw AMap payload) |
//! | GET | `/api/district?adcode=` | District with parsed boundary rings |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AmapService;
