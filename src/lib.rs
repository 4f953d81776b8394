//! District explorer: click a map, highlight the city under the cursor and
//! learn about it at a chosen difficulty.
//!
//! The binary serves the same-origin proxy (geocoding, district boundaries,
//! chat and image generation) together with the static page; the
//! [`features::explorer`] module holds the interaction controllers.

pub mod core;
pub mod features;
pub mod shared;
