use std::fmt;

/// Base map rendering selected by the map-type buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapType {
    #[default]
    Standard,
    Satellite,
}

impl MapType {
    /// Parse a `data-type` attribute. Anything but `satellite` is the standard map.
    pub fn from_data_type(value: &str) -> Self {
        match value {
            "satellite" => MapType::Satellite,
            _ => MapType::Standard,
        }
    }

    pub fn shows_overlays(&self) -> bool {
        matches!(self, MapType::Satellite)
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapType::Standard => f.write_str("standard"),
            MapType::Satellite => f.write_str("satellite"),
        }
    }
}
