mod geo_dto;

pub use geo_dto::{DistrictQuery, GeocodeQuery};
