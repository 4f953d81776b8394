mod district;

pub use district::{
    parse_polyline, AddressComponent, AmapDistrictResponse, BoundaryRing, District,
    DistrictSearchResult, RegeoResponse, STATUS_OK,
};
