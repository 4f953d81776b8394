mod amap_service;

pub use amap_service::AmapService;
