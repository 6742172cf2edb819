//! IP geolocation enrichment over a local GeoLite2 City database.

pub mod city;
pub mod reader;

pub use city::normalize_city;
pub use reader::GeoEnricher;
