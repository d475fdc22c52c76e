pub mod cache;
pub mod osm;
pub mod overpass;
