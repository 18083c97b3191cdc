pub mod glob;
pub mod params;
