//! route-tracker core
//!
//! UI-agnostic route guidance: polyline decoding, great-circle distance,
//! and a progress tracker driven by live position updates.

pub mod traits;
pub mod polyline;
pub mod haversine;
pub mod tracker;
pub mod osrm;
pub mod nominatim;
pub mod navigation;
