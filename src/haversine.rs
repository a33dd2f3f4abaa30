//! Great-circle distance and the straight-line directions fallback.
//!
//! Every proximity check in the crate goes through [`distance_meters`].

use crate::polyline::Route;
use crate::traits::{Coordinate, DirectionsError, DirectionsProvider};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in meters.
///
/// Symmetric and exactly zero for identical points. Inputs are not range
/// checked; out-of-range values just produce large distances, and NaN
/// components produce NaN.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    // abs() keeps the result bit-identical when the arguments are swapped.
    let delta_lat = (b.latitude - a.latitude).abs().to_radians();
    let delta_lng = (b.longitude - a.longitude).abs().to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // clamp (unlike min) lets NaN through.
    let c = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_KM * c * 1000.0
}

/// Directions provider that ignores roads.
///
/// Returns the direct two-point route from origin to destination. Useful as a
/// fallback when no routing backend is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineDirections;

impl DirectionsProvider for StraightLineDirections {
    fn routes_between(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Route>, DirectionsError> {
        Ok(vec![Route::new(vec![origin, destination])])
    }
}
