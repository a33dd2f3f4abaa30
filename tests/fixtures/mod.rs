//! Test fixtures for route-tracker.
//!
//! Provides:
//! - A real Las Vegas Strip walking route
//! - Helpers for placing positions at known distances from a waypoint

#![allow(dead_code)]

pub mod strip_route;

pub use strip_route::*;

use route_tracker::traits::Coordinate;

/// Meters per degree of latitude on the 6371 km sphere.
pub const METERS_PER_DEGREE_LAT: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

/// A point `meters` due south of `from`.
pub fn south_of(from: Coordinate, meters: f64) -> Coordinate {
    Coordinate::new(from.latitude - meters / METERS_PER_DEGREE_LAT, from.longitude)
}

/// A point `meters` due north of `from`.
pub fn north_of(from: Coordinate, meters: f64) -> Coordinate {
    Coordinate::new(from.latitude + meters / METERS_PER_DEGREE_LAT, from.longitude)
}

/// Evenly spaced points from `a` to `b`, both ends included.
pub fn interpolate(a: Coordinate, b: Coordinate, steps: usize) -> Vec<Coordinate> {
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            Coordinate::new(
                a.latitude + (b.latitude - a.latitude) * t,
                a.longitude + (b.longitude - a.longitude) * t,
            )
        })
        .collect()
}
