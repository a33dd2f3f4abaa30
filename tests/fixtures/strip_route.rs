//! A walkable Las Vegas Strip route for realistic tracker fixtures.
//!
//! Waypoints are real landmarks (OpenStreetMap) ordered south to north.

use route_tracker::polyline::Route;
use route_tracker::traits::Coordinate;

/// A named waypoint.
#[derive(Debug, Clone)]
pub struct Landmark {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Landmark {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

pub const STRIP_WALK: &[Landmark] = &[
    Landmark::new("MGM Grand", 36.1023654, -115.1688720),
    Landmark::new("Earl of Sandwich Planet Hollywood", 36.1093912, -115.1720087),
    Landmark::new("Bellagio", 36.1126, -115.1767),
    Landmark::new("Caesars Palace", 36.1162, -115.1745),
    Landmark::new("Grand Lux Cafe", 36.1216416, -115.1685024),
    Landmark::new("Wynn Las Vegas", 36.1263781, -115.1658180),
];

pub fn strip_route() -> Route {
    STRIP_WALK.iter().map(Landmark::coordinate).collect()
}
