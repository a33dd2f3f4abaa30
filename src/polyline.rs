//! Route geometry and the encoded polyline format.
//!
//! Directions backends ship geometries in the compact polyline encoding
//! (5 decimal digits per axis, delta + zig-zag varints offset into printable
//! ASCII). Decoding happens once at the boundary; everything past that works
//! on [`Route`] values.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::haversine::distance_meters;
use crate::traits::Coordinate;

/// Scale factor for 5 decimal digits of precision.
const PRECISION: f64 = 1e5;

/// Offset added to every 5-bit chunk to land in printable ASCII.
const CHUNK_OFFSET: i64 = 63;

/// Continuation bit inside a chunk.
const CONTINUATION: i64 = 0x20;

/// An ordered route: index 0 is the origin, the last point the destination.
///
/// Routes are never edited in place. A new directions fetch produces a new
/// `Route` that replaces the old one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    points: Vec<Coordinate>,
}

impl Route {
    /// Creates a route from ordered points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Returns a reference to the points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the route and returns the owned points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Coordinate> {
        self.points.get(index).copied()
    }

    /// First point of the route.
    pub fn origin(&self) -> Option<Coordinate> {
        self.points.first().copied()
    }

    /// Last point of the route.
    pub fn destination(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }

    /// Total great-circle length of the route in meters.
    pub fn length_meters(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| distance_meters(pair[0], pair[1]))
            .sum()
    }
}

impl From<Vec<Coordinate>> for Route {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Coordinate> for Route {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Decode an encoded polyline into a route.
///
/// Never fails. Input that ends in the middle of a value (or carries a
/// continuation run too long to fit 64 bits) stops decoding at the last
/// complete lat/lng pair.
pub fn decode(encoded: &str) -> Route {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();
    let mut truncated = false;

    while index < bytes.len() {
        let (Some(delta_lat), Some(delta_lng)) =
            (next_value(bytes, &mut index), next_value(bytes, &mut index))
        else {
            truncated = true;
            break;
        };

        lat = lat.wrapping_add(delta_lat);
        lng = lng.wrapping_add(delta_lng);
        points.push(Coordinate::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    if truncated {
        debug!(len = bytes.len(), points = points.len(), "polyline ended mid-value");
    }

    Route::new(points)
}

/// Decode several geometries (e.g. a primary route and its alternatives).
///
/// Output order matches input order.
pub fn decode_all<S>(encoded: &[S]) -> Vec<Route>
where
    S: AsRef<str> + Sync,
{
    encoded.par_iter().map(|item| decode(item.as_ref())).collect()
}

/// Encode a route back into the polyline format.
pub fn encode(route: &Route) -> String {
    let mut out = String::with_capacity(route.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in route.points() {
        let lat = (point.latitude * PRECISION).round() as i64;
        let lng = (point.longitude * PRECISION).round() as i64;
        push_value(lat.wrapping_sub(prev_lat), &mut out);
        push_value(lng.wrapping_sub(prev_lng), &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

/// Read one zig-zag varint starting at `index`.
///
/// Returns `None` when the input runs out before the value terminates.
fn next_value(bytes: &[u8], index: &mut usize) -> Option<i64> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        if *index >= bytes.len() || shift >= i64::BITS {
            return None;
        }
        let chunk = bytes[*index] as i64 - CHUNK_OFFSET;
        *index += 1;

        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < CONTINUATION {
            break;
        }
    }

    Some(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

fn push_value(delta: i64, out: &mut String) {
    // Zig-zag into an unsigned value so the full i64 range terminates.
    let mut value = ((delta << 1) ^ (delta >> 63)) as u64;

    while value >= CONTINUATION as u64 {
        let chunk = (value & 0x1f) | CONTINUATION as u64;
        out.push((chunk as u8 + CHUNK_OFFSET as u8) as char);
        value >>= 5;
    }
    out.push((value as u8 + CHUNK_OFFSET as u8) as char);
}
