//! Core domain types and collaborator traits.
//!
//! The tracker only ever sees plain values. Anything that talks to the
//! outside world (a directions backend, a geocoder, a location feed) sits
//! behind these seams and hands data in synchronously.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::polyline::Route;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Whether the point is finite and inside the usual lat/lng ranges.
    ///
    /// Nothing in this crate rejects invalid points; this is for callers
    /// that want to filter a noisy location feed.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Produces candidate routes between two points.
///
/// Routes are ordered by preference: the first entry is the primary route,
/// the rest are alternatives.
pub trait DirectionsProvider {
    /// Candidate routes from `origin` to `destination`, primary first.
    fn routes_between(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Route>, DirectionsError>;
}

impl<P: DirectionsProvider + ?Sized> DirectionsProvider for &P {
    fn routes_between(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Route>, DirectionsError> {
        (**self).routes_between(origin, destination)
    }
}

#[derive(Debug)]
pub enum DirectionsError {
    Http(reqwest::Error),
    /// The backend answered but reported a failure code.
    Service { code: String, message: Option<String> },
    /// The backend succeeded but returned no routes.
    NoRoute,
}

impl fmt::Display for DirectionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionsError::Http(err) => write!(f, "directions request failed: {}", err),
            DirectionsError::Service { code, message: Some(message) } => {
                write!(f, "directions service returned {}: {}", code, message)
            }
            DirectionsError::Service { code, message: None } => {
                write!(f, "directions service returned {}", code)
            }
            DirectionsError::NoRoute => write!(f, "no route found"),
        }
    }
}

impl std::error::Error for DirectionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectionsError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DirectionsError {
    fn from(err: reqwest::Error) -> Self {
        DirectionsError::Http(err)
    }
}

/// Resolves addresses to coordinates and back.
pub trait Geocoder {
    /// Best match for a free-form address, or `None` when nothing matched.
    fn coordinates_for(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError>;

    /// Human-readable address for a point, or `None` when nothing matched.
    fn address_for(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn coordinates_for(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        (**self).coordinates_for(address)
    }

    fn address_for(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError> {
        (**self).address_for(coordinate)
    }
}

#[derive(Debug)]
pub enum GeocodeError {
    Http(reqwest::Error),
    /// The backend answered with something that is not a usable location.
    InvalidResponse(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Http(err) => write!(f, "geocoding request failed: {}", err),
            GeocodeError::InvalidResponse(detail) => {
                write!(f, "invalid geocoding response: {}", detail)
            }
        }
    }
}

impl std::error::Error for GeocodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeocodeError::Http(err) => Some(err),
            GeocodeError::InvalidResponse(_) => None,
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (36.1147, -115.1728).into();
        assert_eq!(coord, Coordinate::new(36.1147, -115.1728));
    }

    #[test]
    fn test_is_valid() {
        assert!(Coordinate::new(90.0, -180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_display() {
        assert_eq!(Coordinate::new(38.5, -120.2).to_string(), "38.500000,-120.200000");
    }

    #[test]
    fn test_directions_error_display() {
        let err = DirectionsError::Service {
            code: "NoSegment".to_string(),
            message: Some("Could not find a matching segment".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "directions service returned NoSegment: Could not find a matching segment"
        );
        assert_eq!(DirectionsError::NoRoute.to_string(), "no route found");
    }

    #[test]
    fn test_geocode_error_display() {
        let err = GeocodeError::InvalidResponse("lat \"abc\" is not a number".to_string());
        assert_eq!(
            err.to_string(),
            "invalid geocoding response: lat \"abc\" is not a number"
        );
    }
}
