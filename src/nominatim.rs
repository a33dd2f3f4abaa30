//! Nominatim HTTP adapter for address lookup.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::traits::{Coordinate, GeocodeError, Geocoder};

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("route-tracker/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    /// Builds a client with the configured timeout and user agent.
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    /// The forward `search` request for a free-form address.
    pub fn search_request(
        &self,
        address: &str,
    ) -> Result<reqwest::blocking::Request, reqwest::Error> {
        self.client
            .get(format!("{}/search", self.config.base_url))
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .build()
    }

    /// The `reverse` request for a point.
    pub fn reverse_request(
        &self,
        coordinate: Coordinate,
    ) -> Result<reqwest::blocking::Request, reqwest::Error> {
        self.client
            .get(format!("{}/reverse", self.config.base_url))
            .query(&[
                ("lat", format!("{:.6}", coordinate.latitude)),
                ("lon", format!("{:.6}", coordinate.longitude)),
                ("format", "jsonv2".to_string()),
            ])
            .build()
    }
}

impl Geocoder for NominatimClient {
    fn coordinates_for(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let places = self
            .search_request(address)
            .and_then(|request| self.client.execute(request))
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<NominatimPlace>>())
            .inspect_err(|err| warn!(address, error = %err, "Nominatim search failed"))?;

        first_coordinate(places)
    }

    fn address_for(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError> {
        let body = self
            .reverse_request(coordinate)
            .and_then(|request| self.client.execute(request))
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<NominatimReverse>())
            .inspect_err(|err| warn!(%coordinate, error = %err, "Nominatim reverse lookup failed"))?;

        Ok(address_from_reverse(body))
    }
}

fn first_coordinate(places: Vec<NominatimPlace>) -> Result<Option<Coordinate>, GeocodeError> {
    let Some(place) = places.into_iter().next() else {
        debug!("Nominatim found no match");
        return Ok(None);
    };

    let latitude = parse_degrees("lat", &place.lat)?;
    let longitude = parse_degrees("lon", &place.lon)?;
    debug!(name = ?place.display_name, latitude, longitude, "geocoded address");

    Ok(Some(Coordinate::new(latitude, longitude)))
}

fn address_from_reverse(body: NominatimReverse) -> Option<String> {
    if let Some(error) = body.error {
        debug!(%error, "Nominatim reverse lookup found nothing");
        return None;
    }
    body.display_name
}

/// Nominatim returns coordinates as strings.
fn parse_degrees(field: &str, value: &str) -> Result<f64, GeocodeError> {
    value
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponse(format!("{} {:?} is not a number", field, value)))
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
    error: Option<String>,
}
