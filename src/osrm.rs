//! OSRM HTTP adapter for turn-by-turn route geometry.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::polyline::{self, Route};
use crate::traits::{Coordinate, DirectionsError, DirectionsProvider};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Ask the backend for alternative routes besides the primary one.
    pub alternatives: bool,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
            alternatives: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    /// Builds a client with the configured request timeout.
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// The `route` service URL for a single origin/destination pair.
    ///
    /// OSRM takes coordinates as `lng,lat`.
    pub fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=polyline&alternatives={}",
            self.config.base_url,
            self.config.profile,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude,
            self.config.alternatives
        )
    }
}

impl DirectionsProvider for OsrmClient {
    fn routes_between(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Route>, DirectionsError> {
        let url = self.route_url(origin, destination);

        // OSRM reports failures like NoRoute as JSON with a 4xx status, so the
        // body is parsed before looking at the status code.
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.json::<OsrmRouteResponse>())
            .inspect_err(|err| warn!(%origin, %destination, error = %err, "OSRM request failed"))?;

        routes_from_response(body)
    }
}

fn routes_from_response(body: OsrmRouteResponse) -> Result<Vec<Route>, DirectionsError> {
    if body.code != "Ok" {
        warn!(code = %body.code, message = ?body.message, "OSRM returned an error");
        return Err(DirectionsError::Service {
            code: body.code,
            message: body.message,
        });
    }

    let geometries = body
        .routes
        .unwrap_or_default()
        .into_iter()
        .map(|route| route.geometry)
        .collect::<Vec<_>>();

    if geometries.is_empty() {
        warn!("OSRM returned no routes");
        return Err(DirectionsError::NoRoute);
    }

    let routes = polyline::decode_all(&geometries);
    debug!(
        routes = routes.len(),
        primary_points = routes[0].len(),
        "decoded OSRM route geometries"
    );

    Ok(routes)
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
}
