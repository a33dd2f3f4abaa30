//! Navigation session: directions fetch feeding a progress tracker.
//!
//! This is the seam the presentation layer drives. It asks a
//! [`DirectionsProvider`] for routes, installs the primary one into a
//! [`RouteProgressTracker`], keeps the alternatives around, and forwards live
//! positions. Destinations can also be given as addresses through a
//! [`Geocoder`].

use std::fmt;

use tracing::{info, warn};

use crate::polyline::Route;
use crate::tracker::{
    RouteError, RouteEvent, RouteProgressTracker, StepProgress, TrackerConfig, TrackerState,
};
use crate::traits::{Coordinate, DirectionsError, DirectionsProvider, GeocodeError, Geocoder};

#[derive(Debug)]
pub enum NavigationError {
    Directions(DirectionsError),
    Route(RouteError),
    Geocode(GeocodeError),
    /// The geocoder found no coordinates for the address.
    AddressNotFound(String),
    /// Planning from the current position before any position arrived.
    NoPosition,
    NoSuchAlternative(usize),
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::Directions(err) => write!(f, "{}", err),
            NavigationError::Route(err) => write!(f, "{}", err),
            NavigationError::Geocode(err) => write!(f, "{}", err),
            NavigationError::AddressNotFound(address) => {
                write!(f, "no coordinates found for {:?}", address)
            }
            NavigationError::NoPosition => write!(f, "no position received yet"),
            NavigationError::NoSuchAlternative(index) => {
                write!(f, "no alternative route at index {}", index)
            }
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::Directions(err) => Some(err),
            NavigationError::Route(err) => Some(err),
            NavigationError::Geocode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DirectionsError> for NavigationError {
    fn from(err: DirectionsError) -> Self {
        NavigationError::Directions(err)
    }
}

impl From<RouteError> for NavigationError {
    fn from(err: RouteError) -> Self {
        NavigationError::Route(err)
    }
}

impl From<GeocodeError> for NavigationError {
    fn from(err: GeocodeError) -> Self {
        NavigationError::Geocode(err)
    }
}

/// Route planning and progress for one user.
pub struct NavigationSession<P: DirectionsProvider> {
    provider: P,
    config: TrackerConfig,
    tracker: Option<RouteProgressTracker>,
    alternatives: Vec<Route>,
    destination: Option<Coordinate>,
    last_position: Option<Coordinate>,
}

impl<P: DirectionsProvider> NavigationSession<P> {
    /// Creates a session with no route; `config` applies to every planned route.
    pub fn new(provider: P, config: TrackerConfig) -> Self {
        Self {
            provider,
            config,
            tracker: None,
            alternatives: Vec::new(),
            destination: None,
            last_position: None,
        }
    }

    /// Fetch routes and start following the primary one.
    ///
    /// Any failure leaves the session without a route; the previous route led
    /// somewhere else and is not kept.
    pub fn plan_route(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<(), NavigationError> {
        let result = self.fetch_and_install(origin, destination);
        if let Err(err) = &result {
            warn!(%origin, %destination, error = %err, "route planning failed");
            self.clear_route();
        }
        result
    }

    /// Like [`plan_route`](Self::plan_route), starting from the last reported
    /// position.
    pub fn plan_route_from_last_position(
        &mut self,
        destination: Coordinate,
    ) -> Result<(), NavigationError> {
        let origin = self.last_position.ok_or(NavigationError::NoPosition)?;
        self.plan_route(origin, destination)
    }

    /// Look up `address` and plan a route to it from the last reported
    /// position.
    ///
    /// A failed or empty lookup drops the current route, like any other
    /// planning failure.
    pub fn plan_route_to_address<G: Geocoder>(
        &mut self,
        geocoder: &G,
        address: &str,
    ) -> Result<(), NavigationError> {
        let origin = self.last_position.ok_or(NavigationError::NoPosition)?;

        let destination = match geocoder.coordinates_for(address) {
            Ok(Some(destination)) => destination,
            Ok(None) => {
                warn!(address, "no coordinates found for address");
                self.clear_route();
                return Err(NavigationError::AddressNotFound(address.to_string()));
            }
            Err(err) => {
                warn!(address, error = %err, "geocoding failed");
                self.clear_route();
                return Err(err.into());
            }
        };

        self.plan_route(origin, destination)
    }

    /// Reverse-geocode the last reported position.
    pub fn current_address<G: Geocoder>(
        &self,
        geocoder: &G,
    ) -> Result<Option<String>, NavigationError> {
        let position = self.last_position.ok_or(NavigationError::NoPosition)?;
        Ok(geocoder.address_for(position)?)
    }

    /// Record a live position and advance the tracker.
    ///
    /// Returns `None` when no route is active.
    pub fn on_position_update(&mut self, position: Coordinate) -> Option<RouteEvent> {
        self.last_position = Some(position);
        self.tracker
            .as_mut()
            .and_then(|tracker| tracker.on_position_update(position))
    }

    /// Follow an alternative route instead; the current primary takes its
    /// slot in the alternatives list. Progress restarts from the first step.
    pub fn select_alternative(&mut self, index: usize) -> Result<(), NavigationError> {
        let Some(tracker) = self.tracker.as_mut() else {
            return Err(NavigationError::NoSuchAlternative(index));
        };
        let Some(candidate) = self.alternatives.get(index).cloned() else {
            return Err(NavigationError::NoSuchAlternative(index));
        };

        let previous = tracker.route().clone();
        tracker.set_route(candidate)?;
        self.alternatives[index] = previous;
        info!(alternative = index, points = tracker.route().len(), "switched to alternative route");
        Ok(())
    }

    /// Drops the active route, its alternatives and the destination.
    pub fn clear_route(&mut self) {
        self.tracker = None;
        self.alternatives.clear();
        self.destination = None;
    }

    /// Whether a route is currently being followed.
    pub fn has_route(&self) -> bool {
        self.tracker.is_some()
    }

    /// The route being followed.
    pub fn route(&self) -> Option<&Route> {
        self.tracker.as_ref().map(|tracker| tracker.route())
    }

    /// Alternative routes from the last successful plan.
    pub fn alternatives(&self) -> &[Route] {
        &self.alternatives
    }

    /// The underlying tracker, when a route is active.
    pub fn tracker(&self) -> Option<&RouteProgressTracker> {
        self.tracker.as_ref()
    }

    /// Tracker state, when a route is active.
    pub fn state(&self) -> Option<TrackerState> {
        self.tracker.as_ref().map(|tracker| tracker.state())
    }

    /// Step counter for display, when a route is active.
    pub fn progress(&self) -> Option<StepProgress> {
        self.tracker.as_ref().map(|tracker| tracker.progress())
    }

    /// Destination of the active route.
    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    /// Most recent position passed to [`on_position_update`](Self::on_position_update).
    pub fn last_position(&self) -> Option<Coordinate> {
        self.last_position
    }

    /// The directions provider this session plans with.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn fetch_and_install(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<(), NavigationError> {
        let mut routes = self.provider.routes_between(origin, destination)?.into_iter();
        let primary = routes.next().ok_or(DirectionsError::NoRoute)?;

        match self.tracker.as_mut() {
            Some(tracker) => tracker.set_route(primary)?,
            None => self.tracker = Some(RouteProgressTracker::new(primary, self.config)?),
        }
        self.alternatives = routes.collect();
        self.destination = Some(destination);

        info!(
            %origin,
            %destination,
            alternatives = self.alternatives.len(),
            "planned route"
        );
        Ok(())
    }
}
