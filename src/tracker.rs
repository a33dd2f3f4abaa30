//! Route progress tracking.
//!
//! A synchronous state machine: one position update in, at most one event
//! out. It holds no resources and performs no I/O; whatever drives the
//! location feed just stops calling it when the feed ends.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::haversine::distance_meters;
use crate::polyline::Route;
use crate::traits::Coordinate;

/// Default distance at which a waypoint counts as reached.
pub const DEFAULT_PROXIMITY_THRESHOLD_METERS: f64 = 100.0;

/// Minimum number of points a trackable route must have.
pub const MIN_ROUTE_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Distance in meters within which an intermediate waypoint is reached.
    pub proximity_threshold_meters: f64,
    /// Distance in meters within which the destination is reached.
    pub arrival_threshold_meters: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_meters: DEFAULT_PROXIMITY_THRESHOLD_METERS,
            arrival_threshold_meters: DEFAULT_PROXIMITY_THRESHOLD_METERS,
        }
    }
}

impl TrackerConfig {
    /// Config using the same threshold for every waypoint.
    pub fn with_threshold(meters: f64) -> Self {
        Self {
            proximity_threshold_meters: meters,
            arrival_threshold_meters: meters,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerState {
    Following,
    /// Terminal until a new route is set.
    Arrived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteEvent {
    /// The user reached a waypoint; carries the new step index.
    StepAdvanced(usize),
    RouteCompleted,
}

/// Step counter as shown to the user ("step `current` of `total`").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepProgress {
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    InvalidRoute { points: usize },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidRoute { points } => write!(
                f,
                "invalid route: need at least {} points, got {}",
                MIN_ROUTE_POINTS, points
            ),
        }
    }
}

impl std::error::Error for RouteError {}

/// Tracks which segment of a route the user is on.
///
/// `current_step_index` only moves forward and stays within
/// `0..=route.len() - 2`. Reaching the final waypoint moves the tracker to
/// [`TrackerState::Arrived`], after which updates are ignored.
#[derive(Debug, Clone)]
pub struct RouteProgressTracker {
    route: Route,
    current_step_index: usize,
    state: TrackerState,
    config: TrackerConfig,
}

impl RouteProgressTracker {
    /// Starts following `route` from its first step.
    ///
    /// Fails with [`RouteError::InvalidRoute`] for routes under two points.
    pub fn new(route: Route, config: TrackerConfig) -> Result<Self, RouteError> {
        validate(&route)?;
        Ok(Self {
            route,
            current_step_index: 0,
            state: TrackerState::Following,
            config,
        })
    }

    /// Replace the route and restart from the first step.
    ///
    /// On error nothing about the tracker changes.
    pub fn set_route(&mut self, route: Route) -> Result<(), RouteError> {
        validate(&route)?;
        self.route = route;
        self.current_step_index = 0;
        self.state = TrackerState::Following;
        Ok(())
    }

    /// Checks `position` against the next waypoint and advances when close
    /// enough. A no-op once arrived.
    pub fn on_position_update(&mut self, position: Coordinate) -> Option<RouteEvent> {
        if self.state == TrackerState::Arrived {
            return None;
        }

        let last_step = self.route.len() - MIN_ROUTE_POINTS;
        let next_waypoint = self.route.points()[self.current_step_index + 1];
        let distance = distance_meters(position, next_waypoint);
        let threshold = if self.current_step_index < last_step {
            self.config.proximity_threshold_meters
        } else {
            self.config.arrival_threshold_meters
        };

        if distance.is_nan() || distance > threshold {
            return None;
        }

        if self.current_step_index < last_step {
            self.current_step_index += 1;
            debug!(
                step = self.current_step_index,
                distance_m = distance,
                "advanced to next route step"
            );
            Some(RouteEvent::StepAdvanced(self.current_step_index))
        } else {
            self.state = TrackerState::Arrived;
            info!(distance_m = distance, "route completed");
            Some(RouteEvent::RouteCompleted)
        }
    }

    /// The route being followed.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Current state.
    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_arrived(&self) -> bool {
        self.state == TrackerState::Arrived
    }

    /// Index of the waypoint the current segment starts at.
    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    /// Thresholds in use.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The waypoint being approached, or `None` once arrived.
    pub fn next_waypoint(&self) -> Option<Coordinate> {
        match self.state {
            TrackerState::Following => self.route.get(self.current_step_index + 1),
            TrackerState::Arrived => None,
        }
    }

    /// Meters from `position` to the next waypoint, or `None` once arrived.
    pub fn distance_to_next(&self, position: Coordinate) -> Option<f64> {
        self.next_waypoint()
            .map(|waypoint| distance_meters(position, waypoint))
    }

    /// One-based step counter over the route's segments.
    pub fn progress(&self) -> StepProgress {
        StepProgress {
            current: self.current_step_index + 1,
            total: self.route.len() - 1,
        }
    }
}

fn validate(route: &Route) -> Result<(), RouteError> {
    if route.len() < MIN_ROUTE_POINTS {
        return Err(RouteError::InvalidRoute { points: route.len() });
    }
    Ok(())
}
