use std::sync::Arc;

use chrono::Utc;
use futures::{future::BoxFuture, stream::FuturesUnordered, FutureExt, StreamExt};
use pickup_tracker_lib::{
    coordinate::LatLng, geo_math::bearing, location_sample::LocationSample, rotation::RotationState,
    route::RouteResult, tracking_session::TrackingSession,
};
use tokio::sync::mpsc;

use crate::{
    cache::PositionCache,
    directions::{compute_route, DirectionsProvider},
    map::{bounds_contain, bounds_containing, MapSurface},
    realtime::{parse_location, BroadcastMessage},
};

/// A route lookup issued for one sample. Only the most recently issued token may update the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub token: u64,
    pub origin: LatLng,
    pub destination: LatLng,
}

/// Live view of one pickup: owns the map, the cached position and the marker heading.
/// Every handler takes `&mut self`, so one view processes one event at a time.
pub struct TrackingView<M: MapSurface> {
    session: TrackingSession,
    map: M,
    position_cache: PositionCache,
    directions: Arc<dyn DirectionsProvider>,
    rotation: RotationState,
    previous: Option<LocationSample>,
    current: Option<LocationSample>,
    route: Option<RouteResult>,
    latest_token: u64,
    pending_route: Option<RouteRequest>,
}

impl<M: MapSurface> TrackingView<M> {
    /// Draws the initial map: centered on the destination, destination marker placed,
    /// vehicle marker hidden until a position is known. A cached position is shown right
    /// away and its route lookup is left in [`Self::pending_route`].
    pub fn bootstrap(session: TrackingSession, mut map: M, position_cache: PositionCache, directions: Arc<dyn DirectionsProvider>, zoom: f64) -> Self {
        map.render_map(session.destination, zoom);
        map.place_destination_marker(session.destination, &session.destination_label);

        tracing::info!("Tracking session {} toward '{}'", session.session_id, session.destination_label);

        let mut view = Self {
            session,
            map,
            position_cache,
            directions,
            rotation: RotationState::default(),
            previous: None,
            current: None,
            route: None,
            latest_token: 0,
            pending_route: None,
        };
        view.pending_route = view.restore_cached_position();
        view
    }

    fn restore_cached_position(&mut self) -> Option<RouteRequest> {
        let sample = self.position_cache.restore()?;
        let position = sample.position();
        tracing::info!("Restored position {:.5}, {:.5} received at {}", position.latitude, position.longitude, sample.received_at);

        self.current = Some(sample);
        self.map.move_origin_marker(position, self.rotation.current_bearing_degrees);
        self.keep_in_view(position);
        Some(self.next_route_request(position))
    }

    /// Route lookup for the restored position that nobody has started yet. Taking it hands
    /// the lookup to the caller; [`Self::run`] does this on its own.
    pub fn take_pending_route(&mut self) -> Option<RouteRequest> {
        self.pending_route.take()
    }

    pub fn pending_route(&self) -> Option<&RouteRequest> {
        self.pending_route.as_ref()
    }

    /// Validates a realtime message. Anything that is not a usable location is logged and dropped.
    pub fn ingest(&self, message: &BroadcastMessage) -> Option<LocationSample> {
        if message.event != self.session.event_name() {
            tracing::debug!("Ignoring event {} on session {}", message.event, self.session.session_id);
            return None;
        }

        match parse_location(&message.payload, Utc::now()) {
            Ok(sample) => Some(sample),
            Err(err) => {
                tracing::warn!("Discarding location update: {err}");
                None
            }
        }
    }

    /// Moves the vehicle to a new sample and returns the route lookup it calls for.
    pub fn update_position(&mut self, sample: LocationSample) -> RouteRequest {
        let position = sample.position();
        self.position_cache.store(&sample);

        if let Some(previous) = &self.current {
            match bearing(previous.position(), position) {
                Some(target) => {
                    let heading = self.rotation.turn_toward(target);
                    tracing::debug!("Bearing {:.1}°, marker heading {:.1}°", target, heading);
                }
                None => tracing::debug!("Vehicle did not move, keeping heading"),
            }
        }

        self.map.move_origin_marker(position, self.rotation.current_bearing_degrees);
        self.keep_in_view(position);

        self.previous = self.current.replace(sample);
        self.pending_route = None;
        self.next_route_request(position)
    }

    /// Draws the outcome of a route lookup. Outcomes of superseded lookups are dropped.
    pub fn apply_route(&mut self, request: &RouteRequest, result: RouteResult) -> bool {
        if request.token != self.latest_token {
            tracing::debug!("Dropping stale route {} (latest is {})", request.token, self.latest_token);
            return false;
        }

        match &result {
            RouteResult::DrivingRoute(route) => self.map.draw_route(&route.path),
            RouteResult::StraightLineEstimate { .. } => self.map.draw_straight_line(request.origin, request.destination),
        }
        self.map.show_panel(&result.panel());
        self.route = Some(result);
        true
    }

    /// Handles one sample from start to finish, waiting for its route.
    pub async fn process_sample(&mut self, sample: LocationSample) -> RouteResult {
        let request = self.update_position(sample);
        let result = compute_route(self.directions.as_ref(), request.origin, request.destination).await;
        self.apply_route(&request, result.clone());
        result
    }

    /// Follows the feed until it closes. Route lookups run alongside sample processing,
    /// so a slow directions service never holds back the marker. A new sample cancels the
    /// lookup still running for the one before it, so at most one is in flight.
    pub async fn run(&mut self, mut messages: mpsc::Receiver<BroadcastMessage>) {
        let mut in_flight = FuturesUnordered::new();

        if let Some(request) = self.take_pending_route() {
            in_flight.push(self.lookup_route(request));
        }

        loop {
            tokio::select! {
                message = messages.recv() => {
                    let Some(message) = message else {
                        break;
                    };
                    if let Some(sample) = self.ingest(&message) {
                        let request = self.update_position(sample);
                        if !in_flight.is_empty() {
                            tracing::debug!("Cancelling route lookup superseded by {}", request.token);
                            in_flight.clear();
                        }
                        in_flight.push(self.lookup_route(request));
                    }
                }
                Some((request, result)) = in_flight.next(), if !in_flight.is_empty() => {
                    self.apply_route(&request, result);
                }
            }
        }

        tracing::info!("Feed for session {} closed", self.session.session_id);

        while let Some((request, result)) = in_flight.next().await {
            self.apply_route(&request, result);
        }
    }

    fn lookup_route(&self, request: RouteRequest) -> BoxFuture<'static, (RouteRequest, RouteResult)> {
        let directions = self.directions.clone();
        async move {
            let result = compute_route(directions.as_ref(), request.origin, request.destination).await;
            (request, result)
        }.boxed()
    }

    fn next_route_request(&mut self, origin: LatLng) -> RouteRequest {
        self.latest_token += 1;
        RouteRequest {
            token: self.latest_token,
            origin,
            destination: self.session.destination,
        }
    }

    fn keep_in_view(&mut self, position: LatLng) {
        let visible = self.map.visible_bounds()
            .map(|bounds| bounds_contain(&bounds, position))
            .unwrap_or(false);

        if !visible {
            self.map.fit_bounds(bounds_containing(position, self.session.destination));
        }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn current_sample(&self) -> Option<&LocationSample> {
        self.current.as_ref()
    }

    pub fn previous_sample(&self) -> Option<&LocationSample> {
        self.previous.as_ref()
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }
}
