use async_trait::async_trait;
use pickup_tracker_lib::{coordinate::LatLng, geo_math::straight_line_km, route::{DrivingRoute, RouteResult}};

use crate::TrackingError;

mod google;

pub use google::GoogleDirections;

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn driving_route(&self, origin: LatLng, destination: LatLng) -> Result<DrivingRoute, TrackingError>;
}

/// Asks for a driving route and falls back to the great-circle distance when none can be had.
/// Never fails.
pub async fn compute_route(directions: &dyn DirectionsProvider, origin: LatLng, destination: LatLng) -> RouteResult {
    match directions.driving_route(origin, destination).await {
        Ok(route) => RouteResult::DrivingRoute(route),
        Err(err) => {
            let distance_km = straight_line_km(origin, destination);
            tracing::warn!("No driving route, using straight line distance of {distance_km} km: {err}");
            RouteResult::StraightLineEstimate { distance_km }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    #[async_trait]
    impl DirectionsProvider for Unreachable {
        async fn driving_route(&self, _origin: LatLng, _destination: LatLng) -> Result<DrivingRoute, TrackingError> {
            Err(TrackingError::Directions("connection refused".into()))
        }
    }

    struct Fixed(DrivingRoute);

    #[async_trait]
    impl DirectionsProvider for Fixed {
        async fn driving_route(&self, _origin: LatLng, _destination: LatLng) -> Result<DrivingRoute, TrackingError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn failure_becomes_straight_line_estimate() {
        let result = compute_route(&Unreachable, LatLng::new(10., 20.), LatLng::new(11., 20.)).await;
        assert_eq!(result, RouteResult::StraightLineEstimate { distance_km: 111.2 });
    }

    #[tokio::test]
    async fn success_is_passed_through() {
        let route = DrivingRoute {
            distance_text: "3.1 km".into(),
            duration_text: "6 mins".into(),
            path: vec![LatLng::new(10., 20.), LatLng::new(10.01, 20.02)],
        };
        let result = compute_route(&Fixed(route.clone()), LatLng::new(10., 20.), LatLng::new(10.01, 20.02)).await;
        assert_eq!(result, RouteResult::DrivingRoute(route));
    }
}
