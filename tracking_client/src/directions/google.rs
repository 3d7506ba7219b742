use std::time::Duration;

use async_trait::async_trait;
use pickup_tracker_lib::{coordinate::LatLng, route::DrivingRoute};
use serde::Deserialize;

use crate::TrackingError;

use super::DirectionsProvider;

pub const DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const POLYLINE_PRECISION: u32 = 5;

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    overview_polyline: EncodedPolyline,
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[derive(Deserialize)]
struct Leg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Deserialize)]
struct TextValue {
    text: String,
}

/// Driving directions from the Google Directions web service.
pub struct GoogleDirections {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl GoogleDirections {
    pub fn new(api_key: Option<String>) -> Result<Self, TrackingError> {
        Self::with_base_url(api_key, DIRECTIONS_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Result<Self, TrackingError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| TrackingError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirections {
    async fn driving_route(&self, origin: LatLng, destination: LatLng) -> Result<DrivingRoute, TrackingError> {
        let Some(api_key) = &self.api_key else {
            return Err(TrackingError::Directions("No maps API key configured".to_string()));
        };

        let response = self.client.get(&self.base_url)
            .query(&[
                ("origin", format!("{},{}", origin.latitude, origin.longitude)),
                ("destination", format!("{},{}", destination.latitude, destination.longitude)),
                ("mode", "driving".to_string()),
                ("key", api_key.clone()),
            ])
            .send().await
            .map_err(|err| TrackingError::Directions(format!("Directions request failed: {err}")))?
            .error_for_status()
            .map_err(|err| TrackingError::Directions(format!("Directions service answered with an error: {err}")))?
            .json::<DirectionsResponse>().await
            .map_err(|err| TrackingError::Directions(format!("Unreadable directions response: {err}")))?;

        parse_route(response)
    }
}

fn parse_route(response: DirectionsResponse) -> Result<DrivingRoute, TrackingError> {
    if response.status != "OK" {
        return Err(TrackingError::Directions(format!("Directions status {}: {}",
            response.status,
            response.error_message.unwrap_or_default()
        )));
    }

    let route = response.routes.into_iter().next()
        .ok_or(TrackingError::Directions("No route found".to_string()))?;
    let leg = route.legs.into_iter().next()
        .ok_or(TrackingError::Directions("Route has no legs".to_string()))?;

    let line = polyline::decode_polyline(&route.overview_polyline.points, POLYLINE_PRECISION)
        .map_err(|err| TrackingError::Directions(format!("Failed to decode route polyline: {err}")))?;

    Ok(DrivingRoute {
        distance_text: leg.distance.text,
        duration_text: leg.duration.text,
        path: line.coords().map(|coord| LatLng::from(*coord)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<DrivingRoute, TrackingError> {
        parse_route(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn ok_response() {
        let route = parse(r#"{
            "status": "OK",
            "routes": [{
                "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"},
                "legs": [{
                    "distance": {"text": "7.4 km", "value": 7412},
                    "duration": {"text": "14 mins", "value": 840}
                }]
            }]
        }"#).unwrap();

        assert_eq!(route.distance_text, "7.4 km");
        assert_eq!(route.duration_text, "14 mins");
        assert_eq!(route.path.len(), 3);
        assert!((route.path[0].latitude - 38.5).abs() < 1e-9);
        assert!((route.path[0].longitude + 120.2).abs() < 1e-9);
        assert!((route.path[2].latitude - 43.252).abs() < 1e-9);
        assert!((route.path[2].longitude + 126.453).abs() < 1e-9);
    }

    #[test]
    fn zero_results() {
        let err = parse(r#"{"status": "ZERO_RESULTS", "routes": []}"#).unwrap_err();
        assert!(matches!(err, TrackingError::Directions(msg) if msg.contains("ZERO_RESULTS")));
    }

    #[test]
    fn denied_request_reports_message() {
        let err = parse(r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#).unwrap_err();
        assert!(matches!(err, TrackingError::Directions(msg) if msg.contains("API key is invalid")));
    }

    #[test]
    fn ok_without_routes() {
        assert!(parse(r#"{"status": "OK", "routes": []}"#).is_err());
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_network() {
        let directions = GoogleDirections::new(Some("   ".into())).unwrap();
        let result = directions.driving_route(LatLng::new(24.71, 46.67), LatLng::new(24.7136, 46.6753)).await;
        assert_eq!(result, Err(TrackingError::Directions("No maps API key configured".into())));
    }
}
