use chrono::{DateTime, Utc};
use pickup_tracker_lib::{coordinate::LatLng, location_sample::LocationSample};
use serde_json::Value;

use crate::TrackingError;

/// Turns a location payload into a sample. Coordinates may be JSON numbers or numeric strings.
pub fn parse_location(payload: &Value, received_at: DateTime<Utc>) -> Result<LocationSample, TrackingError> {
    let latitude = coordinate_field(payload, "latitude")?;
    let longitude = coordinate_field(payload, "longitude")?;

    let position = LatLng::new(latitude, longitude);
    if !position.is_valid() {
        return Err(TrackingError::Payload(format!("Coordinate out of range: {latitude}, {longitude}")));
    }

    Ok(LocationSample::at(position, received_at))
}

fn coordinate_field(payload: &Value, name: &str) -> Result<f64, TrackingError> {
    match payload.get(name) {
        Some(Value::Number(number)) => number.as_f64()
            .ok_or(TrackingError::Payload(format!("{name} is not representable: {number}"))),
        Some(Value::String(text)) => text.trim().parse::<f64>()
            .map_err(|_| TrackingError::Payload(format!("{name} is not a number: {text:?}"))),
        Some(Value::Null) | None => Err(TrackingError::Payload(format!("Missing {name}"))),
        Some(other) => Err(TrackingError::Payload(format!("Unsupported {name} value: {other}"))),
    }
}
