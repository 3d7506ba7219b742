use crate::coordinate::LatLng;

/// Mean radius of the earth in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in km.
pub fn haversine_distance(p1: LatLng, p2: LatLng) -> f64 {
    let d_lat = (p2.latitude - p1.latitude).to_radians();
    let d_lon = (p2.longitude - p1.longitude).to_radians();
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();

    let a = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    let c = 2. * f64::asin(f64::sqrt(a.min(1.)));

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in km, rounded to one decimal as shown on the distance panel.
pub fn straight_line_km(p1: LatLng, p2: LatLng) -> f64 {
    (haversine_distance(p1, p2) * 10.).round() / 10.
}

/// Initial great-circle bearing from `from` to `to`, in degrees within [0, 360).
///
/// Returns `None` when both positions are identical, as there is no direction to face.
pub fn bearing(from: LatLng, to: LatLng) -> Option<f64> {
    if from == to {
        return None;
    }

    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = f64::sin(d_lon) * f64::cos(lat2);
    let x = f64::cos(lat1) * f64::sin(lat2) - f64::sin(lat1) * f64::cos(lat2) * f64::cos(d_lon);

    Some(normalize_degrees(y.atan2(x).to_degrees()))
}

pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360. { 0. } else { wrapped }
}

/// Shortest signed turn from `from` to `to`, in (-180, 180].
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let mut delta = to - from;
    if delta > 180. {
        delta -= 360.;
    } else if delta < -180. {
        delta += 360.;
    }
    delta
}
