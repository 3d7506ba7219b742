use geo::Contains;
use geo_types::{coord, Point, Rect};
use pickup_tracker_lib::{coordinate::LatLng, geo_math::shortest_delta, route::RoutePanel};

mod headless;

pub use headless::{HeadlessMap, Marker, Overlay};

pub const DEFAULT_ZOOM: f64 = 14.;

/// Margin added around fitted bounds, as a fraction of their span.
const FIT_PADDING: f64 = 0.1;
/// Smallest padding in degrees, so two nearly identical points still get some room.
const MIN_PADDING_DEGREES: f64 = 0.002;

/// Whatever draws the tracking map. Positions are plain coordinates and angles are
/// compass degrees, so the surface needs no knowledge of the tracking state.
pub trait MapSurface {
    fn render_map(&mut self, center: LatLng, zoom: f64);

    fn place_destination_marker(&mut self, position: LatLng, label: &str);

    /// Shows the vehicle marker at `position`, facing `rotation_degrees`. The marker stays
    /// hidden until the first call.
    fn move_origin_marker(&mut self, position: LatLng, rotation_degrees: f64);

    /// Currently visible area, if known. geo-types axis order (x = longitude).
    fn visible_bounds(&self) -> Option<Rect>;

    fn fit_bounds(&mut self, bounds: Rect);

    fn draw_route(&mut self, path: &[LatLng]);

    fn draw_straight_line(&mut self, from: LatLng, to: LatLng);

    fn show_panel(&mut self, panel: &RoutePanel);
}

/// Padded bounding box around two positions, spanning the shorter way around the globe.
///
/// A box crossing the antimeridian keeps one continuous longitude range, so one of its
/// edges lies past ±180. Its center is always a regular longitude.
pub fn bounds_containing(a: LatLng, b: LatLng) -> Rect {
    let b_longitude = a.longitude + shortest_delta(a.longitude, b.longitude);
    let rect = Rect::new(coord! { x: a.longitude, y: a.latitude }, coord! { x: b_longitude, y: b.latitude });
    let pad_x = (rect.width() * FIT_PADDING).max(MIN_PADDING_DEGREES);
    let pad_y = (rect.height() * FIT_PADDING).max(MIN_PADDING_DEGREES);

    let center_x = rect.center().x;
    let shift = if center_x >= 180. {
        -360.
    } else if center_x < -180. {
        360.
    } else {
        0.
    };

    Rect::new(
        coord! { x: rect.min().x - pad_x + shift, y: (rect.min().y - pad_y).max(-90.) },
        coord! { x: rect.max().x + pad_x + shift, y: (rect.max().y + pad_y).min(90.) },
    )
}

/// Whether `bounds` shows `position`, including boxes that run past the antimeridian.
pub fn bounds_contain(bounds: &Rect, position: LatLng) -> bool {
    [0., 360., -360.].iter().any(|shift| {
        bounds.contains(&Point::new(position.longitude + shift, position.latitude))
    })
}

#[test]
fn bounds_contain_both_points_with_margin() {
    let bus = LatLng::new(24.71, 46.67);
    let school = LatLng::new(24.7136, 46.6753);
    let bounds = bounds_containing(school, bus);

    assert!(bounds.contains(&Point::from(bus)));
    assert!(bounds.contains(&Point::from(school)));
    assert!(bounds.min().x < 46.67 && bounds.max().x > 46.6753);
    assert!(bounds.min().y < 24.71 && bounds.max().y > 24.7136);
}

#[test]
fn identical_points_still_get_an_area() {
    let p = LatLng::new(10., 10.);
    let bounds = bounds_containing(p, p);
    assert!(bounds.width() > 0. && bounds.height() > 0.);
}

#[test]
fn bounds_across_the_antimeridian_take_the_short_way() {
    let destination = LatLng::new(-16.5, 179.99);
    let vehicle = LatLng::new(-16.5, -179.995);
    let bounds = bounds_containing(vehicle, destination);

    assert!(bounds.width() < 0.1, "width was {}", bounds.width());
    assert!((-180. ..180.).contains(&bounds.center().x));
    assert!(bounds_contain(&bounds, vehicle));
    assert!(bounds_contain(&bounds, destination));
    assert!(!bounds_contain(&bounds, LatLng::new(-16.5, 0.)));
}
