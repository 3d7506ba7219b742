use geo_types::{coord, Rect};
use pickup_tracker_lib::{coordinate::LatLng, geo_math::normalize_degrees, route::RoutePanel};

use super::MapSurface;

// Viewport of a 1024x768 map on 256px tiles
const VIEWPORT_TILES_X: f64 = 4.;
const VIEWPORT_ASPECT: f64 = 0.75;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub rotation_degrees: f64,
}

/// The line currently drawn between vehicle and destination.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Route(Vec<LatLng>),
    StraightLine(LatLng, LatLng),
}

/// A map without a screen. Keeps the scene in memory and logs every change, which is all
/// a terminal session or a test needs.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    pub center: Option<LatLng>,
    pub zoom: f64,
    pub viewport: Option<Rect>,
    pub destination: Option<(LatLng, String)>,
    pub origin: Option<Marker>,
    pub overlay: Option<Overlay>,
    pub panel: Option<RoutePanel>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }
}

fn viewport_around(center: LatLng, zoom: f64) -> Rect {
    let half_width = (360. * VIEWPORT_TILES_X / 2f64.powf(zoom) / 2.).min(180.);
    let half_height = half_width * VIEWPORT_ASPECT;
    Rect::new(
        coord! { x: center.longitude - half_width, y: (center.latitude - half_height).max(-90.) },
        coord! { x: center.longitude + half_width, y: (center.latitude + half_height).min(90.) },
    )
}

impl MapSurface for HeadlessMap {
    fn render_map(&mut self, center: LatLng, zoom: f64) {
        tracing::info!("Map centered on {:.5}, {:.5} at zoom {}", center.latitude, center.longitude, zoom);
        *self = HeadlessMap {
            center: Some(center),
            zoom,
            viewport: Some(viewport_around(center, zoom)),
            ..Default::default()
        };
    }

    fn place_destination_marker(&mut self, position: LatLng, label: &str) {
        tracing::info!("Destination '{}' at {:.5}, {:.5}", label, position.latitude, position.longitude);
        self.destination = Some((position, label.to_string()));
    }

    fn move_origin_marker(&mut self, position: LatLng, rotation_degrees: f64) {
        tracing::debug!("Vehicle at {:.5}, {:.5} heading {:.1}°", position.latitude, position.longitude, rotation_degrees);
        self.origin = Some(Marker {
            position,
            rotation_degrees,
        });
    }

    fn visible_bounds(&self) -> Option<Rect> {
        self.viewport
    }

    fn fit_bounds(&mut self, bounds: Rect) {
        tracing::debug!("Fitting view to {:?}", bounds);
        let center = bounds.center();
        self.center = Some(LatLng::new(center.y, normalize_degrees(center.x + 180.) - 180.));
        self.viewport = Some(bounds);
    }

    fn draw_route(&mut self, path: &[LatLng]) {
        tracing::debug!("Drawing route with {} points", path.len());
        self.overlay = Some(Overlay::Route(path.to_vec()));
    }

    fn draw_straight_line(&mut self, from: LatLng, to: LatLng) {
        tracing::debug!("Drawing straight line");
        self.overlay = Some(Overlay::StraightLine(from, to));
    }

    fn show_panel(&mut self, panel: &RoutePanel) {
        match &panel.duration_text {
            Some(duration) => tracing::info!("{}: {} ({})", panel.label, panel.distance_text, duration),
            None => tracing::info!("{}: {}", panel.label, panel.distance_text),
        }
        if panel.warning {
            tracing::warn!("⚠ {}", panel.label);
        }
        self.panel = Some(panel.clone());
    }
}

#[cfg(test)]
mod tests {
    use geo::Contains;
    use geo_types::Point;

    use super::*;

    #[test]
    fn render_resets_scene() {
        let mut map = HeadlessMap::new();
        map.move_origin_marker(LatLng::new(1., 1.), 45.);
        map.render_map(LatLng::new(24.7136, 46.6753), 14.);

        assert_eq!(map.origin, None);
        assert_eq!(map.center, Some(LatLng::new(24.7136, 46.6753)));
        assert!(map.visible_bounds().unwrap().contains(&Point::from(LatLng::new(24.7136, 46.6753))));
    }

    #[test]
    fn viewport_shrinks_with_zoom() {
        let center = LatLng::new(24.7136, 46.6753);
        let wide = viewport_around(center, 10.);
        let close = viewport_around(center, 14.);
        assert!(wide.width() > close.width());
        assert!((wide.width() / close.width() - 16.).abs() < 1e-9);
    }

    #[test]
    fn viewport_never_wraps_the_globe() {
        let viewport = viewport_around(LatLng::new(0., 0.), 0.);
        assert_eq!(viewport.width(), 360.);
        assert!(viewport.height() <= 180.);
    }

    #[test]
    fn fit_bounds_past_the_antimeridian_recenters_on_a_regular_longitude() {
        let mut map = HeadlessMap::new();
        map.render_map(LatLng::new(0., 0.), 14.);
        map.fit_bounds(Rect::new(coord! { x: 179.99, y: -17. }, coord! { x: 180.03, y: -16. }));

        let center = map.center.unwrap();
        assert!((center.longitude - -179.99).abs() < 1e-9, "center was {center:?}");
        assert!(center.is_valid());
    }

    #[test]
    fn fit_bounds_recenters() {
        let mut map = HeadlessMap::new();
        map.render_map(LatLng::new(0., 0.), 14.);
        map.fit_bounds(Rect::new(coord! { x: 10., y: 20. }, coord! { x: 12., y: 22. }));
        assert_eq!(map.center, Some(LatLng::new(21., 11.)));
    }
}
