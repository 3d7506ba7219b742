use serde::{Deserialize, Serialize};

use crate::coordinate::LatLng;

pub const DRIVING_ROUTE_LABEL: &str = "Driving route";
pub const STRAIGHT_LINE_LABEL: &str = "Straight line distance (no route available)";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DrivingRoute {
    pub distance_text: String,
    pub duration_text: String,
    pub path: Vec<LatLng>,
}

/// Distance between the vehicle and the destination, either as a real driving route
/// or as a great-circle estimate when no route could be found.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum RouteResult {
    DrivingRoute(DrivingRoute),
    StraightLineEstimate { distance_km: f64 },
}

impl RouteResult {
    pub fn label(&self) -> &'static str {
        match self {
            RouteResult::DrivingRoute(_) => DRIVING_ROUTE_LABEL,
            RouteResult::StraightLineEstimate { .. } => STRAIGHT_LINE_LABEL,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RouteResult::StraightLineEstimate { .. })
    }

    pub fn panel(&self) -> RoutePanel {
        match self {
            RouteResult::DrivingRoute(route) => RoutePanel {
                label: DRIVING_ROUTE_LABEL.into(),
                distance_text: route.distance_text.clone(),
                duration_text: Some(route.duration_text.clone()),
                warning: false,
            },
            RouteResult::StraightLineEstimate { distance_km } => RoutePanel {
                label: STRAIGHT_LINE_LABEL.into(),
                distance_text: format!("{:.1} km", distance_km),
                duration_text: None,
                warning: true,
            },
        }
    }
}

/// What the distance panel next to the map shows.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RoutePanel {
    pub label: String,
    pub distance_text: String,
    pub duration_text: Option<String>,
    pub warning: bool,
}

#[test]
fn fallback_panel_carries_warning() {
    let estimate = RouteResult::StraightLineEstimate { distance_km: 111.2 };
    let panel = estimate.panel();
    assert_eq!(panel.label, STRAIGHT_LINE_LABEL);
    assert_eq!(panel.distance_text, "111.2 km");
    assert_eq!(panel.duration_text, None);
    assert!(panel.warning);
    assert!(estimate.is_fallback());
}

#[test]
fn driving_panel() {
    let route = RouteResult::DrivingRoute(DrivingRoute {
        distance_text: "7.4 km".into(),
        duration_text: "12 mins".into(),
        path: vec![LatLng::new(24.71, 46.67), LatLng::new(24.69, 46.72)],
    });
    let panel = route.panel();
    assert_eq!(panel.label, DRIVING_ROUTE_LABEL);
    assert_eq!(panel.duration_text.as_deref(), Some("12 mins"));
    assert!(!panel.warning);
    assert!(!route.is_fallback());
}
