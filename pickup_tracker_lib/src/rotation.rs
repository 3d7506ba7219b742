use serde::{Deserialize, Serialize};

use crate::geo_math::{normalize_degrees, shortest_delta};

/// Fraction of the remaining turn applied per position update.
pub const ROTATION_SMOOTHING: f64 = 0.2;

/// Heading of the moving marker. Eases toward each new bearing instead of snapping to it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub current_bearing_degrees: f64,
}

impl RotationState {
    pub fn new(current_bearing_degrees: f64) -> Self {
        Self {
            current_bearing_degrees: normalize_degrees(current_bearing_degrees),
        }
    }

    /// Turns toward `target` along the shorter way around and returns the new heading.
    pub fn turn_toward(&mut self, target: f64) -> f64 {
        let delta = shortest_delta(self.current_bearing_degrees, normalize_degrees(target));
        self.current_bearing_degrees = normalize_degrees(self.current_bearing_degrees + delta * ROTATION_SMOOTHING);
        self.current_bearing_degrees
    }
}
