//! Proximity gate: the broadcaster must be physically near the clubhouse.

use crate::geo::{self, Coordinate};

/// Outcome of the proximity gate.
#[derive(Debug, Clone, PartialEq)]
pub enum ProximityCheck {
    Pass,
    /// Carries the measured distance and its formatted rendering.
    TooFar { distance_m: f64, description: String },
}

impl ProximityCheck {
    pub fn passed(&self) -> bool {
        matches!(self, ProximityCheck::Pass)
    }
}

/// Decide whether `measured` is close enough to `reference`.
///
/// The boundary is inclusive: a distance exactly equal to `max_distance_m`
/// passes. `bypass` disables the check entirely.
pub fn check(
    reference: &Coordinate,
    measured: &Coordinate,
    max_distance_m: f64,
    bypass: bool,
) -> ProximityCheck {
    let distance_m = reference.distance_m(measured);
    if bypass || distance_m <= max_distance_m {
        ProximityCheck::Pass
    } else {
        ProximityCheck::TooFar {
            distance_m,
            description: geo::format_distance(distance_m),
        }
    }
}
