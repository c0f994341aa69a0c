//! Inward Archimedean spiral over a circular area.

use super::{passes_needed, validate_pass_spacing};
use crate::error::{PlannerError, Result};
use crate::geo::{bearing_deg, offset, GeoPoint};
use crate::search_area::SearchArea;

/// Samples taken per revolution of the spiral.
pub const POINTS_PER_TURN: usize = 24;

/// Spirals from the circle's edge to its center.
///
/// The radius shrinks by at most the configured pass spacing per
/// revolution, and the outermost point faces the starting position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralStrategy {
    max_dist_between_passes: f64,
}

impl SpiralStrategy {
    const NAME: &'static str = "Spiral";

    pub fn new(max_dist_between_passes: f64) -> Result<Self> {
        Ok(Self {
            max_dist_between_passes: validate_pass_spacing(max_dist_between_passes)?,
        })
    }

    pub fn max_dist_between_passes(&self) -> f64 {
        self.max_dist_between_passes
    }

    pub fn accepts_area(&self, area: &SearchArea) -> bool {
        matches!(area, SearchArea::Circle(_))
    }

    pub fn create_flight_path(&self, start: GeoPoint, area: &SearchArea) -> Result<Vec<GeoPoint>> {
        let SearchArea::Circle(circle) = area else {
            return Err(PlannerError::UnsupportedArea {
                strategy: Self::NAME,
                shape: area.shape().name(),
            });
        };
        area.ensure_complete()?;

        let turns = passes_needed(circle.radius_m, self.max_dist_between_passes)?.max(1);
        let pitch = circle.radius_m / turns as f64;
        let samples = turns * POINTS_PER_TURN;
        let entry_bearing = if start == circle.center {
            0.0
        } else {
            bearing_deg(&circle.center, &start)
        };

        // Sample k sits (samples - k) steps before the center, walking
        // counter-clockwise away from the entry bearing.
        let path = (0..=samples)
            .map(|k| {
                let remaining = (samples - k) as f64 / POINTS_PER_TURN as f64;
                let radius = pitch * remaining;
                let bearing = entry_bearing - 360.0 * (k as f64 / POINTS_PER_TURN as f64);
                offset(&circle.center, radius, bearing.rem_euclid(360.0))
            })
            .collect();

        Ok(path)
    }
}
