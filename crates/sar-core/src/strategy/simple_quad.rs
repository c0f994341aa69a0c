//! Back-and-forth sweep over a quadrilateral.

use super::{passes_needed, validate_pass_spacing};
use crate::error::{PlannerError, Result};
use crate::geo::{closest_index, haversine_distance, interpolate, GeoPoint};
use crate::search_area::SearchArea;

/// Which pair of opposite edges to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Edges `(w0, w1)` and `(w2, w3)`
    Horizontal,
    /// Edges `(w0, w3)` and `(w1, w2)`
    Vertical,
}

/// Sweeps a quadrilateral with passes joining two opposite edges.
///
/// Passes are spread along the edges `(v0, v1)` and `(v3, v2)`, where `v0`
/// is the vertex closest to the drone, and are flown alternately in
/// opposite directions.
///
/// By default the sweep flies `max(2, ceil(L / s))` passes, where `L` is the
/// longer of the two stepped edges and `s` the pass spacing. With
/// [`with_strict_spacing`](Self::with_strict_spacing) one more pass is
/// flown so that adjacent passes are never more than `s` apart.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleQuadStrategy {
    max_dist_between_passes: f64,
    strict_spacing: bool,
}

impl SimpleQuadStrategy {
    const NAME: &'static str = "SimpleQuad";

    /// `max_dist_between_passes` is in meters and must be strictly positive.
    pub fn new(max_dist_between_passes: f64) -> Result<Self> {
        Ok(Self {
            max_dist_between_passes: validate_pass_spacing(max_dist_between_passes)?,
            strict_spacing: false,
        })
    }

    /// Add the extra pass that keeps every gap within the pass spacing.
    pub fn with_strict_spacing(mut self) -> Self {
        self.strict_spacing = true;
        self
    }

    pub fn strict_spacing(&self) -> bool {
        self.strict_spacing
    }

    /// Number of passes for an edge of `edge_len` meters.
    pub fn pass_count(&self, edge_len: f64) -> Result<usize> {
        let passes = passes_needed(edge_len, self.max_dist_between_passes)?;
        let passes = if self.strict_spacing { passes + 1 } else { passes };
        Ok(passes.max(2))
    }

    pub fn max_dist_between_passes(&self) -> f64 {
        self.max_dist_between_passes
    }

    pub fn accepts_area(&self, area: &SearchArea) -> bool {
        matches!(area, SearchArea::Quadrilateral(_))
    }

    /// Longest of the two edges selected by `orientation`, in meters.
    pub fn compute_max_dist(waypoints: &[GeoPoint; 4], orientation: Orientation) -> f64 {
        let [w0, w1, w2, w3] = waypoints;
        match orientation {
            Orientation::Horizontal => haversine_distance(w0, w1).max(haversine_distance(w2, w3)),
            Orientation::Vertical => haversine_distance(w0, w3).max(haversine_distance(w1, w2)),
        }
    }

    pub fn create_flight_path(&self, start: GeoPoint, area: &SearchArea) -> Result<Vec<GeoPoint>> {
        let SearchArea::Quadrilateral(quad) = area else {
            return Err(PlannerError::UnsupportedArea {
                strategy: Self::NAME,
                shape: area.shape().name(),
            });
        };
        area.ensure_complete()?;

        let vertices: [GeoPoint; 4] = quad
            .vertices()
            .try_into()
            .map_err(|_| PlannerError::IncompleteArea {
                shape: area.shape().name(),
                vertices: quad.vertices().len(),
            })?;
        let [v0, v1, v2, v3] = reorder_from_closest(&vertices, &start);

        let edge_len = Self::compute_max_dist(&[v0, v1, v2, v3], Orientation::Horizontal);
        let steps = self.pass_count(edge_len)?;

        let mut path = Vec::with_capacity(steps * 2);
        for step in 0..steps {
            let fraction = step as f64 / (steps - 1) as f64;
            path.push(interpolate(&v0, &v1, fraction));
            path.push(interpolate(&v3, &v2, fraction));

            if step % 2 == 1 {
                let len = path.len();
                path.swap(len - 1, len - 2);
            }
        }

        Ok(path)
    }
}

/// Rotate the vertices so the one closest to `start` comes first, then
/// mirror them around it when that makes the passes span the longer edges.
///
/// Rotation and mirroring both keep the two opposite-edge pairings.
fn reorder_from_closest(vertices: &[GeoPoint; 4], start: &GeoPoint) -> [GeoPoint; 4] {
    let first = closest_index(vertices, start).unwrap_or(0);
    let rotated: [GeoPoint; 4] = std::array::from_fn(|i| vertices[(first + i) % 4]);

    let horizontal = SimpleQuadStrategy::compute_max_dist(&rotated, Orientation::Horizontal);
    let vertical = SimpleQuadStrategy::compute_max_dist(&rotated, Orientation::Vertical);
    if vertical < horizontal {
        let [v0, v1, v2, v3] = rotated;
        [v0, v3, v2, v1]
    } else {
        rotated
    }
}
