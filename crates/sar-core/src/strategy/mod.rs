//! Overflight strategies: turn a search area into an ordered waypoint list.

mod simple_quad;
mod spiral;

pub use simple_quad::{Orientation, SimpleQuadStrategy};
pub use spiral::{SpiralStrategy, POINTS_PER_TURN};

use crate::error::{PlannerError, Result};
use crate::geo::GeoPoint;
use crate::search_area::{AreaShape, SearchArea};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Most passes (quad sweep) or turns (spiral) a single flight path may hold.
pub const MAX_PASSES: usize = 10_000;

/// Strategy selected by the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Back-and-forth sweep over a quadrilateral
    #[default]
    Zigzag,
    /// Inward spiral over a circle
    Spiral,
}

impl StrategyKind {
    /// Build the concrete strategy for this kind.
    pub fn instantiate(self, max_dist_between_passes_m: f64) -> Result<OverflightStrategy> {
        Ok(match self {
            StrategyKind::Zigzag => {
                OverflightStrategy::SimpleQuad(SimpleQuadStrategy::new(max_dist_between_passes_m)?)
            }
            StrategyKind::Spiral => {
                OverflightStrategy::Spiral(SpiralStrategy::new(max_dist_between_passes_m)?)
            }
        })
    }

    /// Parse a stored preference; anything unrecognized means zigzag.
    pub fn from_preference(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Zigzag => "zigzag",
            StrategyKind::Spiral => "spiral",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zigzag" => Ok(StrategyKind::Zigzag),
            "spiral" => Ok(StrategyKind::Spiral),
            other => Err(PlannerError::InvalidConfig(format!("unknown strategy '{other}'"))),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed set of overflight strategies.
#[derive(Debug, Clone, PartialEq)]
pub enum OverflightStrategy {
    SimpleQuad(SimpleQuadStrategy),
    Spiral(SpiralStrategy),
}

impl OverflightStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            OverflightStrategy::SimpleQuad(_) => StrategyKind::Zigzag,
            OverflightStrategy::Spiral(_) => StrategyKind::Spiral,
        }
    }

    /// Shape the operator has to draw for this strategy.
    pub fn area_shape(&self) -> AreaShape {
        match self {
            OverflightStrategy::SimpleQuad(_) => AreaShape::Quadrilateral,
            OverflightStrategy::Spiral(_) => AreaShape::Circle,
        }
    }

    pub fn max_dist_between_passes(&self) -> f64 {
        match self {
            OverflightStrategy::SimpleQuad(s) => s.max_dist_between_passes(),
            OverflightStrategy::Spiral(s) => s.max_dist_between_passes(),
        }
    }

    pub fn accepts_area(&self, area: &SearchArea) -> bool {
        match self {
            OverflightStrategy::SimpleQuad(s) => s.accepts_area(area),
            OverflightStrategy::Spiral(s) => s.accepts_area(area),
        }
    }

    /// Waypoints covering `area`, starting near `start`.
    pub fn create_flight_path(&self, start: GeoPoint, area: &SearchArea) -> Result<Vec<GeoPoint>> {
        let path = match self {
            OverflightStrategy::SimpleQuad(s) => s.create_flight_path(start, area)?,
            OverflightStrategy::Spiral(s) => s.create_flight_path(start, area)?,
        };
        tracing::debug!("{} strategy produced {} waypoints", self.kind(), path.len());
        Ok(path)
    }
}

impl From<SimpleQuadStrategy> for OverflightStrategy {
    fn from(strategy: SimpleQuadStrategy) -> Self {
        OverflightStrategy::SimpleQuad(strategy)
    }
}

impl From<SpiralStrategy> for OverflightStrategy {
    fn from(strategy: SpiralStrategy) -> Self {
        OverflightStrategy::Spiral(strategy)
    }
}

/// Shared construction check for pass spacing.
fn validate_pass_spacing(max_dist_m: f64) -> Result<f64> {
    if max_dist_m.is_finite() && max_dist_m > 0.0 {
        Ok(max_dist_m)
    } else {
        tracing::warn!("Rejected pass spacing {}", max_dist_m);
        Err(PlannerError::InvalidPassSpacing(max_dist_m))
    }
}

/// `ceil(extent_m / spacing_m)`, refusing counts above [`MAX_PASSES`].
fn passes_needed(extent_m: f64, spacing_m: f64) -> Result<usize> {
    let passes = (extent_m / spacing_m).ceil();
    if passes.is_finite() && passes <= MAX_PASSES as f64 {
        Ok(passes as usize)
    } else {
        tracing::warn!("Spacing {} m too small for {} m", spacing_m, extent_m);
        Err(PlannerError::PassSpacingTooSmall {
            spacing_m,
            extent_m,
        })
    }
}
