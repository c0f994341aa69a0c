//! Error types for mission planning.

use thiserror::Error;

/// Broad category of a [`PlannerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed a value the operation cannot work with.
    InvalidArgument,
    /// The operation is not allowed in the current state.
    InvalidState,
}

/// Main error type for planning operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinate: lat {lat}, lon {lon}")]
    InvalidCoordinate {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lon: f64,
    },

    /// Maximum distance between passes must be finite and strictly positive
    #[error("Maximum distance between passes must be strictly positive, got {0}")]
    InvalidPassSpacing(f64),

    /// Search area does not have enough vertices yet
    #[error("{shape} search area is not complete ({vertices} vertices)")]
    IncompleteArea {
        /// Shape name
        shape: &'static str,
        /// Current vertex count
        vertices: usize,
    },

    /// Spacing would need more passes than a flight path may hold
    #[error("Pass spacing of {spacing_m} m is too small to cover {extent_m:.0} m")]
    PassSpacingTooSmall {
        /// Requested spacing in meters
        spacing_m: f64,
        /// Extent to sweep in meters
        extent_m: f64,
    },

    /// Search area shape is not handled by the strategy
    #[error("{strategy} strategy does not accept {shape} search areas")]
    UnsupportedArea {
        /// Strategy name
        strategy: &'static str,
        /// Shape name
        shape: &'static str,
    },

    /// No vertex matches the one to move
    #[error("No vertex at ({lat}, {lon})")]
    VertexNotFound {
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lon: f64,
    },

    /// Area already holds the maximum number of vertices
    #[error("{shape} is already complete ({max} vertices)")]
    AreaAlreadyComplete {
        /// Shape name
        shape: &'static str,
        /// Upper vertex bound
        max: usize,
    },

    #[error("Mission has no starting location")]
    MissingStartingLocation,

    #[error("Mission has no search area")]
    MissingSearchArea,

    /// Mission was asked to build before its search area was finished
    #[error("Mission search area is not complete ({shape}, {vertices} vertices)")]
    MissionAreaIncomplete {
        /// Shape name
        shape: &'static str,
        /// Current vertex count
        vertices: usize,
    },

    #[error("Mission has no overflight strategy")]
    MissingStrategy,

    /// Configuration value out of range or unparsable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlannerError {
    /// Category used by callers to decide how to surface the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlannerError::InvalidCoordinate { .. }
            | PlannerError::InvalidPassSpacing(_)
            | PlannerError::PassSpacingTooSmall { .. }
            | PlannerError::IncompleteArea { .. }
            | PlannerError::UnsupportedArea { .. }
            | PlannerError::VertexNotFound { .. }
            | PlannerError::InvalidConfig(_) => ErrorKind::InvalidArgument,
            PlannerError::AreaAlreadyComplete { .. }
            | PlannerError::MissingStartingLocation
            | PlannerError::MissingSearchArea
            | PlannerError::MissionAreaIncomplete { .. }
            | PlannerError::MissingStrategy => ErrorKind::InvalidState,
        }
    }
}

/// Result alias for planning operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(PlannerError::InvalidPassSpacing(0.0).kind(), ErrorKind::InvalidArgument);
        assert_eq!(PlannerError::MissingStrategy.kind(), ErrorKind::InvalidState);
        assert_eq!(
            PlannerError::AreaAlreadyComplete { shape: "Quadrilateral", max: 4 }.kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            PlannerError::MissionAreaIncomplete { shape: "Circle", vertices: 1 }.kind(),
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn messages_name_the_shape() {
        let err = PlannerError::IncompleteArea { shape: "Circle", vertices: 1 };
        assert_eq!(err.to_string(), "Circle search area is not complete (1 vertices)");
    }
}
