//! SAR Core - coverage path planning for search-and-rescue drone missions.
//!
//! The operator draws a search area, a strategy sweeps it with passes no
//! farther apart than the sensor footprint, and the resulting waypoints
//! become mission items for the drone.

pub mod config;
pub mod error;
pub mod geo;
pub mod listeners;
pub mod mission;
pub mod search_area;
pub mod session;
pub mod strategy;

pub use config::{PlannerConfig, GROUND_SENSOR_SCOPE_M};
pub use error::{ErrorKind, PlannerError, Result};
pub use geo::{bearing_deg, haversine_distance, interpolate, offset, GeoPoint, EARTH_RADIUS_M};
pub use listeners::{ListenerId, Listeners};
pub use mission::{
    make_drone_mission, return_mission, CameraAction, MissionBuilder, MissionItem, MissionParams,
    MissionSummary, ReturnTarget, DEFAULT_ALTITUDE_M, DEFAULT_SPEED_MPS,
};
pub use search_area::{
    AreaShape, CircleArea, PolygonArea, QuadrilateralArea, SearchArea, SearchAreaBuilder,
};
pub use session::PlanningSession;
pub use strategy::{
    Orientation, OverflightStrategy, SimpleQuadStrategy, SpiralStrategy, StrategyKind, MAX_PASSES,
};
