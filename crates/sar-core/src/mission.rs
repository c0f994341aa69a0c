//! Mission items and the builder that turns a search area into a mission.

use crate::error::{PlannerError, Result};
use crate::geo::{path_length, GeoPoint};
use crate::listeners::{ListenerId, Listeners};
use crate::search_area::SearchArea;
use crate::strategy::OverflightStrategy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALTITUDE_M: f32 = 10.0;
pub const DEFAULT_SPEED_MPS: f32 = 10.0;
pub const DEFAULT_PHOTO_INTERVAL_S: f64 = 1.0;

/// Camera action performed when a mission item is reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAction {
    #[default]
    None,
    TakePhoto,
    StartPhotoInterval,
    StopPhotoInterval,
    StartVideo,
    StopVideo,
}

/// Flight parameters applied to every generated item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionParams {
    /// Altitude above takeoff in meters
    pub altitude_m: f32,
    pub speed_mps: f32,
    pub camera_photo_interval_s: f64,
}

impl Default for MissionParams {
    fn default() -> Self {
        Self {
            altitude_m: DEFAULT_ALTITUDE_M,
            speed_mps: DEFAULT_SPEED_MPS,
            camera_photo_interval_s: DEFAULT_PHOTO_INTERVAL_S,
        }
    }
}

/// A single commanded waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionItem {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub relative_altitude_m: f32,
    pub speed_m_s: f32,
    /// Fly past the waypoint without stopping
    pub is_fly_through: bool,
    #[serde(default)]
    pub gimbal_pitch_deg: Option<f32>,
    #[serde(default)]
    pub gimbal_yaw_deg: Option<f32>,
    #[serde(default)]
    pub camera_action: CameraAction,
    #[serde(default)]
    pub loiter_time_s: Option<f32>,
    pub camera_photo_interval_s: f64,
}

impl MissionItem {
    /// Fly-through waypoint with no gimbal or camera command.
    pub fn waypoint(point: GeoPoint, params: &MissionParams) -> Self {
        Self {
            latitude_deg: point.lat,
            longitude_deg: point.lon,
            relative_altitude_m: params.altitude_m,
            speed_m_s: params.speed_mps,
            is_fly_through: true,
            gimbal_pitch_deg: None,
            gimbal_yaw_deg: None,
            camera_action: CameraAction::None,
            loiter_time_s: None,
            camera_photo_interval_s: params.camera_photo_interval_s,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new_unchecked(self.latitude_deg, self.longitude_deg)
    }
}

/// Convert a flight path into mission items, one per waypoint.
pub fn make_drone_mission(path: &[GeoPoint], params: &MissionParams) -> Vec<MissionItem> {
    path.iter()
        .map(|point| MissionItem::waypoint(*point, params))
        .collect()
}

/// Where a return mission sends the drone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "lowercase")]
pub enum ReturnTarget {
    /// Launch position of the drone
    Home(GeoPoint),
    /// Current position of the operator
    User(GeoPoint),
}

impl ReturnTarget {
    pub fn location(&self) -> GeoPoint {
        match self {
            ReturnTarget::Home(p) | ReturnTarget::User(p) => *p,
        }
    }
}

/// Mission flying straight to `target` and stopping there to land.
pub fn return_mission(target: ReturnTarget, params: &MissionParams) -> Vec<MissionItem> {
    let item = MissionItem {
        is_fly_through: false,
        ..MissionItem::waypoint(target.location(), params)
    };
    tracing::info!("Return mission to {:?}", target);
    vec![item]
}

/// Aggregate figures for a generated mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub waypoints: usize,
    pub total_distance_m: f64,
    /// Time to fly the path at the commanded speed, `None` when speed is zero
    pub estimated_flight_time_s: Option<f64>,
}

impl MissionSummary {
    pub fn from_items(items: &[MissionItem]) -> Self {
        let path: Vec<GeoPoint> = items.iter().map(MissionItem::position).collect();
        let total_distance_m = path_length(&path);
        let speed = items.first().map(|item| item.speed_m_s as f64).unwrap_or(0.0);
        Self {
            waypoints: items.len(),
            total_distance_m,
            estimated_flight_time_s: (speed > 0.0).then(|| total_distance_m / speed),
        }
    }
}

/// Combines a starting location, a search area and a strategy into mission items.
///
/// Every setter rebuilds the mission and hands the result to the
/// `generated_mission_changed` listeners; an empty slice means the inputs
/// cannot currently produce a mission.
#[derive(Debug, Default)]
pub struct MissionBuilder {
    starting_location: Option<GeoPoint>,
    search_area: Option<SearchArea>,
    strategy: Option<OverflightStrategy>,
    params: MissionParams,
    generated_mission_changed: Listeners<[MissionItem]>,
}

impl MissionBuilder {
    pub fn new(params: MissionParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn with_starting_location(&mut self, location: GeoPoint) -> &mut Self {
        self.starting_location = Some(location);
        self.regenerate();
        self
    }

    pub fn with_search_area(&mut self, area: Option<SearchArea>) -> &mut Self {
        self.search_area = area;
        self.regenerate();
        self
    }

    pub fn with_strategy(&mut self, strategy: OverflightStrategy) -> &mut Self {
        self.strategy = Some(strategy);
        self.regenerate();
        self
    }

    pub fn with_params(&mut self, params: MissionParams) -> &mut Self {
        self.params = params;
        self.regenerate();
        self
    }

    pub fn starting_location(&self) -> Option<GeoPoint> {
        self.starting_location
    }

    pub fn search_area(&self) -> Option<&SearchArea> {
        self.search_area.as_ref()
    }

    pub fn strategy(&self) -> Option<&OverflightStrategy> {
        self.strategy.as_ref()
    }

    pub fn params(&self) -> &MissionParams {
        &self.params
    }

    /// True when `build` has every input it needs.
    pub fn is_ready(&self) -> bool {
        self.starting_location.is_some()
            && self.strategy.is_some()
            && self.search_area.as_ref().is_some_and(SearchArea::is_complete)
    }

    /// Generate the mission items from the current inputs.
    pub fn build(&self) -> Result<Vec<MissionItem>> {
        let strategy = self.strategy.as_ref().ok_or(PlannerError::MissingStrategy)?;
        let area = self.search_area.as_ref().ok_or(PlannerError::MissingSearchArea)?;
        let start = self
            .starting_location
            .ok_or(PlannerError::MissingStartingLocation)?;
        if !area.is_complete() {
            return Err(PlannerError::MissionAreaIncomplete {
                shape: area.shape().name(),
                vertices: area.vertices().len(),
            });
        }

        let path = strategy.create_flight_path(start, area)?;
        Ok(make_drone_mission(&path, &self.params))
    }

    pub fn on_generated_mission_changed(
        &mut self,
        callback: impl FnMut(&[MissionItem]) + 'static,
    ) -> ListenerId {
        self.generated_mission_changed.add(callback)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.generated_mission_changed.remove(id)
    }

    fn regenerate(&mut self) {
        if self.generated_mission_changed.is_empty() {
            return;
        }
        let items = if self.is_ready() {
            self.build().unwrap_or_else(|err| {
                tracing::debug!("Mission not generated: {}", err);
                Vec::new()
            })
        } else {
            Vec::new()
        };
        self.generated_mission_changed.notify(&items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::search_area::QuadrilateralArea;
    use crate::strategy::SimpleQuadStrategy;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new_unchecked(lat, lon)
    }

    fn square() -> SearchArea {
        SearchArea::Quadrilateral(QuadrilateralArea::new(vec![
            p(47.397026, 8.543067),
            p(47.398979, 8.543434),
            p(47.398279, 8.543934),
            p(47.397426, 8.544867),
        ]))
    }

    fn ready_builder() -> MissionBuilder {
        let mut builder = MissionBuilder::new(MissionParams::default());
        builder
            .with_starting_location(p(47.4, 8.6))
            .with_search_area(Some(square()))
            .with_strategy(SimpleQuadStrategy::new(20.0).unwrap().into());
        builder
    }

    #[test]
    fn build_requires_every_input() {
        let mut builder = MissionBuilder::new(MissionParams::default());
        assert_eq!(builder.build().unwrap_err(), PlannerError::MissingStrategy);

        builder.with_strategy(SimpleQuadStrategy::new(20.0).unwrap().into());
        assert_eq!(builder.build().unwrap_err(), PlannerError::MissingSearchArea);

        builder.with_search_area(Some(square()));
        let err = builder.build().unwrap_err();
        assert_eq!(err, PlannerError::MissingStartingLocation);
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn build_rejects_unfinished_area_as_state_error() {
        let mut builder = ready_builder();
        builder.with_search_area(Some(SearchArea::Quadrilateral(QuadrilateralArea::new(vec![
            p(47.397026, 8.543067),
        ]))));
        assert!(!builder.is_ready());

        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            PlannerError::MissionAreaIncomplete {
                shape: "Quadrilateral",
                vertices: 1
            }
        );
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn build_is_deterministic() {
        let builder = ready_builder();
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn items_carry_params() {
        let mut builder = ready_builder();
        builder.with_params(MissionParams {
            altitude_m: 35.0,
            speed_mps: 4.0,
            camera_photo_interval_s: 2.0,
        });
        for item in builder.build().unwrap() {
            assert_eq!(item.relative_altitude_m, 35.0);
            assert_eq!(item.speed_m_s, 4.0);
            assert!(item.is_fly_through);
            assert_eq!(item.camera_action, CameraAction::None);
            assert_eq!(item.gimbal_pitch_deg, None);
            assert_eq!(item.loiter_time_s, None);
        }
    }

    #[test]
    fn listeners_get_fresh_mission_or_empty() {
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let mut builder = MissionBuilder::new(MissionParams::default());
        let sink = sizes.clone();
        builder.on_generated_mission_changed(move |items| sink.borrow_mut().push(items.len()));

        builder.with_strategy(SimpleQuadStrategy::new(20.0).unwrap().into());
        builder.with_starting_location(p(47.4, 8.6));
        builder.with_search_area(Some(square()));
        builder.with_search_area(None);

        let sizes = sizes.borrow();
        assert_eq!(sizes.len(), 4);
        assert_eq!(&sizes[..2], &[0, 0]);
        assert!(sizes[2] >= 4);
        assert_eq!(sizes[3], 0);
    }

    #[test]
    fn return_mission_targets_location() {
        let home = p(46.5, 6.6);
        let items = return_mission(ReturnTarget::Home(home), &MissionParams::default());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].position(), home);
        assert!(!items[0].is_fly_through);

        let user = p(46.51, 6.61);
        let items = return_mission(ReturnTarget::User(user), &MissionParams::default());
        assert_eq!(items[0].position(), user);
    }

    #[test]
    fn summary_estimates_flight_time() {
        let path = [p(0.0, 0.0), p(0.0, 0.001), p(0.001, 0.001)];
        let items = make_drone_mission(&path, &MissionParams::default());
        let summary = MissionSummary::from_items(&items);
        assert_eq!(summary.waypoints, 3);
        assert!((summary.total_distance_m - 222.4).abs() < 0.5);
        let time = summary.estimated_flight_time_s.unwrap();
        assert!((time - summary.total_distance_m / 10.0).abs() < 1e-9);
    }

    #[test]
    fn items_round_trip_through_json() {
        let items = ready_builder().build().unwrap();
        let json = serde_json::to_string(&items).unwrap();
        let back: Vec<MissionItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(items, back);
    }
}
