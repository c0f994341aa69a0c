//! One mission-planning session: the area being drawn, the chosen
//! strategy, and the mission generated from them.

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::geo::GeoPoint;
use crate::listeners::ListenerId;
use crate::mission::{return_mission, MissionBuilder, MissionItem, ReturnTarget};
use crate::search_area::{SearchArea, SearchAreaBuilder};
use crate::strategy::{OverflightStrategy, StrategyKind};

/// Owns the area builder and the mission builder and keeps them in sync.
///
/// Both builders are only reachable read-only; every edit goes through the
/// session so the mission always sees the current area.
#[derive(Debug)]
pub struct PlanningSession {
    config: PlannerConfig,
    strategy_kind: StrategyKind,
    area: SearchAreaBuilder,
    mission: MissionBuilder,
}

impl PlanningSession {
    /// Start a session with the zigzag strategy.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        Self::with_strategy(config, StrategyKind::default())
    }

    pub fn with_strategy(config: PlannerConfig, kind: StrategyKind) -> Result<Self> {
        config.validate()?;
        let strategy = kind.instantiate(config.ground_sensor_scope_m)?;
        let mut mission = MissionBuilder::new(config.mission_params());
        let area = SearchAreaBuilder::new(strategy.area_shape());
        mission.with_strategy(strategy);
        Ok(Self {
            config,
            strategy_kind: kind,
            area,
            mission,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy_kind
    }

    pub fn strategy(&self) -> Option<&OverflightStrategy> {
        self.mission.strategy()
    }

    pub fn area(&self) -> &SearchAreaBuilder {
        &self.area
    }

    pub fn mission(&self) -> &MissionBuilder {
        &self.mission
    }

    /// Subscribe to vertex edits of the current area. Dropped on strategy switch.
    pub fn on_vertices_changed(&mut self, callback: impl FnMut(&[GeoPoint]) + 'static) -> ListenerId {
        self.area.on_vertices_changed(callback)
    }

    /// Subscribe to the current area snapshot. Dropped on strategy switch.
    pub fn on_search_area_changed(
        &mut self,
        callback: impl FnMut(&Option<SearchArea>) + 'static,
    ) -> ListenerId {
        self.area.on_search_area_changed(callback)
    }

    /// Subscribe to regenerated missions. Survives strategy switches.
    pub fn on_generated_mission_changed(
        &mut self,
        callback: impl FnMut(&[MissionItem]) + 'static,
    ) -> ListenerId {
        self.mission.on_generated_mission_changed(callback)
    }

    /// Remove a listener registered through any of the session hooks.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.area.remove_listener(id) || self.mission.remove_listener(id)
    }

    /// Switch strategy. The current area and its listeners are discarded
    /// and a fresh area of the strategy's shape is started.
    pub fn set_strategy(&mut self, kind: StrategyKind) -> Result<()> {
        let strategy = kind.instantiate(self.config.ground_sensor_scope_m)?;
        self.area.clear_listeners();
        self.area = SearchAreaBuilder::new(strategy.area_shape());
        self.strategy_kind = kind;
        self.mission.with_search_area(None).with_strategy(strategy);
        tracing::info!("Strategy switched to {}", kind);
        Ok(())
    }

    pub fn add_vertex(&mut self, vertex: GeoPoint) -> Result<()> {
        self.area.add_vertex(vertex)?;
        self.sync_area();
        Ok(())
    }

    pub fn move_vertex(&mut self, old: GeoPoint, new: GeoPoint) -> Result<()> {
        self.area.move_vertex(old, new)?;
        self.sync_area();
        Ok(())
    }

    pub fn reset_area(&mut self) {
        self.area.reset();
        self.sync_area();
    }

    /// Feed a new drone position from telemetry.
    pub fn update_drone_position(&mut self, position: GeoPoint) {
        self.mission.with_starting_location(position);
    }

    pub fn is_ready(&self) -> bool {
        self.mission.is_ready()
    }

    pub fn build_mission(&self) -> Result<Vec<MissionItem>> {
        self.mission.build()
    }

    pub fn return_home(&self, home: GeoPoint) -> Vec<MissionItem> {
        return_mission(ReturnTarget::Home(home), self.mission.params())
    }

    pub fn return_to_user(&self, user: GeoPoint) -> Vec<MissionItem> {
        return_mission(ReturnTarget::User(user), self.mission.params())
    }

    fn sync_area(&mut self) {
        let area = self.area.current_area();
        self.mission.with_search_area(area);
    }
}
