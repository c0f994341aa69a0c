//! JSON report printed by `plan_mission`.

use chrono::{DateTime, Utc};
use sar_core::{MissionItem, MissionSummary, StrategyKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionReport {
    pub generated_at: DateTime<Utc>,
    pub strategy: StrategyKind,
    pub summary: MissionSummary,
    pub items: Vec<MissionItem>,
}

impl MissionReport {
    pub fn new(strategy: StrategyKind, items: Vec<MissionItem>) -> Self {
        Self {
            generated_at: Utc::now(),
            strategy,
            summary: MissionSummary::from_items(&items),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sar_core::{make_drone_mission, GeoPoint, MissionParams};

    #[test]
    fn report_serializes_strategy_lowercase() {
        let path = [GeoPoint::new_unchecked(0.0, 0.0), GeoPoint::new_unchecked(0.0, 0.001)];
        let report = MissionReport::new(
            StrategyKind::Spiral,
            make_drone_mission(&path, &MissionParams::default()),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"], "spiral");
        assert_eq!(json["summary"]["waypoints"], 2);
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
    }
}
