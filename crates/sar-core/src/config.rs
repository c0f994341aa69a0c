//! Planner configuration: defaults, environment overrides, JSON files.

use crate::error::{PlannerError, Result};
use crate::mission::{MissionParams, DEFAULT_ALTITUDE_M, DEFAULT_PHOTO_INTERVAL_S, DEFAULT_SPEED_MPS};
use serde::{Deserialize, Serialize};
use std::env;

/// Width of ground covered by the drone's sensor, in meters.
pub const GROUND_SENSOR_SCOPE_M: f64 = 15.0;

/// Configuration consumed by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Mission altitude above takeoff in meters
    pub altitude_m: f32,
    /// Commanded speed in meters per second
    pub speed_mps: f32,
    /// Maximum distance between two sweep passes
    pub ground_sensor_scope_m: f64,
    /// Interval between photos when a photo-interval action is used
    pub photo_interval_s: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            altitude_m: DEFAULT_ALTITUDE_M,
            speed_mps: DEFAULT_SPEED_MPS,
            ground_sensor_scope_m: GROUND_SENSOR_SCOPE_M,
            photo_interval_s: DEFAULT_PHOTO_INTERVAL_S,
        }
    }
}

impl PlannerConfig {
    /// Defaults overridden by `SAR_*` environment variables.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            altitude_m: env_or("SAR_ALTITUDE_M", defaults.altitude_m),
            speed_mps: env_or("SAR_SPEED_MPS", defaults.speed_mps),
            ground_sensor_scope_m: env_or("SAR_SENSOR_SCOPE_M", defaults.ground_sensor_scope_m),
            photo_interval_s: env_or("SAR_PHOTO_INTERVAL_S", defaults.photo_interval_s),
        }
    }

    /// Parse a JSON document; missing fields take their default.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config = Self::default().with_json_overrides(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay the fields present in a JSON object onto `self`.
    ///
    /// Fields missing from the document keep their current value. The
    /// result is not validated, so later layers can still fix it up.
    pub fn with_json_overrides(self, json: &str) -> Result<Self> {
        let invalid = |e: serde_json::Error| PlannerError::InvalidConfig(e.to_string());
        let overrides: serde_json::Value = serde_json::from_str(json).map_err(invalid)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(PlannerError::InvalidConfig(
                "config must be a JSON object".to_string(),
            ));
        };

        let mut merged = serde_json::to_value(&self).map_err(invalid)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }
        serde_json::from_value(merged).map_err(invalid)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.altitude_m.is_finite() && self.altitude_m > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "altitude must be positive, got {}",
                self.altitude_m
            )));
        }
        if !(self.speed_mps.is_finite() && self.speed_mps > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "speed must be positive, got {}",
                self.speed_mps
            )));
        }
        if !(self.ground_sensor_scope_m.is_finite() && self.ground_sensor_scope_m > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "ground sensor scope must be positive, got {}",
                self.ground_sensor_scope_m
            )));
        }
        if !(self.photo_interval_s.is_finite() && self.photo_interval_s >= 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "photo interval must not be negative, got {}",
                self.photo_interval_s
            )));
        }
        Ok(())
    }

    pub fn mission_params(&self) -> MissionParams {
        MissionParams {
            altitude_m: self.altitude_m,
            speed_mps: self.speed_mps,
            camera_photo_interval_s: self.photo_interval_s,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
