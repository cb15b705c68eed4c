//! Feature Extraction Configuration
//!
//! Radius and time windows used by the feature functions.
//! Values are in stadium units and seconds.
//!
//! ## Usage
//!
//! ```rust
//! use xg_core::config::FeatureConfig;
//!
//! let config = FeatureConfig::default();
//! let tight = FeatureConfig::tight();
//! let from_env = FeatureConfig::from_env_or_default();
//! ```
//!
//! ## Environment Variables
//!
//! - `XG_FEATURE_PROFILE`: Select preset (tight, default)

use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Opponents within this distance of the kicker count as pressuring
    pub pressure_radius: f64,
    /// Lead time before contact for the shot-cone frame
    pub cone_time_offset: f64,
    /// Look-back for ball speed
    pub ball_speed_time_offset: f64,
    /// Trailing window for kicker speed
    pub player_speed_window: f64,
    /// Trailing window searched for the contact frame
    pub trajectory_window: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            pressure_radius: 100.0,
            cone_time_offset: 0.1,
            ball_speed_time_offset: 1.0,
            player_speed_window: 1.0,
            trajectory_window: 1.0,
        }
    }
}

impl FeatureConfig {
    /// Small-pitch preset: closer pressure, shorter windows
    pub fn tight() -> Self {
        Self {
            pressure_radius: 60.0,
            cone_time_offset: 0.05,
            ball_speed_time_offset: 0.5,
            player_speed_window: 0.5,
            trajectory_window: 0.5,
        }
    }

    /// Load from environment variable XG_FEATURE_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        match env::var("XG_FEATURE_PROFILE").unwrap_or_default().to_lowercase().as_str() {
            "tight" => Self::tight(),
            _ => Self::default(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| FeatureError::PreconditionViolation(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| FeatureError::PreconditionViolation(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.pressure_radius > 0.0) {
            return Err(FeatureError::PreconditionViolation(format!(
                "pressure_radius must be positive, got {}",
                self.pressure_radius
            )));
        }

        let windows = [
            ("cone_time_offset", self.cone_time_offset),
            ("ball_speed_time_offset", self.ball_speed_time_offset),
            ("player_speed_window", self.player_speed_window),
            ("trajectory_window", self.trajectory_window),
        ];
        for (name, value) in windows {
            if !(value >= 0.0) {
                return Err(FeatureError::PreconditionViolation(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FeatureConfig::default().validate().is_ok());
        assert!(FeatureConfig::tight().validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_override() {
        let config = FeatureConfig::from_yaml_str("pressure_radius: 42.0\n").unwrap();
        assert_eq!(config.pressure_radius, 42.0);
        assert_eq!(config.trajectory_window, 1.0, "unset fields keep defaults");
    }

    #[test]
    fn test_negative_window_rejected() {
        let err = FeatureConfig::from_json_str(r#"{"trajectory_window": -1.0}"#).unwrap_err();
        assert!(matches!(err, FeatureError::PreconditionViolation(_)));
    }
}
