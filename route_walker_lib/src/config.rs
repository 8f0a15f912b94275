use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Length of one step, roughly 1333 steps per km.
pub const STEP_LENGTH_KM: f64 = 0.00075;

/// Speed at which the video plays at normal rate.
pub const REFERENCE_SPEED: f64 = 3.0;

/// Longest frame that is accounted for. Anything longer is a suspended tab.
pub const MAX_FRAME_DELTA_SECS: f64 = 0.25;

pub const MINI_MAP_ZOOM: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub step_length_km: f64,
    pub reference_speed: f64,
    pub max_frame_delta_secs: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step_length_km: STEP_LENGTH_KM,
            reference_speed: REFERENCE_SPEED,
            max_frame_delta_secs: MAX_FRAME_DELTA_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Start muted and unmute once playback is granted. Needed on platforms
    /// that refuse audible autoplay.
    pub start_muted: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { start_muted: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { zoom: MINI_MAP_ZOOM }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub motion: MotionConfig,
    pub playback: PlaybackConfig,
    pub map: MapConfig,
}

impl WalkConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: WalkConfig = serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("motion.step_length_km", self.motion.step_length_km),
            ("motion.reference_speed", self.motion.reference_speed),
            ("motion.max_frame_delta_secs", self.motion.max_frame_delta_secs),
            ("map.zoom", self.map.zoom),
        ];

        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = WalkConfig::from_json("{}").unwrap();
        assert_eq!(config, WalkConfig::default());
        assert_eq!(config.motion.step_length_km, 0.00075);
        assert_eq!(config.motion.reference_speed, 3.0);
        assert!(config.playback.start_muted);
    }

    #[test]
    fn partial_override() {
        let config = WalkConfig::from_json(r#"{"motion": {"reference_speed": 4.5}, "playback": {"start_muted": false}}"#).unwrap();
        assert_eq!(config.motion.reference_speed, 4.5);
        assert_eq!(config.motion.step_length_km, STEP_LENGTH_KM);
        assert!(!config.playback.start_muted);
    }

    #[test]
    fn rejects_zero_calibration() {
        let err = WalkConfig::from_json(r#"{"motion": {"step_length_km": 0.0}}"#).unwrap_err();
        assert_eq!(err, ConfigError::NotPositive { name: "motion.step_length_km", value: 0.0 });
        assert!(matches!(WalkConfig::from_json("not json"), Err(ConfigError::Parse(_))));
    }
}
