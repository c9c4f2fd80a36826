//! Scene configuration: the room, the sensor layout, and run parameters.
//!
//! Configuration is accepted at construction time only and validated up
//! front; nothing here changes mid-run and nothing invalid is coerced.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use roomsense_model::Room;

use crate::error::{Result, SenseError};
use crate::sensor::Sensor;

/// Occupant radius used while capturing.
pub const DEFAULT_CAPTURE_RADIUS: f64 = 20.0;
/// Occupant radius used while re-enacting a recorded position.
pub const DEFAULT_REPLAY_RADIUS: f64 = 20.0;
/// Inter-step delay of the replay loop, in milliseconds.
pub const DEFAULT_STEP_DELAY_MS: u64 = 100;
/// Debounce window of the debouncing strategies, in steps.
pub const DEFAULT_DEBOUNCE_DURATION: u32 = 2;

/// One sensor's placement and capture radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSpec {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// A complete description of one simulation scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub room: Room,
    pub sensors: Vec<SensorSpec>,
    #[serde(default = "default_capture_radius")]
    pub capture_radius: f64,
    #[serde(default = "default_replay_radius")]
    pub replay_radius: f64,
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    #[serde(default = "default_debounce_duration")]
    pub debounce_duration: u32,
}

fn default_capture_radius() -> f64 {
    DEFAULT_CAPTURE_RADIUS
}

fn default_replay_radius() -> f64 {
    DEFAULT_REPLAY_RADIUS
}

fn default_step_delay_ms() -> u64 {
    DEFAULT_STEP_DELAY_MS
}

fn default_debounce_duration() -> u32 {
    DEFAULT_DEBOUNCE_DURATION
}

impl SceneConfig {
    /// Rejects configurations the engines cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.sensors.is_empty() {
            return Err(SenseError::NoSensors);
        }
        let mut seen = HashSet::new();
        for spec in &self.sensors {
            if spec.id.trim().is_empty() {
                return Err(SenseError::EmptySensorId);
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(SenseError::DuplicateSensorId(spec.id.clone()));
            }
            if !spec.r.is_finite() || spec.r <= 0.0 {
                return Err(SenseError::NonPositiveSensorRadius {
                    id: spec.id.clone(),
                    radius: spec.r,
                });
            }
        }
        for radius in [self.capture_radius, self.replay_radius] {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(SenseError::NonPositiveOccupantRadius(radius));
            }
        }
        Ok(())
    }

    /// Builds the live sensor set, every sensor starting in the "absent"
    /// state.
    pub fn build_sensors(&self) -> Vec<Sensor> {
        self.sensors
            .iter()
            .map(|spec| Sensor::new(spec.id.clone(), spec.x, spec.y, spec.r))
            .collect()
    }

    /// The identity set handed to cached aggregators.
    pub fn sensor_ids(&self) -> Vec<String> {
        self.sensors.iter().map(|spec| spec.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomsense_model::Point;

    fn base_config() -> SceneConfig {
        SceneConfig {
            room: Room::new(Point::new(0.0, 0.0), Point::new(500.0, 300.0)),
            sensors: vec![
                SensorSpec {
                    id: "s0".to_string(),
                    x: 100.0,
                    y: 150.0,
                    r: 60.0,
                },
                SensorSpec {
                    id: "s1".to_string(),
                    x: 300.0,
                    y: 150.0,
                    r: 60.0,
                },
            ],
            capture_radius: DEFAULT_CAPTURE_RADIUS,
            replay_radius: DEFAULT_REPLAY_RADIUS,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            debounce_duration: DEFAULT_DEBOUNCE_DURATION,
        }
    }

    #[test]
    fn accepts_a_well_formed_scene() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_sensor_ids() {
        let mut config = base_config();
        config.sensors[1].id = "s0".to_string();
        assert!(matches!(
            config.validate(),
            Err(SenseError::DuplicateSensorId(id)) if id == "s0"
        ));
    }

    #[test]
    fn rejects_empty_sensor_ids() {
        let mut config = base_config();
        config.sensors[0].id = "  ".to_string();
        assert!(matches!(config.validate(), Err(SenseError::EmptySensorId)));
    }

    #[test]
    fn rejects_non_positive_sensor_radius() {
        let mut config = base_config();
        config.sensors[0].r = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SenseError::NonPositiveSensorRadius { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_occupant_radius() {
        let mut config = base_config();
        config.capture_radius = -1.0;
        assert!(matches!(
            config.validate(),
            Err(SenseError::NonPositiveOccupantRadius(_))
        ));
    }

    #[test]
    fn rejects_a_scene_without_sensors() {
        let mut config = base_config();
        config.sensors.clear();
        assert!(matches!(config.validate(), Err(SenseError::NoSensors)));
    }
}
