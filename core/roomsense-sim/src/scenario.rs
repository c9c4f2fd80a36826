//! Scenario files: a scene plus a scripted occupant path.
//!
//! The scripted path stands in for the out-of-scope pointer capture. Its
//! waypoints are interpolated into evenly spaced samples, which the capture
//! engine probes exactly as it would probe live cursor positions.

use std::path::Path;

use fs_err as fs;
use serde::Deserialize;

use roomsense_core::scene::SceneConfig;
use roomsense_model::Point;

/// Distance between interpolated samples, in canvas units.
const DEFAULT_SAMPLE_SPACING: f64 = 8.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub scene: SceneConfig,
    /// Occupant waypoints, walked in order.
    pub path: Vec<Point>,
    #[serde(default = "default_sample_spacing")]
    pub sample_spacing: f64,
}

fn default_sample_spacing() -> f64 {
    DEFAULT_SAMPLE_SPACING
}

impl Scenario {
    fn validate(&self) -> Result<(), String> {
        if self.path.len() < 2 {
            return Err("scenario path needs at least two waypoints".to_string());
        }
        if !self.sample_spacing.is_finite() || self.sample_spacing <= 0.0 {
            return Err(format!(
                "sample_spacing must be positive, got {}",
                self.sample_spacing
            ));
        }
        Ok(())
    }

    /// The interpolated sample positions the capture engine will see.
    pub fn samples(&self) -> Vec<Point> {
        sample_path(&self.path, self.sample_spacing)
    }
}

/// Loads and validates a scenario from a TOML file. Scene-level validation
/// (sensor ids, radii) happens later, when the engine is constructed.
pub fn load(path: &Path) -> Result<Scenario, String> {
    let content = fs::read_to_string(path)
        .map_err(|err| format!("failed to read scenario {}: {}", path.display(), err))?;
    let scenario: Scenario = toml::from_str(&content)
        .map_err(|err| format!("failed to parse scenario {}: {}", path.display(), err))?;
    scenario.validate()?;
    Ok(scenario)
}

/// A built-in demo: three sensors across the room and a straight walk
/// through all of them and back out.
pub fn demo() -> Scenario {
    use roomsense_core::scene::SensorSpec;
    use roomsense_model::Room;

    let sensor = |id: &str, x: f64| SensorSpec {
        id: id.to_string(),
        x,
        y: 150.0,
        r: 60.0,
    };
    Scenario {
        scene: SceneConfig {
            room: Room::new(Point::new(0.0, 0.0), Point::new(500.0, 300.0)),
            sensors: vec![sensor("s0", 100.0), sensor("s1", 250.0), sensor("s2", 400.0)],
            capture_radius: roomsense_core::scene::DEFAULT_CAPTURE_RADIUS,
            replay_radius: roomsense_core::scene::DEFAULT_REPLAY_RADIUS,
            step_delay_ms: roomsense_core::scene::DEFAULT_STEP_DELAY_MS,
            debounce_duration: roomsense_core::scene::DEFAULT_DEBOUNCE_DURATION,
        },
        path: vec![Point::new(10.0, 150.0), Point::new(490.0, 150.0)],
        sample_spacing: DEFAULT_SAMPLE_SPACING,
    }
}

/// Expands waypoints into samples no further apart than `spacing`.
///
/// Every waypoint itself is sampled; segment interiors are filled with
/// evenly spaced intermediate positions.
pub fn sample_path(waypoints: &[Point], spacing: f64) -> Vec<Point> {
    let mut samples = Vec::new();
    let mut iter = waypoints.iter();
    let Some(first) = iter.next() else {
        return samples;
    };
    samples.push(*first);

    let mut prev = *first;
    for next in iter {
        let dx = next.x - prev.x;
        let dy = next.y - prev.y;
        let distance = (dx * dx + dy * dy).sqrt();
        let steps = ((distance / spacing).ceil() as usize).max(1);
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            samples.push(Point::new(prev.x + dx * t, prev.y + dy * t));
        }
        prev = *next;
    }
    samples
}
