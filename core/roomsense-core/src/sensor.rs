//! Circular proximity sensors with edge-triggered reporting.

use roomsense_model::BoundingCircle;
use tracing::trace;

/// A static circular detector with an identity.
///
/// A sensor remembers the last state it reported and emits a value only on
/// change. It starts out reporting "absent", so a sensor whose very first
/// probe overlaps the occupant always emits its first message.
#[derive(Debug, Clone)]
pub struct Sensor {
    id: String,
    x: f64,
    y: f64,
    r: f64,
    last_state: bool,
}

impl Sensor {
    pub fn new(id: impl Into<String>, x: f64, y: f64, r: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            r,
            last_state: false,
        }
    }

    /// Identity used as the join key by cached aggregators.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn radius(&self) -> f64 {
        self.r
    }

    /// Whether any part of the occupant reaches the sensor's ring: the
    /// capture radius, inflated by the occupant's own radius, must reach the
    /// occupant's center.
    fn overlaps(&self, occupant: &BoundingCircle) -> bool {
        let dx = self.x - occupant.center.x;
        let dy = self.y - occupant.center.y;
        let reach = self.r + occupant.radius;
        reach * reach >= dx * dx + dy * dy
    }

    /// Probes the sensor against the occupant's current footprint.
    ///
    /// Returns `Some(state)` only when the overlap outcome changed since the
    /// previous probe; `None` means "unchanged since last reported". Callers
    /// must serialize probes: one probe per sensor per sample tick.
    pub fn probe(&mut self, occupant: &BoundingCircle) -> Option<bool> {
        let result = self.overlaps(occupant);
        if self.last_state == result {
            return None;
        }
        self.last_state = result;
        trace!(id = %self.id, state = result, "sensor state change");
        Some(result)
    }
}
