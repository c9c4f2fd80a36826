//! Error types for roomsense-core operations.
//!
//! Configuration mistakes are rejected at construction time and never
//! silently coerced. Expected conditions (a degenerate capture, a replay
//! cursor running past the end, a message for an untracked sensor id) are
//! normal outcomes, not errors, and do not appear here.

use thiserror::Error;

/// All errors that can occur in roomsense-core operations.
#[derive(Debug, Error)]
pub enum SenseError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("sensor id must be non-empty")]
    EmptySensorId,

    #[error("duplicate sensor id: {0}")]
    DuplicateSensorId(String),

    #[error("sensor {id} has non-positive radius {radius}")]
    NonPositiveSensorRadius { id: String, radius: f64 },

    #[error("occupant radius must be positive, got {0}")]
    NonPositiveOccupantRadius(f64),

    #[error("scene must define at least one sensor")]
    NoSensors,

    // ─────────────────────────────────────────────────────────────────────
    // Replay Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("a replay run is active; stop it before changing the selection")]
    ReplayActive,

    #[error("selected record list is empty")]
    EmptyRecordList,

    #[error("no record list at index {0}")]
    UnknownRecordList(usize),
}

/// Convenience type alias for Results using SenseError.
pub type Result<T> = std::result::Result<T, SenseError>;
