//! # roomsense-core
//!
//! Core library for the roomsense presence simulator: the edge-triggered
//! sensor model, the aggregation strategies that turn sparse change
//! messages into a single presence verdict, and the capture/replay engines.
//!
//! ## Design Principles
//!
//! - **Synchronous state machines**: every engine is advanced by explicit
//!   calls; the only thread in the crate belongs to the replay runner, and
//!   all run state (cursor, caches, debounce counters) stays inside the
//!   engine that owns it.
//! - **Fresh state per run**: aggregators are instantiated per replay run
//!   and never shared between runs.
//! - **Degradation over failure**: degenerate captures, replay overruns and
//!   messages for untracked sensors are normal outcomes, not errors. Only
//!   configuration mistakes are rejected.

// Public modules
pub mod aggregate;
pub mod engine;
pub mod error;
pub mod recorder;
pub mod replay;
pub mod runner;
pub mod scene;
pub mod sensor;

// Re-export commonly used items at crate root
pub use aggregate::{Aggregator, AggregatorKind};
pub use engine::SceneEngine;
pub use error::{Result, SenseError};
pub use recorder::Recorder;
pub use replay::{ReplayEngine, ReplayStep, StepOutcome};
pub use runner::{ReplayEvent, ReplayRunner};
pub use scene::{SceneConfig, SensorSpec};
pub use sensor::Sensor;
