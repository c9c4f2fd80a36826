//! Replay engine: steps a captured record list through an aggregator.
//!
//! Replay never re-probes live sensors; it only replays the messages the
//! capture engine recorded. Sensor geometry matters here only as read-only
//! layout for whoever renders the run.

use std::sync::Arc;

use roomsense_model::{BoundingCircle, Record, RecordList};
use tracing::debug;

use crate::aggregate::{Aggregator, AggregatorKind};
use crate::error::{Result, SenseError};

/// One published replay step: everything a display layer needs.
#[derive(Debug, Clone)]
pub struct ReplayStep {
    /// Index of the record this step replayed.
    pub cursor: usize,
    /// The aggregator's presence verdict for this record.
    pub verdict: bool,
    pub record: Record,
    /// The occupant footprint re-enacted from the record's stored point.
    pub occupant: BoundingCircle,
}

/// Outcome of advancing the replay by one step.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// No run is active.
    Idle,
    /// One record was fed through the aggregator.
    Step(ReplayStep),
    /// The cursor ran past the end of the record list. This is the normal
    /// termination, not an error; the engine is idle again.
    Finished,
}

#[derive(Debug)]
enum ReplayState {
    Idle,
    Running { cursor: usize, aggregator: Aggregator },
}

/// Replay state machine: `Idle → Running → Idle`, restartable.
///
/// A running replay owns an exclusive, freshly instantiated aggregator, so
/// restarting a completed run reproduces the identical verdict sequence.
/// Switching the record list or the strategy is only permitted while idle.
#[derive(Debug)]
pub struct ReplayEngine {
    records: Arc<RecordList>,
    kind: AggregatorKind,
    sensor_ids: Vec<String>,
    occupant_radius: f64,
    state: ReplayState,
}

impl ReplayEngine {
    pub fn new(
        records: Arc<RecordList>,
        kind: AggregatorKind,
        sensor_ids: Vec<String>,
        occupant_radius: f64,
    ) -> Self {
        Self {
            records,
            kind,
            sensor_ids,
            occupant_radius,
            state: ReplayState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ReplayState::Running { .. })
    }

    /// Selects a different record list. Rejected while a run is active.
    pub fn select_records(&mut self, records: Arc<RecordList>) -> Result<()> {
        if self.is_running() {
            return Err(SenseError::ReplayActive);
        }
        self.records = records;
        Ok(())
    }

    /// Selects a different aggregation strategy. Rejected while a run is
    /// active.
    pub fn select_kind(&mut self, kind: AggregatorKind) -> Result<()> {
        if self.is_running() {
            return Err(SenseError::ReplayActive);
        }
        self.kind = kind;
        Ok(())
    }

    /// Starts a run from the first record with a fresh aggregator.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(SenseError::ReplayActive);
        }
        if self.records.is_empty() {
            return Err(SenseError::EmptyRecordList);
        }
        self.state = ReplayState::Running {
            cursor: 0,
            aggregator: self.kind.instantiate(&self.sensor_ids),
        };
        debug!(
            strategy = self.kind.label(),
            records = self.records.len(),
            "replay started"
        );
        Ok(())
    }

    /// Forces the engine back to idle, abandoning any active run.
    pub fn stop(&mut self) {
        self.state = ReplayState::Idle;
    }

    /// Advances the replay by one step.
    pub fn step(&mut self) -> StepOutcome {
        let taken = std::mem::replace(&mut self.state, ReplayState::Idle);
        let ReplayState::Running {
            cursor,
            mut aggregator,
        } = taken
        else {
            return StepOutcome::Idle;
        };

        let Some(record) = self.records.get(cursor).cloned() else {
            debug!(steps = cursor, "replay finished");
            return StepOutcome::Finished;
        };

        let verdict = aggregator.probe(&record);
        let occupant = BoundingCircle::new(record.point, self.occupant_radius);
        self.state = ReplayState::Running {
            cursor: cursor + 1,
            aggregator,
        };
        StepOutcome::Step(ReplayStep {
            cursor,
            verdict,
            record,
            occupant,
        })
    }
}
