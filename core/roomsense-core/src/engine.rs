//! Top-level session facade: one scene, its captures, and its replays.

use std::sync::Arc;

use roomsense_model::{Point, RecordList, Room};

use crate::aggregate::AggregatorKind;
use crate::error::{Result, SenseError};
use crate::recorder::Recorder;
use crate::replay::ReplayEngine;
use crate::scene::SceneConfig;
use crate::sensor::Sensor;

/// Owns the validated scene, the live sensor set (through the recorder),
/// and the committed record lists.
///
/// Record lists grow as captures commit and are stored behind `Arc`, so a
/// replay engine keeps its selected list alive without copying it and
/// without being able to mutate it.
pub struct SceneEngine {
    config: SceneConfig,
    recorder: Recorder,
    record_lists: Vec<Arc<RecordList>>,
}

impl SceneEngine {
    /// Validates the configuration and builds the live sensor set.
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        let recorder = Recorder::new(config.build_sensors(), config.capture_radius);
        Ok(Self {
            config,
            recorder,
            record_lists: Vec::new(),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn room(&self) -> Room {
        self.config.room
    }

    /// Read-only sensor layout for the rendering layer.
    pub fn sensors(&self) -> &[Sensor] {
        self.recorder.sensors()
    }

    pub fn begin_capture(&mut self) {
        self.recorder.begin();
    }

    pub fn capture_sample(&mut self, point: Point) {
        self.recorder.sample(point);
    }

    /// Ends the capture. A committed list is stored and its index returned;
    /// a degenerate capture returns `None` and stores nothing.
    pub fn finish_capture(&mut self) -> Option<usize> {
        let list = self.recorder.finish()?;
        self.record_lists.push(Arc::new(list));
        Some(self.record_lists.len() - 1)
    }

    pub fn record_lists(&self) -> &[Arc<RecordList>] {
        &self.record_lists
    }

    /// Builds an idle replay engine over the stored list at `index`.
    pub fn replay(&self, index: usize, kind: AggregatorKind) -> Result<ReplayEngine> {
        let records = self
            .record_lists
            .get(index)
            .cloned()
            .ok_or(SenseError::UnknownRecordList(index))?;
        Ok(ReplayEngine::new(
            records,
            kind,
            self.config.sensor_ids(),
            self.config.replay_radius,
        ))
    }
}
