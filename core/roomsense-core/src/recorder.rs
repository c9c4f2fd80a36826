//! Capture engine: builds record lists from live position samples.

use chrono::Utc;
use roomsense_model::{BoundingCircle, Message, Point, Record, RecordList};
use tracing::debug;

use crate::sensor::Sensor;

/// Captures shorter than this are degenerate (a click without a drag) and
/// are discarded silently.
const MIN_COMMIT_SAMPLES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecorderState {
    Idle,
    Recording,
}

/// Capture state machine: `Idle → Recording → Idle`.
///
/// While recording, every position sample probes all sensors against the
/// occupant's footprint at that position and appends one record with the
/// non-absent results. The sampling cadence is the caller's; the recorder
/// never suspends on its own.
#[derive(Debug)]
pub struct Recorder {
    sensors: Vec<Sensor>,
    occupant_radius: f64,
    state: RecorderState,
    seq: Vec<Record>,
}

impl Recorder {
    pub fn new(sensors: Vec<Sensor>, occupant_radius: f64) -> Self {
        Self {
            sensors,
            occupant_radius,
            state: RecorderState::Idle,
            seq: Vec::new(),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Read-only view of the sensor layout, for the rendering layer.
    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    /// Starts a capture, dropping any in-progress sequence.
    pub fn begin(&mut self) {
        self.seq.clear();
        self.state = RecorderState::Recording;
    }

    /// Records one position sample. Ignored while idle.
    pub fn sample(&mut self, point: Point) {
        if self.state != RecorderState::Recording {
            return;
        }
        let occupant = BoundingCircle::new(point, self.occupant_radius);
        let messages: Vec<Message> = self
            .sensors
            .iter_mut()
            .filter_map(|sensor| {
                sensor
                    .probe(&occupant)
                    .map(|state| Message::new(sensor.id(), state))
            })
            .collect();
        self.seq.push(Record::new(point, messages));
    }

    /// Ends the capture and returns to idle.
    ///
    /// Sequences of at least two samples are committed; shorter ones are
    /// discarded without error.
    pub fn finish(&mut self) -> Option<RecordList> {
        self.state = RecorderState::Idle;
        let seq = std::mem::take(&mut self.seq);
        if seq.len() < MIN_COMMIT_SAMPLES {
            debug!(samples = seq.len(), "discarding degenerate capture");
            return None;
        }
        debug!(samples = seq.len(), "committing capture");
        Some(RecordList::new(seq, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> Recorder {
        // One sensor at the origin; with the occupant radius of 20 its
        // reach extends to distance 30.
        Recorder::new(vec![Sensor::new("s0", 0.0, 0.0, 10.0)], 20.0)
    }

    #[test]
    fn single_sample_capture_is_discarded() {
        let mut recorder = recorder();
        recorder.begin();
        recorder.sample(Point::new(5.0, 5.0));
        assert!(recorder.finish().is_none());
        assert!(!recorder.is_recording());
    }

    #[test]
    fn two_samples_commit_one_record_list() {
        let mut recorder = recorder();
        recorder.begin();
        recorder.sample(Point::new(200.0, 200.0));
        recorder.sample(Point::new(5.0, 5.0));
        let list = recorder.finish().expect("capture should commit");
        assert_eq!(list.len(), 2);
        assert!(!recorder.is_recording());
    }

    #[test]
    fn messages_appear_only_on_state_changes() {
        let mut recorder = recorder();
        recorder.begin();
        recorder.sample(Point::new(200.0, 200.0)); // absent, unchanged
        recorder.sample(Point::new(5.0, 5.0)); // enters reach
        recorder.sample(Point::new(8.0, 2.0)); // still inside, silent
        recorder.sample(Point::new(300.0, 300.0)); // leaves reach
        let list = recorder.finish().expect("capture should commit");

        let message_counts: Vec<usize> =
            list.iter().map(|record| record.messages.len()).collect();
        assert_eq!(message_counts, vec![0, 1, 0, 1]);
        assert!(list.get(1).expect("record").messages[0].body);
        assert!(!list.get(3).expect("record").messages[0].body);
    }

    #[test]
    fn samples_while_idle_are_ignored() {
        let mut recorder = recorder();
        recorder.sample(Point::new(5.0, 5.0));
        recorder.begin();
        recorder.sample(Point::new(200.0, 200.0));
        recorder.sample(Point::new(210.0, 200.0));
        let list = recorder.finish().expect("capture should commit");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn begin_resets_an_in_progress_sequence() {
        let mut recorder = recorder();
        recorder.begin();
        recorder.sample(Point::new(200.0, 200.0));
        recorder.sample(Point::new(210.0, 200.0));
        recorder.begin();
        recorder.sample(Point::new(220.0, 200.0));
        assert!(recorder.finish().is_none());
    }
}
