//! Timer-driven replay loop.
//!
//! The replay engine is synchronous; this module supplies the fixed cadence.
//! A worker thread advances the engine once per delay and publishes each
//! step over a channel. The inter-step wait doubles as the cancellation
//! point: it is a `recv_timeout` on a stop channel, so stopping (or dropping
//! the runner) wakes the pending delay and the thread exits without stepping
//! again. A scheduled step can therefore never fire after teardown.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::replay::{ReplayEngine, ReplayStep, StepOutcome};

/// Events published by a running replay loop.
#[derive(Debug, Clone)]
pub enum ReplayEvent {
    Step(ReplayStep),
    /// The run played every record and returned to idle.
    Finished,
}

/// Handle to a replay loop running on its own thread.
///
/// The engine is moved into the thread for the duration of the run and
/// handed back by [`ReplayRunner::stop`], so one engine can serve many
/// consecutive runs but never two concurrent ones.
pub struct ReplayRunner {
    stop_tx: Sender<()>,
    handle: JoinHandle<ReplayEngine>,
}

impl ReplayRunner {
    /// Starts the engine and spawns the stepping thread.
    ///
    /// The first record is replayed immediately; subsequent steps are
    /// separated by `delay`. Steps arrive on the returned receiver, ending
    /// with [`ReplayEvent::Finished`] on normal termination.
    pub fn spawn(
        mut engine: ReplayEngine,
        delay: Duration,
    ) -> Result<(Self, Receiver<ReplayEvent>)> {
        engine.start()?;
        let (event_tx, event_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = thread::spawn(move || run_loop(engine, delay, stop_rx, event_tx));
        Ok((Self { stop_tx, handle }, event_rx))
    }

    /// Cancels any pending step, waits for the thread to exit, and returns
    /// the idle engine so a new run can be started.
    pub fn stop(self) -> ReplayEngine {
        let _ = self.stop_tx.send(());
        match self.handle.join() {
            Ok(engine) => engine,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

fn run_loop(
    mut engine: ReplayEngine,
    delay: Duration,
    stop_rx: Receiver<()>,
    event_tx: Sender<ReplayEvent>,
) -> ReplayEngine {
    loop {
        match engine.step() {
            StepOutcome::Step(step) => {
                if event_tx.send(ReplayEvent::Step(step)).is_err() {
                    // Nobody is watching the run any more.
                    debug!("replay loop abandoned, stopping");
                    engine.stop();
                    return engine;
                }
            }
            StepOutcome::Finished => {
                let _ = event_tx.send(ReplayEvent::Finished);
                return engine;
            }
            StepOutcome::Idle => return engine,
        }

        match stop_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                debug!("replay loop cancelled");
                engine.stop();
                return engine;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregatorKind;
    use chrono::Utc;
    use roomsense_model::{Message, Point, Record, RecordList};
    use std::sync::Arc;

    fn engine_with_records(count: usize) -> ReplayEngine {
        let records = (0..count)
            .map(|i| {
                Record::new(
                    Point::new(i as f64, 0.0),
                    vec![Message::new("s0", i % 2 == 0)],
                )
            })
            .collect();
        let list = Arc::new(RecordList::new(records, Utc::now()));
        ReplayEngine::new(list, AggregatorKind::Max, vec!["s0".to_string()], 20.0)
    }

    #[test]
    fn publishes_every_step_then_finished() {
        let engine = engine_with_records(5);
        let (runner, events) =
            ReplayRunner::spawn(engine, Duration::from_millis(1)).expect("spawn should succeed");

        let mut steps = 0;
        let mut finished = false;
        for event in events {
            match event {
                ReplayEvent::Step(step) => {
                    assert_eq!(step.cursor, steps);
                    steps += 1;
                }
                ReplayEvent::Finished => {
                    finished = true;
                    break;
                }
            }
        }
        assert_eq!(steps, 5);
        assert!(finished);

        let engine = runner.stop();
        assert!(!engine.is_running());
    }

    #[test]
    fn stop_cancels_the_pending_step() {
        let engine = engine_with_records(1000);
        let (runner, events) =
            ReplayRunner::spawn(engine, Duration::from_millis(200)).expect("spawn should succeed");

        // The first step is published immediately; cancel during the delay
        // before the second.
        let first = events
            .recv_timeout(Duration::from_secs(5))
            .expect("first event should arrive");
        assert!(matches!(first, ReplayEvent::Step(_)));

        let engine = runner.stop();
        assert!(!engine.is_running());

        // No Finished event was published and at most one extra step could
        // have raced in before the cancellation.
        let leftovers: Vec<ReplayEvent> = events.try_iter().collect();
        assert!(leftovers.len() <= 1);
        assert!(!leftovers
            .iter()
            .any(|event| matches!(event, ReplayEvent::Finished)));
    }

    #[test]
    fn engine_can_be_restarted_after_a_cancelled_run() {
        let engine = engine_with_records(3);
        let (runner, events) =
            ReplayRunner::spawn(engine, Duration::from_millis(50)).expect("spawn should succeed");
        let _ = events.recv_timeout(Duration::from_secs(5));
        let engine = runner.stop();

        let (runner, events) =
            ReplayRunner::spawn(engine, Duration::from_millis(1)).expect("respawn should succeed");
        let step_count = events
            .iter()
            .take_while(|event| matches!(event, ReplayEvent::Step(_)))
            .count();
        assert_eq!(step_count, 3);
        runner.stop();
    }
}
