//! Aggregation strategies: sparse sensor messages in, one presence verdict out.
//!
//! Sensors report only on change, so any strategy that needs the current
//! state of sensors that stayed silent must reconstruct it from a cache
//! keyed by sensor id. The uncached variants intentionally reflect only
//! "sensors that just changed", a cheaper but lossier signal suited to
//! momentary burst detection rather than sustained occupancy.

use std::collections::HashMap;

use roomsense_model::Record;

/// Selects and parameterizes an aggregation strategy.
///
/// Cached variants are seeded with the configured sensor ids at
/// instantiation time; `duration` is the debounce window in steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorKind {
    Max,
    Majority,
    Debounce { duration: u32 },
    MaxWithCache,
    MajorityWithCache,
    MaxWithCacheAndDebounce { duration: u32 },
}

impl AggregatorKind {
    /// Display name, as a selection UI would list it.
    pub fn label(&self) -> &'static str {
        match self {
            AggregatorKind::Max => "max",
            AggregatorKind::Majority => "majority",
            AggregatorKind::Debounce { .. } => "debounce",
            AggregatorKind::MaxWithCache => "max-cached",
            AggregatorKind::MajorityWithCache => "majority-cached",
            AggregatorKind::MaxWithCacheAndDebounce { .. } => "debounce-cached",
        }
    }

    /// Builds a fresh aggregator for one run.
    ///
    /// Aggregators carry per-run state (caches, debounce counters) and must
    /// not be reused across runs; every replay start calls this again.
    pub fn instantiate(&self, sensor_ids: &[String]) -> Aggregator {
        match *self {
            AggregatorKind::Max => Aggregator::Max,
            AggregatorKind::Majority => Aggregator::Majority,
            AggregatorKind::Debounce { duration } => {
                Aggregator::Debounce(DebounceState::new(duration))
            }
            AggregatorKind::MaxWithCache => Aggregator::MaxWithCache(SensorCache::new(sensor_ids)),
            AggregatorKind::MajorityWithCache => {
                Aggregator::MajorityWithCache(SensorCache::new(sensor_ids))
            }
            AggregatorKind::MaxWithCacheAndDebounce { duration } => {
                Aggregator::MaxWithCacheAndDebounce {
                    cache: SensorCache::new(sensor_ids),
                    debounce: DebounceState::new(duration),
                }
            }
        }
    }
}

/// Debounce machinery shared by the debouncing variants: a provisional
/// `latest` value is committed to the published verdict only once the tick
/// counter exceeds the window, i.e. every `duration + 1` calls.
#[derive(Debug, Clone)]
pub struct DebounceState {
    duration: u32,
    count: u32,
    latest: bool,
    emitted: bool,
}

impl DebounceState {
    fn new(duration: u32) -> Self {
        Self {
            duration,
            count: 0,
            latest: false,
            emitted: false,
        }
    }

    fn latest(&self) -> bool {
        self.latest
    }

    /// Records the provisional value for this step and returns the verdict
    /// currently committed, which only changes on commit steps.
    fn observe(&mut self, latest: bool) -> bool {
        self.latest = latest;
        self.count += 1;
        if self.count > self.duration {
            self.emitted = self.latest;
            self.count = 0;
        }
        self.emitted
    }
}

/// Last known state per tracked sensor id, seeded "absent" for every
/// configured id.
///
/// Messages for ids outside the tracked set are ignored rather than
/// rejected, so sensor-set drift between capture and replay does not fail
/// the run; a removed sensor simply stops receiving updates.
#[derive(Debug, Clone)]
pub struct SensorCache {
    states: HashMap<String, bool>,
}

impl SensorCache {
    fn new(sensor_ids: &[String]) -> Self {
        Self {
            states: sensor_ids.iter().map(|id| (id.clone(), false)).collect(),
        }
    }

    fn apply(&mut self, record: &Record) {
        for message in &record.messages {
            if let Some(state) = self.states.get_mut(&message.id) {
                *state = message.body;
            }
        }
    }

    fn any_present(&self) -> bool {
        self.states.values().any(|&present| present)
    }

    fn present_count(&self) -> usize {
        self.states.values().filter(|&&present| present).count()
    }

    fn tracked(&self) -> usize {
        self.states.len()
    }
}

/// A stateful aggregation strategy: one record in, one boolean verdict out.
///
/// Records must be fed in temporal order. An instance is exclusively owned
/// by one run; build a fresh one per run via [`AggregatorKind::instantiate`].
#[derive(Debug, Clone)]
pub enum Aggregator {
    Max,
    Majority,
    Debounce(DebounceState),
    MaxWithCache(SensorCache),
    MajorityWithCache(SensorCache),
    MaxWithCacheAndDebounce {
        cache: SensorCache,
        debounce: DebounceState,
    },
}

impl Aggregator {
    /// Consumes one record and returns the presence verdict.
    pub fn probe(&mut self, record: &Record) -> bool {
        match self {
            Aggregator::Max => record.messages.iter().any(|message| message.body),
            Aggregator::Majority => {
                let count = record.messages.iter().filter(|message| message.body).count();
                count > 0 && count >= ceil_half(record.messages.len())
            }
            Aggregator::Debounce(state) => {
                // Ordered fold: the last message in the record wins on ties.
                let mut latest = state.latest();
                for message in &record.messages {
                    latest = message.body;
                }
                state.observe(latest)
            }
            Aggregator::MaxWithCache(cache) => {
                cache.apply(record);
                cache.any_present()
            }
            Aggregator::MajorityWithCache(cache) => {
                cache.apply(record);
                cache.present_count() >= ceil_half(cache.tracked())
            }
            Aggregator::MaxWithCacheAndDebounce { cache, debounce } => {
                cache.apply(record);
                debounce.observe(cache.any_present())
            }
        }
    }
}

fn ceil_half(n: usize) -> usize {
    n.div_ceil(2)
}
