//! Shared data model for the roomsense simulator.
//!
//! This crate is shared by the capture engine and the replay engine to
//! prevent schema drift: both sides operate on the same `Record` and
//! `Message` shapes. It contains plain data only; sensor geometry and
//! aggregation logic live in `roomsense-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A position in room-canvas space.
///
/// Coordinates are expected to be finite and already translated into canvas
/// space by the input layer; this crate does no pixel-offset handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The occupant's instantaneous footprint: a circle around its position.
///
/// The radius approximates the occupant's body size and is fixed for the
/// lifetime of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingCircle {
    pub center: Point,
    pub radius: f64,
}

impl BoundingCircle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// The rectangular room, in canvas coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Room {
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Whether a point lies strictly inside the room.
    pub fn contains(&self, point: &Point) -> bool {
        self.top_left.x < point.x
            && point.x < self.bottom_right.x
            && self.top_left.y < point.y
            && point.y < self.bottom_right.y
    }
}

/// One sensor's state-change notification.
///
/// A message exists in a record only when that sensor's presence state
/// differed from its previous probe. Absence of a message for a sensor id
/// means "unchanged since last reported".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub body: bool,
}

impl Message {
    pub fn new(id: impl Into<String>, body: bool) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

/// One sample: the occupant's position at sample time plus zero or more
/// edge-triggered sensor messages observed at that instant.
///
/// Messages within one record carry no order guarantee relative to each
/// other beyond the probe order the capture engine used; each sensor reports
/// at most once per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub point: Point,
    pub messages: Vec<Message>,
}

impl Record {
    pub fn new(point: Point, messages: Vec<Message>) -> Self {
        Self { point, messages }
    }
}

/// An ordered capture of records. Insertion order is temporal order.
///
/// Record lists are immutable once committed by the capture engine, which is
/// also where the "at least two samples" rule lives. The replay engine only
/// ever holds a read-only view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordList {
    captured_at: DateTime<Utc>,
    records: Vec<Record>,
}

impl RecordList {
    pub fn new(records: Vec<Record>, captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            records,
        }
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_contains_interior_point() {
        let room = Room::new(Point::new(0.0, 0.0), Point::new(500.0, 300.0));
        assert!(room.contains(&Point::new(250.0, 150.0)));
    }

    #[test]
    fn room_excludes_points_outside_and_on_the_border() {
        let room = Room::new(Point::new(0.0, 0.0), Point::new(500.0, 300.0));
        assert!(!room.contains(&Point::new(-10.0, 150.0)));
        assert!(!room.contains(&Point::new(250.0, 300.0)));
        assert!(!room.contains(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn record_list_indexing_past_the_end_returns_none() {
        let records = vec![
            Record::new(Point::new(1.0, 1.0), vec![]),
            Record::new(Point::new(2.0, 2.0), vec![Message::new("s0", true)]),
        ];
        let list = RecordList::new(records, Utc::now());
        assert_eq!(list.len(), 2);
        assert!(list.get(1).is_some());
        assert!(list.get(2).is_none());
    }
}
