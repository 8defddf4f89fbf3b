//! Blade trail tracking
//!
//! Bounded buffer of recent pointer samples, newest first. Slice detection
//! only ever consumes the latest segment; the rest of the buffer exists so
//! the presentation layer can draw the blade streak.

use glam::Vec2;

use crate::consts::TRAIL_CAPACITY;

/// A single pointer sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Host timestamp in milliseconds
    pub time_ms: f64,
}

/// Bounded pointer-path buffer (newest first)
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: Vec<TrailPoint>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(TRAIL_CAPACITY),
        }
    }

    /// Append a sample, evicting the oldest once the buffer is full.
    ///
    /// Timestamps are stored as given; ordering is positional. The clock
    /// only moves forward between ticks, so no sorting is needed.
    pub fn record(&mut self, pos: Vec2, time_ms: f64) {
        self.points.insert(0, TrailPoint { pos, time_ms });
        if self.points.len() > TRAIL_CAPACITY {
            self.points.pop();
        }
    }

    /// The latest two samples as (older, newer), if at least two exist.
    pub fn latest_segment(&self) -> Option<(Vec2, Vec2)> {
        match self.points.as_slice() {
            [newest, prev, ..] => Some((prev.pos, newest.pos)),
            _ => None,
        }
    }

    /// Drop every sample (stroke ended, or run restarted)
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples newest-first, for rendering the streak
    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }
}
