//! Deferred actions on the simulation clock
//!
//! Every time-based behavior (combo expiry, spawn cadence, wave breaks) is
//! an entry in one queue, fired by the tick driver. No host timers touch
//! the core, so a run replays identically from its seed and inputs.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// What to do when an entry fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerAction {
    /// Close the combo window opened by `generation`; stale generations
    /// no-op, which is how extension and cancellation work
    ComboExpiry { generation: u64 },
    /// Spawn the next batch of the current wave
    Spawn,
    /// Begin wave `index` after the post-wave rest
    StartWave { index: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    fire_tick: u64,
    /// Keeps FIFO order among entries due on the same tick
    seq: u64,
    action: TimerAction,
}

/// Min-heap of pending actions keyed by fire tick
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_tick: u64, action: TimerAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            fire_tick,
            seq,
            action,
        }));
    }

    /// Pop every entry due at or before `now`, in (fire_tick, seq) order
    pub fn due(&mut self, now: u64) -> Vec<TimerAction> {
        let mut fired = Vec::new();
        while let Some(&Reverse(entry)) = self.heap.peek() {
            if entry.fire_tick > now {
                break;
            }
            self.heap.pop();
            fired.push(entry.action);
        }
        fired
    }

    /// Drop every pending entry (run teardown)
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_tick_order() {
        let mut q = TimerQueue::new();
        q.schedule(30, TimerAction::Spawn);
        q.schedule(10, TimerAction::StartWave { index: 1 });
        q.schedule(20, TimerAction::ComboExpiry { generation: 0 });

        assert!(q.due(5).is_empty());
        assert_eq!(q.due(20), vec![
            TimerAction::StartWave { index: 1 },
            TimerAction::ComboExpiry { generation: 0 },
        ]);
        assert_eq!(q.due(100), vec![TimerAction::Spawn]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_same_tick_is_fifo() {
        let mut q = TimerQueue::new();
        q.schedule(10, TimerAction::ComboExpiry { generation: 7 });
        q.schedule(10, TimerAction::Spawn);
        q.schedule(10, TimerAction::ComboExpiry { generation: 8 });

        assert_eq!(q.due(10), vec![
            TimerAction::ComboExpiry { generation: 7 },
            TimerAction::Spawn,
            TimerAction::ComboExpiry { generation: 8 },
        ]);
    }

    #[test]
    fn test_clear_cancels_everything() {
        let mut q = TimerQueue::new();
        q.schedule(10, TimerAction::Spawn);
        q.schedule(20, TimerAction::Spawn);
        q.clear();
        assert!(q.due(u64::MAX).is_empty());
    }
}
