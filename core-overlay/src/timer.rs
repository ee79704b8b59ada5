//! # Timer Queue
//!
//! Cancelable deadlines for grace windows and transition ends, drained by the
//! coordinator on every event. Nothing here sleeps; the host (or the async
//! driver's frame tick) decides how often time is observed.
//!
//! Cancellation removes the entry. A timer that still fires after its owner
//! moved on carries a generation or token the owner no longer recognises, so
//! the handler treats it as a no-op.

use crate::transition::TransitionToken;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Identifies a scheduled timer for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// What a timer means when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Optimistic play/pause guess expires.
    PlayGrace { generation: u64 },
    /// "Keep showing playing" window around a skip expires.
    SkipGrace { generation: u64 },
    /// A timed animation reaches its end.
    TransitionEnd(TransitionToken),
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    /// Keyed by `(deadline, id)` so equal deadlines fire in scheduling order.
    entries: BTreeMap<(Duration, TimerId), TimerKind>,
    deadlines: HashMap<TimerId, Duration>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, deadline: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.insert((deadline, id), kind);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.entries.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Remove and return every timer with `deadline <= now`, earliest first.
    pub fn drain_due(&mut self, now: Duration) -> Vec<(TimerId, TimerKind)> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.first_entry() {
            let (deadline, id) = *entry.key();
            if deadline > now {
                break;
            }
            let kind = entry.remove();
            self.deadlines.remove(&id);
            due.push((id, kind));
        }
        due
    }

    /// Earliest pending deadline, for hosts arming a single wakeup.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
