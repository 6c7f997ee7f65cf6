use std::{
    cmp::Ordering,
    collections::{HashMap, binary_heap::BinaryHeap},
    fmt,
    time::{Duration, Instant},
};

use crate::{core::tree::Tree, error::Result};

/// A deferred callback, run with the tree it was scheduled on.
pub type TimerCallback = Box<dyn FnOnce(&mut Tree) -> Result<()>>;

/// Identifies a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A scheduled expiry.
#[derive(Debug)]
struct Pending {
    /// Due time.
    at: Instant,
    /// Timer identity, also the tie-breaker for equal due times.
    id: TimerId,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.id == other.id
    }
}

impl Eq for Pending {}

/// Reverse order so the earliest expiry is at the top.
impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reverse order so the earliest expiry is at the top.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other.at.cmp(&self.at).then_with(|| other.id.cmp(&self.id))
    }
}

/// A heap of pending callbacks. Cancellation removes the callback; its heap
/// entry is discarded lazily.
#[derive(Default)]
pub struct Timers {
    /// Pending expiries.
    heap: BinaryHeap<Pending>,
    /// Live callbacks by identity.
    callbacks: HashMap<TimerId, TimerCallback>,
    /// Next identity to hand out.
    next: u64,
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("pending", &self.callbacks.len())
            .finish()
    }
}

impl Timers {
    /// Schedule a callback for an absolute time.
    pub fn schedule(&mut self, at: Instant, cb: TimerCallback) -> TimerId {
        let id = TimerId(self.next);
        self.next += 1;
        self.heap.push(Pending { at, id });
        self.callbacks.insert(id, cb);
        id
    }

    /// Cancel a callback. A no-op for fired or cancelled timers.
    pub fn cancel(&mut self, id: TimerId) {
        self.callbacks.remove(&id);
    }

    /// Number of live callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// True if nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Drop cancelled entries from the top of the heap.
    fn prune(&mut self) {
        while let Some(top) = self.heap.peek() {
            if self.callbacks.contains_key(&top.id) {
                break;
            }
            self.heap.pop();
        }
    }

    /// Wait until the earliest live callback is due. Zero if it is overdue.
    pub fn next_due(&self, now: Instant) -> Option<Duration> {
        self.heap
            .iter()
            .filter(|p| self.callbacks.contains_key(&p.id))
            .map(|p| p.at)
            .min()
            .map(|at| at.saturating_duration_since(now))
    }

    /// Remove and return, in firing order, every live timer due by
    /// `deadline`, with its due time.
    pub fn take_due(&mut self, deadline: Instant) -> Vec<(TimerId, Instant)> {
        let mut due = vec![];
        loop {
            self.prune();
            match self.heap.peek() {
                Some(top) if top.at <= deadline => {
                    due.push((top.id, top.at));
                    self.heap.pop();
                }
                _ => break,
            }
        }
        due
    }

    /// Take the callback for a due timer, unless it was cancelled meanwhile.
    pub fn claim(&mut self, id: TimerId) -> Option<TimerCallback> {
        self.callbacks.remove(&id)
    }

    /// Put a taken but unfired timer back on the heap. Cancelled timers are
    /// dropped.
    pub fn requeue(&mut self, id: TimerId, at: Instant) {
        if self.callbacks.contains_key(&id) {
            self.heap.push(Pending { at, id });
        }
    }
}
