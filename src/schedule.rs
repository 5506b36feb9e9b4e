//! Delayed one-shot actions on the simulation clock.
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::droplet::SlotId;

/// Work to run once its due time passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeferredAction {
    /// Start shrinking and fading a landed pool.
    BeginDecay(SlotId),
}

/// Min-heap of actions keyed by due time.
///
/// Actions due at the same instant come out in the order they were
/// scheduled.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    heap: BinaryHeap<Reverse<(OrderedFloat<f64>, u64, DeferredAction)>>,
    sequence: u64,
}

impl DeferredQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `action` to run at simulation time `at`.
    pub fn schedule(&mut self, at: f64, action: DeferredAction) {
        self.heap.push(Reverse((OrderedFloat(at), self.sequence, action)));
        self.sequence += 1;
    }

    /// Removes and returns every action due at or before `now`.
    pub fn drain_due(&mut self, now: f64) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        while let Some(Reverse((at, _, _))) = self.heap.peek() {
            if at.into_inner() > now {
                break;
            }
            if let Some(Reverse((_, _, action))) = self.heap.pop() {
                due.push(action);
            }
        }
        due
    }

    /// Number of pending actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every pending action.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
