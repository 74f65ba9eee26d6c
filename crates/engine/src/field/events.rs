//! Deferred field mutations.
//!
//! Scripts schedule events with a due tick; the field's tick drains every due
//! event in (due tick, scheduling order) order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// `scale` of 0 leaves the mesh scale unchanged.
    UpdateMesh {
        trigger_id: i32,
        visible: bool,
        fade: i32,
        scale: f32,
    },
}

#[derive(Debug)]
struct ScheduledEvent {
    due_tick: i64,
    seq: u64,
    event: FieldEvent,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.due_tick == other.due_tick && self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_tick, self.seq).cmp(&(other.due_tick, other.seq))
    }
}

#[derive(Default)]
pub struct EventQueue {
    heap: Mutex<BinaryHeap<Reverse<ScheduledEvent>>>,
    seq: AtomicU64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn heap(&self) -> std::sync::MutexGuard<'_, BinaryHeap<Reverse<ScheduledEvent>>> {
        self.heap.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn schedule(&self, due_tick: i64, event: FieldEvent) {
        let seq = self.seq.fetch_add(1, AtomicOrdering::Relaxed);
        self.heap().push(Reverse(ScheduledEvent {
            due_tick,
            seq,
            event,
        }));
    }

    /// Remove and return every event due at or before `now_tick`.
    pub fn drain_due(&self, now_tick: i64) -> Vec<FieldEvent> {
        let mut heap = self.heap();
        let mut due = Vec::new();
        while heap
            .peek()
            .is_some_and(|Reverse(next)| next.due_tick <= now_tick)
        {
            if let Some(Reverse(next)) = heap.pop() {
                due.push(next.event);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap().is_empty()
    }

    pub fn clear(&self) {
        self.heap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(trigger_id: i32) -> FieldEvent {
        FieldEvent::UpdateMesh {
            trigger_id,
            visible: true,
            fade: 0,
            scale: 0.0,
        }
    }

    #[test]
    fn drains_only_due_events_in_order() {
        let queue = EventQueue::new();
        queue.schedule(300, mesh(3));
        queue.schedule(100, mesh(1));
        queue.schedule(100, mesh(2));

        assert_eq!(queue.drain_due(99), vec![]);
        assert_eq!(queue.drain_due(200), vec![mesh(1), mesh(2)]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain_due(300), vec![mesh(3)]);
        assert!(queue.is_empty());
    }
}
