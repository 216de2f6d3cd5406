//! Play scheduler
//!
//! Every wait inside a play (phase delays, pocket countdown, blitz arrival,
//! flight duration, settle delay) is a pending timer here instead of a
//! blocking call or a host-side callback.
//!
//! ## Ordering
//! - Timers fire in due-time order.
//! - Timers sharing a due time fire in scheduling order (`id`).
//!
//! ## Cancellation
//! The scheduler belongs to exactly one `PlaySession`. Dropping or cancelling
//! the session clears it, so no timer can outlive the play that created it.

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// SNAP → DROPBACK
    SnapToDropback,
    /// DROPBACK → READ
    DropbackToRead,
    /// Pass rush got home
    PocketExpired,
    /// Blitzer reached the quarterback
    BlitzArrival,
    /// THROW → BALL_FLIGHT
    ThrowRelease,
    /// Ball reached its target with nobody attempting a catch
    FlightArrival,
    /// RESULT → next play
    Settle,
}

/// A pending transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    /// Session time (s)
    pub due: f32,
    pub kind: TimerKind,
    pub id: u64,
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earlier due time first, then scheduling order
        self.due.total_cmp(&other.due).then(self.id.cmp(&other.id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: f32,
    next_id: u64,
    pending: BinaryHeap<Reverse<Timer>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session time (s).
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Schedule `kind` at absolute session time `due`. Returns the timer id.
    pub fn schedule_at(&mut self, due: f32, kind: TimerKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let due = if due.is_finite() { due.max(self.now) } else { self.now };
        log::trace!("[SCHED] #{} {:?} due at {:.3}s", id, kind, due);
        self.pending.push(Reverse(Timer { due, kind, id }));
        id
    }

    /// Schedule `kind` `delay` seconds from now.
    pub fn schedule_in(&mut self, delay: f32, kind: TimerKind) -> u64 {
        self.schedule_at(self.now + delay.max(0.0), kind)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|Reverse(t)| t.kind == kind)
    }

    /// Next timer to fire (not removed).
    pub fn peek_next(&self) -> Option<&Timer> {
        self.pending.peek().map(|Reverse(t)| t)
    }

    /// Cancel every pending timer of `kind`; returns how many were removed.
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.pending.len();
        self.pending.retain(|Reverse(t)| t.kind != kind);
        before - self.pending.len()
    }

    /// Cancel one timer by id.
    pub fn cancel(&mut self, id: u64) -> Option<Timer> {
        let found = self.pending.iter().find(|Reverse(t)| t.id == id).map(|Reverse(t)| *t);
        if found.is_some() {
            self.pending.retain(|Reverse(t)| t.id != id);
        }
        found
    }

    /// Drop everything still pending.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Pop the earliest timer due at or before `until` and move the clock to
    /// its due time. Call repeatedly to drain a tick in order.
    pub fn pop_due(&mut self, until: f32) -> Option<Timer> {
        match self.pending.peek() {
            Some(Reverse(next)) if next.due <= until => {}
            _ => return None,
        }
        let Reverse(timer) = self.pending.pop()?;
        self.now = self.now.max(timer.due);
        Some(timer)
    }

    /// Move the clock forward. Time never runs backwards.
    pub fn advance_to(&mut self, t: f32) {
        if t.is_finite() {
            self.now = self.now.max(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule_at(0.9, TimerKind::DropbackToRead);
        s.schedule_at(0.3, TimerKind::SnapToDropback);
        s.schedule_at(4.5, TimerKind::PocketExpired);

        let mut fired = Vec::new();
        while let Some(t) = s.pop_due(1.0) {
            fired.push((t.kind, s.now()));
        }
        assert_eq!(
            fired,
            vec![(TimerKind::SnapToDropback, 0.3), (TimerKind::DropbackToRead, 0.9)]
        );
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn test_ties_keep_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule_at(2.0, TimerKind::BlitzArrival);
        s.schedule_at(2.0, TimerKind::PocketExpired);
        assert_eq!(s.pop_due(2.0).map(|t| t.kind), Some(TimerKind::BlitzArrival));
        assert_eq!(s.pop_due(2.0).map(|t| t.kind), Some(TimerKind::PocketExpired));
    }

    #[test]
    fn test_cancel_kind_and_id() {
        let mut s = Scheduler::new();
        let keep = s.schedule_in(1.0, TimerKind::Settle);
        s.schedule_in(2.0, TimerKind::PocketExpired);
        s.schedule_in(3.0, TimerKind::BlitzArrival);

        assert_eq!(s.cancel_kind(TimerKind::PocketExpired), 1);
        assert!(!s.is_pending(TimerKind::PocketExpired));
        assert_eq!(s.cancel(keep).map(|t| t.kind), Some(TimerKind::Settle));
        assert!(s.cancel(keep).is_none());
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn test_nothing_fires_after_cancel_all() {
        let mut s = Scheduler::new();
        s.schedule_in(0.1, TimerKind::SnapToDropback);
        s.schedule_in(0.2, TimerKind::FlightArrival);
        assert_eq!(s.cancel_all(), 2);
        assert!(s.pop_due(f32::MAX).is_none());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut s = Scheduler::new();
        s.advance_to(1.5);
        s.advance_to(0.5);
        assert_eq!(s.now(), 1.5);
        // Scheduling in the past clamps to now.
        s.schedule_at(1.0, TimerKind::Settle);
        assert_eq!(s.peek_next().map(|t| t.due), Some(1.5));
    }
}
