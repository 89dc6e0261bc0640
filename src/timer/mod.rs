//! Timer scheduling subsystem.
//!
//! # Data Flow
//! ```text
//! Observer core (on start notification)
//!     → Scheduler::schedule(delay, Timer{Delay})
//!     → Scheduler::schedule(timeout, Timer{Timeout})   (if the group has one)
//!
//! Driver (virtual time in tests, tokio sleep in the service)
//!     → Scheduler::pop_due(now)
//!     → RouterObserver::fire(timer)   (liveness re-checked there)
//! ```
//!
//! # Design Decisions
//! - Timers carry plain identifiers (group index, ticket, id), never references
//! - The clock is a `Duration` since the scheduler epoch, advanced explicitly
//! - Deadlines fire in non-decreasing order; equal deadlines fire in schedule order
//! - Cancellation is an optimization; correctness never depends on it

pub mod queue;

use std::time::Duration;

use crate::routing::group::NavigationId;

pub use queue::TimerQueue;

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Debounce window of a group has elapsed.
    Delay,
    /// A single routing exceeded its group's timeout.
    Timeout,
}

/// A scheduled callback, identified by the routing it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timer {
    /// Index of the group in the registry.
    pub group: usize,
    /// Identity of the routing entry that scheduled it.
    pub ticket: u64,
    /// Navigation id of that routing entry.
    pub id: NavigationId,
    pub kind: TimerKind,
}

/// Handle returned by [`Scheduler::schedule`], used for cancellation.
///
/// Ordering is by deadline first, then by scheduling sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId {
    deadline: Duration,
    seq: u64,
}

impl TimerId {
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// Deferred-callback scheduler driven by an explicit clock.
pub trait Scheduler {
    /// Current time, relative to the scheduler epoch.
    fn now(&self) -> Duration;

    /// Schedule `timer` to fire `after` from now.
    fn schedule(&mut self, after: Duration, timer: Timer) -> TimerId;

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Deadline of the earliest scheduled timer.
    fn next_deadline(&self) -> Option<Duration>;

    /// Remove the earliest timer due at or before `until`, moving the clock to its deadline.
    fn pop_due(&mut self, until: Duration) -> Option<Timer>;

    /// Move the clock forward. Never moves it backwards.
    fn advance_clock(&mut self, to: Duration);

    /// Number of timers still scheduled.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
