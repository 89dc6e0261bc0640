//! Ordered timer queue with a virtual clock.

use std::collections::BTreeMap;
use std::time::Duration;

use super::{Scheduler, Timer, TimerId};

/// Default [`Scheduler`]: a deadline-ordered map with a manually advanced clock.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    timers: BTreeMap<TimerId, Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue whose clock starts at `now`.
    pub fn starting_at(now: Duration) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, after: Duration, timer: Timer) -> TimerId {
        let id = TimerId {
            deadline: self.now.saturating_add(after),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.timers.insert(id, timer);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(TimerId::deadline)
    }

    fn pop_due(&mut self, until: Duration) -> Option<Timer> {
        let entry = self.timers.first_entry()?;
        if entry.key().deadline > until {
            return None;
        }
        let deadline = entry.key().deadline;
        let timer = entry.remove();
        self.advance_clock(deadline);
        Some(timer)
    }

    fn advance_clock(&mut self, to: Duration) {
        if to > self.now {
            self.now = to;
        }
    }

    fn len(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerKind;

    fn timer(ticket: u64, kind: TimerKind) -> Timer {
        Timer {
            group: 0,
            ticket,
            id: ticket,
            kind,
        }
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(100), timer(1, TimerKind::Timeout));
        queue.schedule(Duration::from_millis(50), timer(2, TimerKind::Delay));

        assert_eq!(queue.next_deadline(), Some(Duration::from_millis(50)));
        assert_eq!(queue.pop_due(Duration::from_millis(40)), None);

        let first = queue.pop_due(Duration::from_millis(200)).unwrap();
        assert_eq!(first.ticket, 2);
        assert_eq!(queue.now(), Duration::from_millis(50));

        let second = queue.pop_due(Duration::from_millis(200)).unwrap();
        assert_eq!(second.ticket, 1);
        assert_eq!(queue.now(), Duration::from_millis(100));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_deadlines_fire_in_schedule_order() {
        let mut queue = TimerQueue::new();
        for ticket in 0..4 {
            queue.schedule(Duration::from_millis(10), timer(ticket, TimerKind::Delay));
        }
        let order: Vec<u64> = std::iter::from_fn(|| queue.pop_due(Duration::from_millis(10)))
            .map(|t| t.ticket)
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule(Duration::from_millis(10), timer(1, TimerKind::Timeout));
        assert_eq!(queue.len(), 1);
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.pop_due(Duration::from_secs(1)), None);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut queue = TimerQueue::starting_at(Duration::from_millis(500));
        queue.advance_clock(Duration::from_millis(100));
        assert_eq!(queue.now(), Duration::from_millis(500));

        // Scheduling is relative to the current clock.
        let id = queue.schedule(Duration::from_millis(20), timer(1, TimerKind::Delay));
        assert_eq!(id.deadline(), Duration::from_millis(520));
    }
}
