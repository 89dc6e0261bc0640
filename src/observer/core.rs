//! Router observer state machine.
//!
//! # Transitions
//! ```text
//! start(url, id)   → every relevant group: track routing
//!                    → schedule Delay timer, schedule Timeout timer (if configured)
//! end(url, id)     → every relevant group: remove routing by id → finished?
//!                    or, if the id is unknown → delayed_end
//! Delay fired      → group active and not yet pending → pending
//! Timeout fired    → routing (by ticket) still active → remove → timed_out → finished?
//! ```
//!
//! # Design Decisions
//! - Every guard is evaluated at fire time against live state
//! - Timeout timers are cancelled when their routing ends; delay timers are not,
//!   they belong to the group's debounce window
//! - Events are returned to the caller in emission order

use std::time::Duration;

use crate::config::{ConfigError, ObserverConfig};
use crate::observability::metrics;
use crate::observer::events::{DelayedRoutingEnd, Notification, ObserverEvent, RoutingTimeout};
use crate::routing::group::{NavigationId, Routing};
use crate::routing::registry::GroupRegistry;
use crate::timer::{Scheduler, Timer, TimerKind, TimerQueue};

/// Derives pending / finished / timed-out / delayed-end events from navigation notifications.
#[derive(Debug)]
pub struct RouterObserver<S = TimerQueue> {
    registry: GroupRegistry,
    scheduler: S,
    next_ticket: u64,
}

impl RouterObserver<TimerQueue> {
    pub fn new(registry: GroupRegistry) -> Self {
        Self::with_scheduler(registry, TimerQueue::new())
    }

    /// Build the registry from config and observe with the default timer queue.
    pub fn from_config(config: &ObserverConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(GroupRegistry::from_config(config)?))
    }
}

impl<S: Scheduler> RouterObserver<S> {
    pub fn with_scheduler(registry: GroupRegistry, scheduler: S) -> Self {
        Self {
            registry,
            scheduler,
            next_ticket: 0,
        }
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Current observer clock.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn has_scheduled_timers(&self) -> bool {
        !self.scheduler.is_empty()
    }

    /// Dispatch a host notification.
    pub fn notify(&mut self, notification: Notification) -> Vec<ObserverEvent> {
        match notification {
            Notification::Start { timestamp, url, id } => {
                self.notify_start(timestamp, &url, id);
                Vec::new()
            }
            Notification::Terminal { url, id } => self.notify_end(&url, id),
        }
    }

    /// A navigation started. Never emits directly; all effects go through timers.
    pub fn notify_start(&mut self, timestamp: u64, url: &str, id: NavigationId) {
        for index in self.registry.relevant_indices(url) {
            let Some(group) = self.registry.get_mut(index) else {
                continue;
            };
            let ticket = self.next_ticket;
            self.next_ticket += 1;

            let delay = group.config().delay;
            let timeout = group.config().timeout;
            let routing = group.track(Routing::new(ticket, id, url, timestamp));

            let timer = Timer {
                group: index,
                ticket,
                id,
                kind: TimerKind::Delay,
            };
            self.scheduler.schedule(delay, timer);
            if let Some(timeout) = timeout {
                let timer = Timer {
                    kind: TimerKind::Timeout,
                    ..timer
                };
                routing.timeout_timer = Some(self.scheduler.schedule(timeout, timer));
            }

            tracing::debug!(
                group = %group.name(),
                id,
                url,
                active = group.active_count(),
                "Routing started"
            );
            metrics::record_active_routings(group.name(), group.active_count());
        }
    }

    /// A navigation ended, was cancelled or failed.
    pub fn notify_end(&mut self, url: &str, id: NavigationId) -> Vec<ObserverEvent> {
        let mut events = Vec::new();

        for index in self.registry.relevant_indices(url) {
            let Some(group) = self.registry.get_mut(index) else {
                continue;
            };

            match group.remove_by_id(id) {
                Some(routing) => {
                    if let Some(timer) = routing.timeout_timer {
                        self.scheduler.cancel(timer);
                    }
                    tracing::debug!(
                        group = %group.name(),
                        id,
                        url,
                        active = group.active_count(),
                        "Routing ended"
                    );
                    metrics::record_active_routings(group.name(), group.active_count());
                    if group.settle() {
                        publish(&mut events, ObserverEvent::finished(group.name()));
                    }
                }
                None => publish(
                    &mut events,
                    ObserverEvent::DelayedEnd(DelayedRoutingEnd {
                        group: group.name().to_string(),
                        id,
                        url: url.to_string(),
                        timeout: group.config().timeout,
                    }),
                ),
            }
        }

        events
    }

    /// Deliver one timer. Safe to call for stale or repeated timers.
    pub fn fire(&mut self, timer: Timer) -> Vec<ObserverEvent> {
        let mut events = Vec::new();
        let Some(group) = self.registry.get_mut(timer.group) else {
            return events;
        };

        match timer.kind {
            TimerKind::Delay => {
                if group.mark_pending() {
                    publish(&mut events, ObserverEvent::pending(group.name()));
                }
            }
            TimerKind::Timeout => {
                if let Some(routing) = group.remove_by_ticket(timer.ticket) {
                    metrics::record_active_routings(group.name(), group.active_count());
                    publish(
                        &mut events,
                        ObserverEvent::TimedOut(RoutingTimeout {
                            group: group.name().to_string(),
                            id: routing.id,
                            url: routing.url,
                            timeout: group.config().timeout.unwrap_or_default(),
                        }),
                    );
                    if group.settle() {
                        publish(&mut events, ObserverEvent::finished(group.name()));
                    }
                }
            }
        }

        events
    }

    /// Fire every timer due at or before `now`, in deadline order.
    pub fn advance_to(&mut self, now: Duration) -> Vec<ObserverEvent> {
        let mut events = Vec::new();
        while let Some(timer) = self.scheduler.pop_due(now) {
            events.extend(self.fire(timer));
        }
        self.scheduler.advance_clock(now);
        events
    }

    /// Move the clock forward by `by`, firing due timers.
    pub fn advance(&mut self, by: Duration) -> Vec<ObserverEvent> {
        let target = self.scheduler.now().saturating_add(by);
        self.advance_to(target)
    }
}

fn publish(events: &mut Vec<ObserverEvent>, event: ObserverEvent) {
    match &event {
        ObserverEvent::Pending { group } => tracing::info!(group = %group, "Routing group pending"),
        ObserverEvent::Finished { group } => tracing::info!(group = %group, "Routing group finished"),
        ObserverEvent::TimedOut(t) => tracing::warn!(
            group = %t.group,
            id = t.id,
            url = %t.url,
            timeout_ms = t.timeout.as_millis() as u64,
            "Routing timed out"
        ),
        ObserverEvent::DelayedEnd(d) => tracing::warn!(
            group = %d.group,
            id = d.id,
            url = %d.url,
            "Routing end arrived for untracked navigation"
        ),
    }
    metrics::record_event(&event);
    events.push(event);
}
