//! Routing group configuration and runtime state.
//!
//! # State Transitions
//! ```text
//! Idle ──track()──▶ Active ──delay elapsed──▶ Pending ──last routing removed──▶ Idle
//!                     │                                      (finished emitted)
//!                     └──last routing removed──▶ Idle   (no event)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once resolved; only `routings` and the pending flag change
//! - Entries are looked up by id for end notifications, by ticket for timers
//! - The pending flag is cleared only by `settle()`, exactly once per idle transition

use std::time::Duration;

use crate::routing::matcher::RuleSet;
use crate::timer::TimerId;

/// Navigation identifier supplied by the host.
pub type NavigationId = u64;

/// Name of the implicit catch-all group.
pub const DEFAULT_GROUP_NAME: &str = "default";

/// Debounce delay applied when neither the group nor the globals set one.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// Fully resolved, immutable group configuration.
#[derive(Debug)]
pub struct GroupConfig {
    pub name: String,
    pub rules: RuleSet,
    pub delay: Duration,
    /// `None` disables timeout tracking for the group.
    pub timeout: Option<Duration>,
}

impl GroupConfig {
    /// A group that tracks every URL with the default delay and no timeout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: RuleSet::allow_all(),
            delay: DEFAULT_DELAY,
            timeout: None,
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_relevant(&self, url: &str) -> bool {
        self.rules.is_relevant(url)
    }
}

/// One in-flight navigation tracked by a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub id: NavigationId,
    pub url: String,
    /// Host timestamp of the start notification, in milliseconds.
    pub started_at: u64,
    pub(crate) ticket: u64,
    pub(crate) timeout_timer: Option<TimerId>,
}

impl Routing {
    pub(crate) fn new(ticket: u64, id: NavigationId, url: impl Into<String>, started_at: u64) -> Self {
        Self {
            id,
            url: url.into(),
            started_at,
            ticket,
            timeout_timer: None,
        }
    }
}

/// A group's configuration plus its mutable tracking state.
#[derive(Debug)]
pub struct RoutingGroup {
    config: GroupConfig,
    routings: Vec<Routing>,
    pending_event_sent: bool,
}

impl RoutingGroup {
    pub fn new(config: GroupConfig) -> Self {
        Self {
            config,
            routings: Vec::new(),
            pending_event_sent: false,
        }
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_relevant(&self, url: &str) -> bool {
        self.config.is_relevant(url)
    }

    /// Active routings in start order.
    pub fn routings(&self) -> &[Routing] {
        &self.routings
    }

    pub fn active_count(&self) -> usize {
        self.routings.len()
    }

    pub fn is_idle(&self) -> bool {
        self.routings.is_empty()
    }

    /// True between a pending event and the next return to idle.
    pub fn is_pending(&self) -> bool {
        self.pending_event_sent
    }

    pub(crate) fn track(&mut self, routing: Routing) -> &mut Routing {
        self.routings.push(routing);
        let last = self.routings.len() - 1;
        &mut self.routings[last]
    }

    /// Remove the earliest active entry with this navigation id.
    pub(crate) fn remove_by_id(&mut self, id: NavigationId) -> Option<Routing> {
        let pos = self.routings.iter().position(|r| r.id == id)?;
        Some(self.routings.remove(pos))
    }

    /// Remove the entry with this ticket, if it is still active.
    pub(crate) fn remove_by_ticket(&mut self, ticket: u64) -> Option<Routing> {
        let pos = self.routings.iter().position(|r| r.ticket == ticket)?;
        Some(self.routings.remove(pos))
    }

    /// Delay elapsed. Returns true if a pending event must be emitted now.
    pub(crate) fn mark_pending(&mut self) -> bool {
        if self.routings.is_empty() || self.pending_event_sent {
            return false;
        }
        self.pending_event_sent = true;
        true
    }

    /// Called after a removal. Returns true if a finished event must be emitted now.
    pub(crate) fn settle(&mut self) -> bool {
        if !self.routings.is_empty() || !self.pending_event_sent {
            return false;
        }
        self.pending_event_sent = false;
        true
    }
}
