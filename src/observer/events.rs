//! Inbound notifications and outbound observer events.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::routing::group::NavigationId;

/// A host notification, reduced to what the observer distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A navigation started.
    Start {
        /// Host timestamp in milliseconds.
        timestamp: u64,
        url: String,
        id: NavigationId,
    },
    /// A navigation reached its end: completed, cancelled or failed.
    Terminal { url: String, id: NavigationId },
}

/// A routing exceeded its group's timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingTimeout {
    pub group: String,
    pub id: NavigationId,
    pub url: String,
    #[serde(rename = "timeout_ms", serialize_with = "as_millis")]
    pub timeout: Duration,
}

/// An end notification arrived for an id the group was not tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayedRoutingEnd {
    pub group: String,
    pub id: NavigationId,
    pub url: String,
    /// The group's timeout, `None` if the group has no timeout.
    #[serde(rename = "timeout_ms", serialize_with = "as_optional_millis")]
    pub timeout: Option<Duration>,
}

/// Event derived by the observer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ObserverEvent {
    /// The group's delay elapsed with at least one active routing.
    Pending { group: String },
    /// The group returned to idle after a pending event.
    Finished { group: String },
    TimedOut(RoutingTimeout),
    DelayedEnd(DelayedRoutingEnd),
}

impl ObserverEvent {
    pub fn pending(group: impl Into<String>) -> Self {
        Self::Pending {
            group: group.into(),
        }
    }

    pub fn finished(group: impl Into<String>) -> Self {
        Self::Finished {
            group: group.into(),
        }
    }

    /// Name of the group that produced the event.
    pub fn group(&self) -> &str {
        match self {
            Self::Pending { group } | Self::Finished { group } => group,
            Self::TimedOut(t) => &t.group,
            Self::DelayedEnd(d) => &d.group,
        }
    }

    /// Stable label, also used as the serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pending { .. } => "pending",
            Self::Finished { .. } => "finished",
            Self::TimedOut(_) => "timed_out",
            Self::DelayedEnd(_) => "delayed_end",
        }
    }
}

fn as_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

fn as_optional_millis<S: Serializer>(
    value: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
        None => serializer.serialize_none(),
    }
}
