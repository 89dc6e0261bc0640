//! Metrics collection.
//!
//! # Metrics
//! - `router_observer_events_total` (counter): emitted events by event kind, group
//! - `router_observer_active_routings` (gauge): in-flight routings per group
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no-ops until a recorder is installed
//! - Labels for event kind and group name

use crate::observer::events::ObserverEvent;

/// Count an emitted event.
pub fn record_event(event: &ObserverEvent) {
    ::metrics::counter!(
        "router_observer_events_total",
        "event" => event.kind(),
        "group" => event.group().to_string()
    )
    .increment(1);
}

/// Record the number of active routings of a group.
pub fn record_active_routings(group: &str, active: usize) {
    ::metrics::gauge!("router_observer_active_routings", "group" => group.to_string())
        .set(active as f64);
}
