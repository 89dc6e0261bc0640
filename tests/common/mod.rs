//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use router_observer::config::{GroupOptions, ObserverConfig, RouteRule};
use router_observer::observer::{DelayedRoutingEnd, ObserverEvent, RouterObserver, RoutingTimeout};

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Group that only tracks URLs containing `needle`.
pub fn group_for(name: &str, needle: &str) -> GroupOptions {
    GroupOptions {
        whitelisted_routes: Some(vec![RouteRule::literal(needle)]),
        ..GroupOptions::named(name)
    }
}

pub fn config_with(groups: Vec<GroupOptions>) -> ObserverConfig {
    ObserverConfig {
        routing_groups: groups,
        ..ObserverConfig::default()
    }
}

pub fn observer(config: &ObserverConfig) -> RouterObserver {
    RouterObserver::from_config(config).expect("valid config")
}

/// Events of one group, in emission order.
pub fn for_group(events: &[ObserverEvent], group: &str) -> Vec<ObserverEvent> {
    events.iter().filter(|e| e.group() == group).cloned().collect()
}

pub fn count(events: &[ObserverEvent], kind: &str) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}

pub fn timed_out(group: &str, id: u64, url: &str, timeout_ms: u64) -> ObserverEvent {
    ObserverEvent::TimedOut(RoutingTimeout {
        group: group.into(),
        id,
        url: url.into(),
        timeout: ms(timeout_ms),
    })
}

pub fn delayed_end(group: &str, id: u64, url: &str, timeout_ms: Option<u64>) -> ObserverEvent {
    ObserverEvent::DelayedEnd(DelayedRoutingEnd {
        group: group.into(),
        id,
        url: url.into(),
        timeout: timeout_ms.map(ms),
    })
}
