//! Router observer library.
//!
//! Derives debounced progress signals from a host router's navigation events:
//! per routing group, `pending` once navigations have run for the group's delay,
//! `finished` when the group is idle again, `timed_out` for navigations that
//! exceed the group's timeout, and `delayed_end` for ends of untracked navigations.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod observer;
pub mod routing;
pub mod service;
pub mod timer;

pub use config::schema::ObserverConfig;
pub use lifecycle::Shutdown;
pub use observer::{Notification, ObserverEvent, RouterObserver};
pub use routing::GroupRegistry;
pub use service::{NavigationEvent, ObserverService};
