//! Observer core.
//!
//! # Data Flow
//! ```text
//! Notification (start | terminal)
//!     → core.rs (fan out to every relevant group)
//!     → routing::group (mutate state)
//!     → timer::Scheduler (schedule / cancel)
//!     → Vec<ObserverEvent> returned to the driver
//!
//! Clock advance
//!     → Scheduler::pop_due
//!     → core.rs fire(timer) (guards re-checked)
//!     → Vec<ObserverEvent>
//! ```
//!
//! # Design Decisions
//! - Synchronous and single-threaded; the async driver lives in `service`
//! - No fallible operations after construction

pub mod core;
pub mod events;

pub use self::core::RouterObserver;
pub use events::{DelayedRoutingEnd, Notification, ObserverEvent, RoutingTimeout};
