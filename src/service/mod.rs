//! Observer service subsystem.
//!
//! # Data Flow
//! ```text
//! Host router events
//!     → mpsc::Sender<NavigationEvent>        (injected by the embedding app)
//!     → runner.rs (select: inbound | next timer deadline | shutdown)
//!     → RouterObserver (notify / advance_to)
//!     → broadcast::Sender<ObserverEvent>     (UI subscribers)
//! ```
//!
//! # Design Decisions
//! - One task owns the observer; notifications and timers never overlap
//! - The host stream is a parameter, not global state
//! - Timers due before an inbound event fire before it is applied

pub mod host;
pub mod runner;

pub use host::{forward_lines, NavigationEvent, ParseEventError};
pub use runner::ObserverService;
