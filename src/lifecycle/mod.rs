//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build group registry
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Observer service drops pending timers → Exit
//!
//! Signals (signals.rs):
//!     SIGINT (ctrl-c) → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then registry, then the service task
//! - Shutdown is broadcast so every task observes it

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
