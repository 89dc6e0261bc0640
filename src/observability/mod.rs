//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Observer core and service produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so event output on stdout stays machine-readable
//! - Metrics are cheap facade calls; exporting is left to the embedding application

pub mod logging;
pub mod metrics;
