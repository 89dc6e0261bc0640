//! Routing group subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation URL
//!     → registry.rs (iterate groups in order)
//!     → matcher.rs (allow-list AND NOT deny-list)
//!     → group.rs (track / remove routing, pending flag)
//!
//! Group Compilation (at startup):
//!     ObserverConfig + GroupOptions[]
//!     → Merge group → global → default
//!     → Compile rule entries (substring, regex)
//!     → Append implicit "default" group
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - A URL may be relevant to many groups; each tracks it independently
//! - Deterministic: same URL always matches the same groups

pub mod group;
pub mod matcher;
pub mod registry;

pub use group::{GroupConfig, NavigationId, Routing, RoutingGroup, DEFAULT_GROUP_NAME};
pub use matcher::{ContainsMatcher, RegexMatcher, RuleSet, UrlMatcher};
pub use registry::GroupRegistry;
