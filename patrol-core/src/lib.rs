//! # Patrol Core Library
//!
//! Host-agnostic patrol route planning for roaming cargo helicopters.
//!
//! Monuments on a map are the waypoint candidates. The pipeline is:
//!
//! - **Filter**: [`filter::FilterRules`] decides which monuments are eligible
//!   (category, tier, safe zone, prefab name patterns).
//! - **Eligible set**: [`eligible::build_eligible_set`] runs once per session
//!   and yields the shared, read-only [`EligibleWaypointSet`].
//! - **Path**: [`PatrolPath::generate`] shuffles the eligible set and drops
//!   points that sit too close to an earlier one.
//! - **Cursor**: [`PathFinder::next_waypoint`] serves the path round-robin.
//!
//! Configuration lives in [`config`] and is persisted as a JSON document that
//! is additively deep-merged with the defaults on load.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod cursor;
pub mod eligible;
pub mod error;
pub mod filter;
pub mod path;
pub mod types;

pub use config::{CargoDropRange, PatrolConfig};
pub use cursor::PathFinder;
pub use eligible::{DropZoneReport, EligibleWaypointSet};
pub use error::PatrolError;
pub use filter::{FilterDecision, FilterRules};
pub use path::PatrolPath;
pub use types::*;
