//! Patrol cursor: serves waypoints round-robin.

use crate::path::PatrolPath;
use crate::types::Location;

/// The host capability a chinook brain queries for "where to next".
///
/// [`PatrolPath`] is one implementation; host defaults and other plugins
/// may provide their own.
pub trait PathFinder: std::fmt::Debug {
    /// The next patrol destination, or [`Location::ZERO`] when there is none.
    fn next_waypoint(&mut self) -> Location;
}

impl PathFinder for PatrolPath {
    fn next_waypoint(&mut self) -> Location {
        if self.sequence.is_empty() {
            return Location::ZERO;
        }

        if self.cursor >= self.sequence.len() {
            self.cursor = 0;
        }

        let waypoint = self.sequence[self.cursor];
        self.cursor += 1;
        waypoint
    }
}
