//! Patrol path generation.
//!
//! Each chinook gets its own shuffled copy of the eligible set with
//! near-duplicate points removed, so it never flies from one monument to
//! another sitting right next to it.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::eligible::EligibleWaypointSet;
use crate::types::Location;

/// Points closer than this (2D) to an earlier point in the path are dropped.
pub const REVISIT_MAX_PROXIMITY: f32 = 100.0;

/// A per-agent patrol route plus its read cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatrolPath {
    pub(crate) sequence: Vec<Location>,
    pub(crate) cursor: usize,
}

impl PatrolPath {
    /// Shuffle the eligible set uniformly and deduplicate by proximity.
    pub fn generate<R: Rng + ?Sized>(eligible: &EligibleWaypointSet, rng: &mut R) -> Self {
        let mut sequence = eligible.points().to_vec();
        sequence.shuffle(rng);
        dedupe_by_proximity(&mut sequence, REVISIT_MAX_PROXIMITY);
        Self::from_sequence(sequence)
    }

    /// Wrap a ready-made sequence, cursor at the start.
    #[must_use]
    pub fn from_sequence(sequence: Vec<Location>) -> Self {
        Self { sequence, cursor: 0 }
    }

    /// The waypoints in visiting order.
    #[must_use]
    pub fn sequence(&self) -> &[Location] {
        &self.sequence
    }

    /// Index of the next waypoint to be served (may equal `len` before wrap).
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of waypoints on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Remove every point lying within `min_distance` of an earlier point.
///
/// Scans from the back: for each index `i`, the first earlier index `j`
/// found too close causes `points[i]` to be removed. Earlier points win.
pub fn dedupe_by_proximity(points: &mut Vec<Location>, min_distance: f32) {
    for i in (0..points.len()).rev() {
        let current = points[i];
        if points[..i]
            .iter()
            .any(|earlier| current.distance_2d(earlier) < min_distance)
        {
            points.remove(i);
        }
    }
}
