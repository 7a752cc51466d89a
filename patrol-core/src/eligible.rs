//! Eligible set builder: the once-per-session scan over all monuments.
//!
//! The resulting [`EligibleWaypointSet`] is immutable and shared by reference
//! with every patrol path generated afterwards.

use std::fmt;

use tracing::debug;

use crate::filter::FilterRules;
use crate::types::{DropZone, Location, WaypointCandidate};

/// A drop zone closer than this (2D) to a monument counts as "at" it.
pub const DROP_ZONE_TOLERANCE: f32 = 200.0;

/// Positions of every monument that passed the filter, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EligibleWaypointSet {
    points: Vec<Location>,
}

impl EligibleWaypointSet {
    /// Wrap an already-filtered list of positions.
    #[must_use]
    pub fn from_points(points: Vec<Location>) -> Self {
        Self { points }
    }

    /// The eligible positions.
    #[must_use]
    pub fn points(&self) -> &[Location] {
        &self.points
    }

    /// Number of eligible waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether nothing passed the filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One line of the drop-zone report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropZoneEntry {
    /// Effective monument name.
    pub name: String,
    /// Whether a drop zone sits within [`DROP_ZONE_TOLERANCE`].
    pub has_drop_zone: bool,
}

/// Observability summary of the eligible set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropZoneReport {
    /// One entry per eligible monument, in discovery order.
    pub entries: Vec<DropZoneEntry>,
}

impl DropZoneReport {
    /// How many eligible monuments have a nearby drop zone.
    #[must_use]
    pub fn drop_zone_count(&self) -> usize {
        self.entries.iter().filter(|e| e.has_drop_zone).count()
    }
}

impl fmt::Display for DropZoneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} monuments on this map may be visited by Chinooks. {} have drop zones.",
            self.entries.len(),
            self.drop_zone_count()
        )?;
        for entry in &self.entries {
            let suffix = if entry.has_drop_zone { " -- HAS DROP ZONE" } else { "" };
            writeln!(f, "- {}{suffix}", entry.name)?;
        }
        Ok(())
    }
}

/// The drop zone nearest to `position` on the horizontal plane.
#[must_use]
pub fn closest_drop_zone<'a>(
    position: &Location,
    drop_zones: &'a [DropZone],
) -> Option<&'a DropZone> {
    drop_zones.iter().min_by(|a, b| {
        a.position
            .distance_2d(position)
            .total_cmp(&b.position.distance_2d(position))
    })
}

/// Whether the closest drop zone lies within [`DROP_ZONE_TOLERANCE`].
#[must_use]
pub fn has_nearby_drop_zone(position: &Location, drop_zones: &[DropZone]) -> bool {
    closest_drop_zone(position, drop_zones)
        .is_some_and(|zone| zone.position.distance_2d(position) < DROP_ZONE_TOLERANCE)
}

/// Filter every candidate once, collecting eligible positions and the
/// drop-zone report.
pub fn build_eligible_set<'a, I>(
    candidates: I,
    rules: &FilterRules,
    drop_zones: &[DropZone],
) -> (EligibleWaypointSet, DropZoneReport)
where
    I: IntoIterator<Item = &'a WaypointCandidate>,
{
    let mut points = Vec::new();
    let mut report = DropZoneReport::default();

    for candidate in candidates {
        let decision = rules.evaluate(candidate);
        if !decision.is_allowed() {
            debug!(name = %candidate.effective_name(), ?decision, "Monument excluded from patrols");
            continue;
        }

        points.push(candidate.position);
        report.entries.push(DropZoneEntry {
            name: candidate.effective_name().to_string(),
            has_drop_zone: has_nearby_drop_zone(&candidate.position, drop_zones),
        });
    }

    (EligibleWaypointSet::from_points(points), report)
}
