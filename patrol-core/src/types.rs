//! Core type definitions for patrol planning.
//!
//! Everything here is plain data captured from the host's static map data.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::PatrolError;

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Unique identifier for an agent (chinook) in the host simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Create a new random agent ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// A 3D position in the game world. `y` is the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate (height).
    pub y: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Location {
    /// The origin, returned by path finders that have nowhere to go.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a location from its three coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance on the horizontal plane, ignoring height.
    #[must_use]
    pub fn distance_2d(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Whether this is the "no destination" sentinel.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Monument classification
// ---------------------------------------------------------------------------

/// Monument category, as classified by the host map generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonumentCategory {
    /// Underground cave systems.
    Cave,
    /// Airfields.
    Airport,
    /// Standalone buildings.
    Building,
    /// Towns, including safe-zone compounds.
    Town,
    /// Irradiated industrial sites.
    Radtown,
    /// Lighthouses.
    Lighthouse,
    /// Water wells.
    WaterWell,
    /// Small roadside monuments.
    Roadside,
    /// Mountain monuments.
    Mountain,
    /// Lakes.
    Lake,
}

impl MonumentCategory {
    /// All categories, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Cave,
        Self::Airport,
        Self::Building,
        Self::Town,
        Self::Radtown,
        Self::Lighthouse,
        Self::WaterWell,
        Self::Roadside,
        Self::Mountain,
        Self::Lake,
    ];

    /// Name as it appears in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cave => "Cave",
            Self::Airport => "Airport",
            Self::Building => "Building",
            Self::Town => "Town",
            Self::Radtown => "Radtown",
            Self::Lighthouse => "Lighthouse",
            Self::WaterWell => "WaterWell",
            Self::Roadside => "Roadside",
            Self::Mountain => "Mountain",
            Self::Lake => "Lake",
        }
    }
}

impl fmt::Display for MonumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MonumentCategory {
    type Err = PatrolError;

    /// Case-insensitive parse of a configured category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PatrolError::Config(format!("Invalid monument type: {s}")))
    }
}

bitflags! {
    /// Monument tier bitmask. A monument may belong to several tiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MonumentTier: u8 {
        /// Beach / outskirts tier.
        const TIER0 = 1;
        /// Mid-map tier.
        const TIER1 = 1 << 1;
        /// Inland tier.
        const TIER2 = 1 << 2;
    }
}

impl Default for MonumentTier {
    fn default() -> Self {
        Self::empty()
    }
}

impl MonumentTier {
    /// Case-insensitive lookup of a single configured tier name (`"Tier0"`).
    ///
    /// # Errors
    /// Returns `PatrolError::Config` when the name matches no tier.
    pub fn parse_name(name: &str) -> Result<Self, PatrolError> {
        let wanted = name.trim();
        Self::all()
            .iter_names()
            .find(|(flag_name, _)| flag_name.eq_ignore_ascii_case(wanted))
            .map(|(_, flag)| flag)
            .ok_or_else(|| PatrolError::Config(format!("Invalid monument tier: {name}")))
    }
}

// ---------------------------------------------------------------------------
// Map data
// ---------------------------------------------------------------------------

/// Prefab fragment identifying a generic marker placed inside a larger
/// structure; such candidates are named after their root structure instead.
pub const MONUMENT_MARKER_PREFAB: &str = "monument_marker.prefab";

/// One monument on the map, as read from the host's static map data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointCandidate {
    /// Raw prefab name.
    pub name: String,
    /// Name of the topmost containing structure, if the host knows it.
    #[serde(default)]
    pub root_name: Option<String>,
    /// Monument category.
    pub category: MonumentCategory,
    /// Tier membership.
    #[serde(default)]
    pub tiers: MonumentTier,
    /// Whether the monument is a safe zone.
    #[serde(default)]
    pub is_safe_zone: bool,
    /// World position of the monument.
    pub position: Location,
}

impl WaypointCandidate {
    /// Create a candidate with no tiers, no root and outside any safe zone.
    #[must_use]
    pub fn new(name: impl Into<String>, category: MonumentCategory, position: Location) -> Self {
        Self {
            name: name.into(),
            root_name: None,
            category,
            tiers: MonumentTier::empty(),
            is_safe_zone: false,
            position,
        }
    }

    /// Builder-style setter for the tier mask.
    #[must_use]
    pub fn with_tiers(mut self, tiers: MonumentTier) -> Self {
        self.tiers = tiers;
        self
    }

    /// Builder-style setter for the safe-zone flag.
    #[must_use]
    pub fn with_safe_zone(mut self, is_safe_zone: bool) -> Self {
        self.is_safe_zone = is_safe_zone;
        self
    }

    /// Builder-style setter for the root structure name.
    #[must_use]
    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = Some(root_name.into());
        self
    }

    /// The name used for pattern matching and reporting.
    ///
    /// Generic marker prefabs resolve to their root structure's name.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        if self.name.contains(MONUMENT_MARKER_PREFAB) {
            if let Some(root) = self.root_name.as_deref() {
                return root;
            }
        }
        &self.name
    }
}

/// A location where chinooks may drop cargo. Only used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DropZone {
    /// World position of the drop zone.
    pub position: Location,
}

impl DropZone {
    /// Create a drop zone at the given position.
    #[must_use]
    pub const fn new(position: Location) -> Self {
        Self { position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_2d_ignores_height() {
        let a = Location::new(0.0, 0.0, 0.0);
        let b = Location::new(3.0, 500.0, 4.0);
        assert!((a.distance_2d(&b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("cave".parse::<MonumentCategory>().ok(), Some(MonumentCategory::Cave));
        assert_eq!("WATERWELL".parse::<MonumentCategory>().ok(), Some(MonumentCategory::WaterWell));
        assert!("Volcano".parse::<MonumentCategory>().is_err());
    }

    #[test]
    fn tier_parse_is_case_insensitive() {
        assert_eq!(MonumentTier::parse_name("Tier0").ok(), Some(MonumentTier::TIER0));
        assert_eq!(MonumentTier::parse_name("tier2").ok(), Some(MonumentTier::TIER2));
        assert!(MonumentTier::parse_name("Tier9").is_err());
    }

    #[test]
    fn marker_prefab_resolves_to_root() {
        let marker = WaypointCandidate::new(
            "assets/bundled/prefabs/autospawn/monument/monument_marker.prefab",
            MonumentCategory::Building,
            Location::ZERO,
        )
        .with_root_name("ferry_terminal_1");
        assert_eq!(marker.effective_name(), "ferry_terminal_1");

        let orphan = WaypointCandidate::new(
            "assets/bundled/prefabs/autospawn/monument/monument_marker.prefab",
            MonumentCategory::Building,
            Location::ZERO,
        );
        assert_eq!(orphan.effective_name(), orphan.name);

        let plain = WaypointCandidate::new("airfield_1", MonumentCategory::Airport, Location::ZERO)
            .with_root_name("ignored");
        assert_eq!(plain.effective_name(), "airfield_1");
    }
}
