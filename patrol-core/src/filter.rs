//! Waypoint filter: decides which monuments chinooks may visit.
//!
//! Rules are evaluated in a fixed order and the first one that matches
//! decides:
//!
//! | Step | Rule                                   | Outcome |
//! |------|----------------------------------------|---------|
//! | 1    | safe zone while safe zones are banned  | reject  |
//! | 2    | force-allow partial / exact name match | accept  |
//! | 3    | disallowed partial / exact name match  | reject  |
//! | 4    | any disallowed tier bit set            | reject  |
//! | 5    | disallowed category                    | reject  |
//! | 6    | (nothing matched)                      | accept  |
//!
//! Name matching is case-insensitive and uses the candidate's
//! [`effective_name`](crate::types::WaypointCandidate::effective_name).

use std::collections::BTreeSet;

use tracing::error;

use crate::config::PatrolConfig;
use crate::error::PatrolError;
use crate::types::{MonumentCategory, MonumentTier, WaypointCandidate};

// ---------------------------------------------------------------------------
// Name patterns
// ---------------------------------------------------------------------------

/// An ordered list of case-insensitive prefab name patterns.
///
/// Blank patterns are dropped on construction, so they never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePatterns {
    lowered: Vec<String>,
}

impl NamePatterns {
    /// Build a pattern list, discarding empty and whitespace-only entries.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lowered = patterns
            .into_iter()
            .filter(|p| !p.as_ref().trim().is_empty())
            .map(|p| p.as_ref().to_lowercase())
            .collect();
        Self { lowered }
    }

    /// Whether any pattern occurs inside `name`.
    #[must_use]
    pub fn any_contained_in(&self, name: &str) -> bool {
        if self.lowered.is_empty() {
            return false;
        }
        let name = name.to_lowercase();
        self.lowered.iter().any(|p| name.contains(p.as_str()))
    }

    /// Whether any pattern equals `name`.
    #[must_use]
    pub fn any_equal_to(&self, name: &str) -> bool {
        if self.lowered.is_empty() {
            return false;
        }
        let name = name.to_lowercase();
        self.lowered.iter().any(|p| *p == name)
    }

    /// Number of usable patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lowered.len()
    }

    /// Whether there are no usable patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lowered.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Filter rules
// ---------------------------------------------------------------------------

/// Compiled eligibility rules. The default constrains nothing.
#[derive(Debug, Clone, Default)]
pub struct FilterRules {
    /// Categories that are never visited.
    pub disallowed_categories: BTreeSet<MonumentCategory>,
    /// Monuments in any of these tiers are never visited.
    pub disallowed_tiers: MonumentTier,
    /// Whether safe-zone monuments are excluded.
    pub disallow_safe_zones: bool,
    /// Reject when any of these occurs inside the name.
    pub disallowed_name_partial: NamePatterns,
    /// Reject when any of these equals the name.
    pub disallowed_name_exact: NamePatterns,
    /// Accept, skipping every later rule, when any of these occurs inside the name.
    pub force_allowed_name_partial: NamePatterns,
    /// Accept, skipping every later rule, when any of these equals the name.
    pub force_allowed_name_exact: NamePatterns,
}

/// Which rule decided a candidate's eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Rejected: safe zone while safe zones are disallowed.
    SafeZone,
    /// Accepted by a force-allow name pattern.
    ForceAllowed,
    /// Rejected by a disallowed name pattern.
    DisallowedName,
    /// Rejected by a disallowed tier.
    DisallowedTier,
    /// Rejected by a disallowed category.
    DisallowedCategory,
    /// No rule matched.
    Allowed,
}

impl FilterDecision {
    /// Whether the candidate may be visited.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::ForceAllowed | Self::Allowed)
    }
}

impl FilterRules {
    /// Compile rules from configuration, logging and skipping unknown
    /// category and tier names.
    #[must_use]
    pub fn from_config(config: &PatrolConfig) -> Self {
        let (rules, invalid) = Self::compile(config);
        for err in &invalid {
            error!("{err}");
        }
        rules
    }

    /// Compile rules from configuration, returning every name that could
    /// not be resolved alongside the rules built from the rest.
    #[must_use]
    pub fn compile(config: &PatrolConfig) -> (Self, Vec<PatrolError>) {
        let mut invalid = Vec::new();

        let mut disallowed_categories = BTreeSet::new();
        for name in &config.disallowed_monument_types {
            match name.parse::<MonumentCategory>() {
                Ok(category) => {
                    disallowed_categories.insert(category);
                }
                Err(err) => invalid.push(err),
            }
        }

        let mut disallowed_tiers = MonumentTier::empty();
        for name in &config.disallowed_monument_tiers {
            match MonumentTier::parse_name(name) {
                Ok(tier) => disallowed_tiers |= tier,
                Err(err) => invalid.push(err),
            }
        }

        let rules = Self {
            disallowed_categories,
            disallowed_tiers,
            disallow_safe_zones: config.disallow_safe_zone_monuments,
            disallowed_name_partial: NamePatterns::new(&config.disallowed_prefabs_partial),
            disallowed_name_exact: NamePatterns::new(&config.disallowed_prefabs_exact),
            force_allowed_name_partial: NamePatterns::new(&config.force_allowed_prefabs_partial),
            force_allowed_name_exact: NamePatterns::new(&config.force_allowed_prefabs_exact),
        };

        (rules, invalid)
    }

    /// Run every rule against `candidate` and report which one decided.
    #[must_use]
    pub fn evaluate(&self, candidate: &WaypointCandidate) -> FilterDecision {
        if self.disallow_safe_zones && candidate.is_safe_zone {
            return FilterDecision::SafeZone;
        }

        let name = candidate.effective_name();

        if self.force_allowed_name_partial.any_contained_in(name)
            || self.force_allowed_name_exact.any_equal_to(name)
        {
            return FilterDecision::ForceAllowed;
        }

        if self.disallowed_name_partial.any_contained_in(name)
            || self.disallowed_name_exact.any_equal_to(name)
        {
            return FilterDecision::DisallowedName;
        }

        if self.disallowed_tiers.intersects(candidate.tiers) {
            return FilterDecision::DisallowedTier;
        }

        if self.disallowed_categories.contains(&candidate.category) {
            return FilterDecision::DisallowedCategory;
        }

        FilterDecision::Allowed
    }

    /// Whether `candidate` may be visited.
    #[must_use]
    pub fn is_eligible(&self, candidate: &WaypointCandidate) -> bool {
        self.evaluate(candidate).is_allowed()
    }
}
