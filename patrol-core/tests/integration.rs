//! Integration Tests: End-to-End Patrol Flows
//!
//! Configuration → filter → eligible set → per-agent paths → cursor.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use patrol_core::PathFinder;
use patrol_core::config::{ConfigStore, PatrolConfig};
use patrol_core::eligible::build_eligible_set;
use patrol_core::filter::FilterRules;
use patrol_core::path::PatrolPath;
use patrol_core::types::{DropZone, Location, MonumentCategory, MonumentTier, WaypointCandidate};

fn at(x: f32, z: f32) -> Location {
    Location::new(x, 20.0, z)
}

fn spread_map(count: usize) -> Vec<WaypointCandidate> {
    (0..count)
        .map(|i| {
            let position = at(i as f32 * 400.0, 0.0);
            WaypointCandidate::new(format!("monument_{i}"), MonumentCategory::Radtown, position)
                .with_tiers(MonumentTier::TIER1)
        })
        .collect()
}

/// Sequence order as indices into the original map, for comparing shuffles.
fn ordering(path: &PatrolPath, map: &[WaypointCandidate]) -> Vec<usize> {
    path.sequence()
        .iter()
        .map(|p| map.iter().position(|c| c.position == *p).expect("point comes from map"))
        .collect()
}

// ---------------------------------------------------------------------------
// Scenario A: category, tier and safe-zone rules combine
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_only_plain_monument_survives() {
    let candidates = vec![
        WaypointCandidate::new("cave_medium_hard", MonumentCategory::Cave, at(0.0, 0.0)),
        WaypointCandidate::new("compound", MonumentCategory::Town, at(1000.0, 0.0))
            .with_tiers(MonumentTier::TIER0)
            .with_safe_zone(true),
        WaypointCandidate::new("powerplant_1", MonumentCategory::Radtown, at(2000.0, 0.0))
            .with_tiers(MonumentTier::TIER2),
    ];
    let config = PatrolConfig {
        disallowed_monument_types: vec!["cave".to_string()],
        disallowed_monument_tiers: vec!["tier0".to_string()],
        ..PatrolConfig::default()
    };

    let rules = FilterRules::from_config(&config);
    let (set, report) = build_eligible_set(&candidates, &rules, &[]);

    assert_eq!(set.points(), &[candidates[2].position]);
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].name, "powerplant_1");
}

#[test]
fn scenario_a_tier_rule_alone_excludes_safe_zone_town() {
    let town = WaypointCandidate::new("compound", MonumentCategory::Town, at(0.0, 0.0))
        .with_tiers(MonumentTier::TIER0)
        .with_safe_zone(true);
    let config = PatrolConfig {
        disallow_safe_zone_monuments: false,
        disallowed_monument_types: Vec::new(),
        disallowed_monument_tiers: vec!["Tier0".to_string()],
        ..PatrolConfig::default()
    };

    let (set, _) = build_eligible_set([&town], &FilterRules::from_config(&config), &[]);
    assert!(set.is_empty());
}

// ---------------------------------------------------------------------------
// Scenario B: two monuments 50 units apart collapse to one waypoint
// ---------------------------------------------------------------------------

#[test]
fn scenario_b_close_pair_collapses() {
    let x = WaypointCandidate::new("harbor_1", MonumentCategory::Building, at(0.0, 0.0));
    let y = WaypointCandidate::new("harbor_2", MonumentCategory::Building, at(30.0, 40.0));
    let (set, _) = build_eligible_set([&x, &y], &FilterRules::default(), &[]);
    assert_eq!(set.len(), 2);

    for seed in 0..50 {
        let mut path = PatrolPath::generate(&set, &mut StdRng::seed_from_u64(seed));
        assert_eq!(path.len(), 1);
        let only = path.next_waypoint();
        assert!(only == x.position || only == y.position);
        assert_eq!(path.next_waypoint(), only);
    }
}

#[test]
fn scenario_b_either_point_can_survive() {
    let set = patrol_core::EligibleWaypointSet::from_points(vec![at(0.0, 0.0), at(30.0, 40.0)]);
    let survivors: HashSet<(i32, i32)> = (0..200)
        .map(|seed| {
            let path = PatrolPath::generate(&set, &mut StdRng::seed_from_u64(seed));
            let p = path.sequence()[0];
            (p.x as i32, p.z as i32)
        })
        .collect();
    assert_eq!(survivors.len(), 2);
}

// ---------------------------------------------------------------------------
// Scenario C: agents get independent shuffles
// ---------------------------------------------------------------------------

#[test]
fn scenario_c_sequential_agents_get_independent_paths() {
    let map = spread_map(10);
    let (set, _) = build_eligible_set(&map, &FilterRules::default(), &[]);
    let mut rng = StdRng::seed_from_u64(2024);

    let orderings: Vec<Vec<usize>> = (0..5)
        .map(|_| ordering(&PatrolPath::generate(&set, &mut rng), &map))
        .collect();

    for o in &orderings {
        assert_eq!(o.len(), 10);
    }
    let distinct: HashSet<&Vec<usize>> = orderings.iter().collect();
    assert!(distinct.len() > 1, "five agents all received the same ordering");
}

#[test]
fn scenario_c_orderings_vary_across_seeds() {
    let map = spread_map(6);
    let (set, _) = build_eligible_set(&map, &FilterRules::default(), &[]);

    let mut first_stops = [0usize; 6];
    let mut distinct = HashSet::new();
    for seed in 0..600 {
        let o = ordering(&PatrolPath::generate(&set, &mut StdRng::seed_from_u64(seed)), &map);
        first_stops[o[0]] += 1;
        distinct.insert(o);
    }

    assert!(distinct.len() > 100);
    // Each monument leads roughly 1/6 of the time; allow a wide margin.
    for count in first_stops {
        assert!((50..=150).contains(&count), "skewed first stop count: {count}");
    }
}

// ---------------------------------------------------------------------------
// Drop-zone report
// ---------------------------------------------------------------------------

#[test]
fn drop_zone_report_counts_nearby_zones() {
    let map = spread_map(4);
    let zones = [DropZone::new(at(10.0, 10.0)), DropZone::new(at(1250.0, 0.0))];
    let (_, report) = build_eligible_set(&map, &FilterRules::default(), &zones);

    assert_eq!(report.drop_zone_count(), 2);
    assert!(report.entries[0].has_drop_zone);
    assert!(!report.entries[1].has_drop_zone);
    assert!(!report.entries[2].has_drop_zone);
    assert!(report.entries[3].has_drop_zone);
}

// ---------------------------------------------------------------------------
// Configuration on disk drives the whole pipeline
// ---------------------------------------------------------------------------

#[test]
fn config_file_round_trip_feeds_filter() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("BetterChinookPatrol.json");
    std::fs::write(
        &path,
        r#"{
            "Disallowed monument types": ["Radtown", "NotAType"],
            "Force allow monument prefabs (partial match)": ["monument_3"],
            "Some other plugin setting": { "keep": true }
        }"#,
    )
    .expect("write");

    let store = ConfigStore::new(&path);
    let loaded = store.load();
    assert!(loaded.saved);

    let rules = FilterRules::from_config(&loaded.config);
    let map = spread_map(5);
    let (set, _) = build_eligible_set(&map, &rules, &[]);
    assert_eq!(set.points(), &[map[3].position]);

    // The rewritten document is now complete, so a second load changes nothing.
    let reloaded = store.load();
    assert!(!reloaded.saved);
    assert_eq!(reloaded.config, loaded.config);
    let text = std::fs::read_to_string(&path).expect("read");
    assert!(text.contains("Some other plugin setting"));
}
