//! Configuration for patrol planning.
//!
//! Persisted as a pretty-printed JSON document with human-readable keys.
//! On load, the typed configuration (with defaults filled in) is deep-merged
//! back into the raw document so that newly introduced options appear in old
//! files while unrecognized keys survive untouched.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::error::{PatrolError, Result};

/// Top-level patrol configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    /// Version of the plugin that last wrote the document.
    #[serde(rename = "Version")]
    pub version: String,
    /// Lower bound of the crate-drop roll.
    #[serde(rename = "Min crate drops per chinook")]
    pub min_crate_drops_per_chinook: u32,
    /// Upper bound of the crate-drop roll.
    #[serde(rename = "Max crate drops per chinook")]
    pub max_crate_drops_per_chinook: u32,
    /// Exclude monuments inside safe zones.
    #[serde(rename = "Disallow safe zone monuments")]
    pub disallow_safe_zone_monuments: bool,
    /// Category names to exclude (`"Cave"`, `"WaterWell"`, ...).
    #[serde(rename = "Disallowed monument types", deserialize_with = "null_as_empty")]
    pub disallowed_monument_types: Vec<String>,
    /// Tier names to exclude (`"Tier0"`, ...).
    #[serde(rename = "Disallowed monument tiers", deserialize_with = "null_as_empty")]
    pub disallowed_monument_tiers: Vec<String>,
    /// Exclude monuments whose prefab name contains one of these.
    #[serde(
        rename = "Disallowed monument prefabs (partial match)",
        deserialize_with = "null_as_empty"
    )]
    pub disallowed_prefabs_partial: Vec<String>,
    /// Exclude monuments whose prefab name equals one of these.
    #[serde(
        rename = "Disallowed monument prefabs (exact match)",
        deserialize_with = "null_as_empty"
    )]
    pub disallowed_prefabs_exact: Vec<String>,
    /// Always include monuments whose prefab name contains one of these.
    #[serde(
        rename = "Force allow monument prefabs (partial match)",
        deserialize_with = "null_as_empty"
    )]
    pub force_allowed_prefabs_partial: Vec<String>,
    /// Always include monuments whose prefab name equals one of these.
    #[serde(
        rename = "Force allow monument prefabs (exact match)",
        deserialize_with = "null_as_empty"
    )]
    pub force_allowed_prefabs_exact: Vec<String>,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            min_crate_drops_per_chinook: 1,
            max_crate_drops_per_chinook: 1,
            disallow_safe_zone_monuments: true,
            disallowed_monument_types: vec!["Cave".to_string(), "WaterWell".to_string()],
            disallowed_monument_tiers: vec!["Tier0".to_string()],
            disallowed_prefabs_partial: Vec::new(),
            disallowed_prefabs_exact: Vec::new(),
            force_allowed_prefabs_partial: Vec::new(),
            force_allowed_prefabs_exact: Vec::new(),
        }
    }
}

impl PatrolConfig {
    /// Parse configuration from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed, `null`, or not an object.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        Self::from_value(raw)
    }

    /// Build configuration from an already-parsed document.
    ///
    /// # Errors
    /// Returns `PatrolError::Config` if the document is not an object, or a
    /// serialization error if a recognized key has the wrong type.
    pub fn from_value(raw: Value) -> Result<Self> {
        if !raw.is_object() {
            return Err(PatrolError::Config(format!(
                "expected a JSON object, found {}",
                json_kind(&raw)
            )));
        }
        Ok(serde_json::from_value(raw)?)
    }

    /// Serialize to a JSON document tree.
    ///
    /// # Errors
    /// Returns a serialization error (never expected for this type).
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The configured crate-drop range.
    #[must_use]
    pub fn crate_drops(&self) -> CargoDropRange {
        CargoDropRange {
            min: self.min_crate_drops_per_chinook,
            max: self.max_crate_drops_per_chinook,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Crate drops
// ---------------------------------------------------------------------------

/// How many crates an attached chinook drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CargoDropRange {
    /// Inclusive lower bound.
    pub min: u32,
    /// Inclusive upper bound.
    pub max: u32,
}

impl CargoDropRange {
    /// Roll a crate count, or `None` to leave the host default alone.
    ///
    /// Only rolls when both bounds exceed 1. An inverted range is treated as
    /// if its bounds were swapped.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u32> {
        if self.min <= 1 || self.max <= 1 {
            return None;
        }
        let (low, high) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        Some(rng.gen_range(low..=high))
    }
}

// ---------------------------------------------------------------------------
// Deep merge
// ---------------------------------------------------------------------------

/// Add every key of `defaults` missing from `current`, recursing into
/// nested objects. Existing non-object values and unknown keys are kept.
///
/// Returns whether `current` changed.
pub fn deep_merge(defaults: &Value, current: &mut Value) -> bool {
    match (defaults, current) {
        (Value::Object(defaults), Value::Object(current)) => merge_maps(defaults, current),
        (Value::Object(_), current) => {
            *current = defaults.clone();
            true
        }
        _ => false,
    }
}

fn merge_maps(defaults: &Map<String, Value>, current: &mut Map<String, Value>) -> bool {
    let mut changed = false;

    for (key, default_value) in defaults {
        match current.get_mut(key) {
            Some(current_value) => {
                if default_value.is_object() && deep_merge(default_value, current_value) {
                    changed = true;
                }
            }
            None => {
                current.insert(key.clone(), default_value.clone());
                changed = true;
            }
        }
    }

    changed
}

// ---------------------------------------------------------------------------
// On-disk store
// ---------------------------------------------------------------------------

/// Result of loading the configuration document.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The effective configuration.
    pub config: PatrolConfig,
    /// Whether the document on disk was (re)written during the load.
    pub saved: bool,
}

/// A configuration document at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration, never failing.
    ///
    /// - A missing file is created with the defaults.
    /// - An unreadable or malformed file yields the defaults; the broken
    ///   file is left as it is.
    /// - An outdated file gains the missing keys and is saved back. If that
    ///   write fails the parsed configuration is still used.
    #[must_use]
    pub fn load(&self) -> LoadedConfig {
        if !self.path.exists() {
            let config = PatrolConfig::default();
            let saved = match self.write_defaults(&config) {
                Ok(()) => true,
                Err(err) => {
                    error!("{err}");
                    warn!(
                        "Could not create configuration file {}; using defaults",
                        self.path.display()
                    );
                    false
                }
            };
            return LoadedConfig { config, saved };
        }

        let (config, mut raw) = match self.read_document() {
            Ok(parsed) => parsed,
            Err(err) => {
                error!("{err}");
                warn!(
                    "Configuration file {} is invalid; using defaults",
                    self.path.display()
                );
                return LoadedConfig {
                    config: PatrolConfig::default(),
                    saved: false,
                };
            }
        };

        let saved = match self.update_outdated(&config, &mut raw) {
            Ok(saved) => saved,
            Err(err) => {
                error!("{err}");
                warn!(
                    "Could not save updated configuration to {}; continuing with it unsaved",
                    self.path.display()
                );
                false
            }
        };

        LoadedConfig { config, saved }
    }

    /// Load the configuration, reporting what went wrong.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if writing the default or updated document fails.
    pub fn try_load(&self) -> Result<LoadedConfig> {
        if !self.path.exists() {
            let config = PatrolConfig::default();
            self.write_defaults(&config)?;
            return Ok(LoadedConfig { config, saved: true });
        }

        let (config, mut raw) = self.read_document()?;
        let saved = self.update_outdated(&config, &mut raw)?;
        Ok(LoadedConfig { config, saved })
    }

    fn write_defaults(&self, config: &PatrolConfig) -> Result<()> {
        self.save(&config.to_value()?)
    }

    fn read_document(&self) -> Result<(PatrolConfig, Value)> {
        let content = std::fs::read_to_string(&self.path)?;
        let raw: Value = serde_json::from_str(&content)?;
        let config = PatrolConfig::from_value(raw.clone())?;
        Ok((config, raw))
    }

    /// Merge missing defaults into `raw` and save it if anything changed.
    fn update_outdated(&self, config: &PatrolConfig, raw: &mut Value) -> Result<bool> {
        if !deep_merge(&config.to_value()?, raw) {
            return Ok(false);
        }
        warn!("Configuration appears to be outdated; updating and saving");
        self.save(raw)?;
        Ok(true)
    }

    /// Write `document` as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, document: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.path, json)?;
        info!("Configuration changes saved to {}", self.path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    #[test]
    fn defaults_match_stock_behaviour() {
        let config = PatrolConfig::default();
        assert_eq!(config.min_crate_drops_per_chinook, 1);
        assert_eq!(config.max_crate_drops_per_chinook, 1);
        assert!(config.disallow_safe_zone_monuments);
        assert_eq!(config.disallowed_monument_types, vec!["Cave", "WaterWell"]);
        assert_eq!(config.disallowed_monument_tiers, vec!["Tier0"]);
        assert!(config.force_allowed_prefabs_exact.is_empty());
    }

    #[test]
    fn parses_human_readable_keys() {
        let config = PatrolConfig::from_json(
            r#"{
                "Min crate drops per chinook": 2,
                "Max crate drops per chinook": 4,
                "Disallow safe zone monuments": false,
                "Disallowed monument types": ["Lighthouse"],
                "Force allow monument prefabs (exact match)": [
                    "assets/bundled/prefabs/autospawn/monument/small/satellite_dish.prefab"
                ]
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.crate_drops(), CargoDropRange { min: 2, max: 4 });
        assert!(!config.disallow_safe_zone_monuments);
        assert_eq!(config.disallowed_monument_types, vec!["Lighthouse"]);
        // Missing keys fall back to defaults.
        assert_eq!(config.disallowed_monument_tiers, vec!["Tier0"]);
        assert_eq!(config.force_allowed_prefabs_exact.len(), 1);
    }

    #[test]
    fn null_lists_are_empty() {
        let config =
            PatrolConfig::from_json(r#"{"Disallowed monument tiers": null}"#).expect("valid");
        assert!(config.disallowed_monument_tiers.is_empty());
    }

    #[test]
    fn null_document_is_rejected() {
        assert!(matches!(PatrolConfig::from_json("null"), Err(PatrolError::Config(_))));
        assert!(matches!(PatrolConfig::from_json("{"), Err(PatrolError::Serialization(_))));
    }

    #[test]
    fn merge_adds_missing_and_keeps_unknown() {
        let defaults = json!({ "a": 1, "b": [1, 2], "nested": { "x": true, "y": "two" } });
        let mut current = json!({ "a": 5, "nested": { "x": false }, "custom": "keep me" });

        assert!(deep_merge(&defaults, &mut current));
        assert_eq!(
            current,
            json!({
                "a": 5,
                "b": [1, 2],
                "nested": { "x": false, "y": "two" },
                "custom": "keep me"
            })
        );
    }

    #[test]
    fn merge_replaces_non_object_where_object_expected() {
        let defaults = json!({ "nested": { "x": 1 } });
        let mut current = json!({ "nested": 7 });
        assert!(deep_merge(&defaults, &mut current));
        assert_eq!(current, json!({ "nested": { "x": 1 } }));
    }

    #[test]
    fn merge_against_self_is_unchanged() {
        let value = PatrolConfig::default().to_value().expect("serializable");
        let mut copy = value.clone();
        assert!(!deep_merge(&value, &mut copy));
        assert_eq!(copy, value);
    }

    #[test]
    fn roll_requires_both_bounds_above_one() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(CargoDropRange { min: 1, max: 5 }.roll(&mut rng), None);
        assert_eq!(CargoDropRange { min: 4, max: 1 }.roll(&mut rng), None);
        assert_eq!(CargoDropRange { min: 3, max: 3 }.roll(&mut rng), Some(3));

        for _ in 0..200 {
            let n = CargoDropRange { min: 2, max: 4 }.roll(&mut rng).expect("rolls");
            assert!((2..=4).contains(&n));
            let n = CargoDropRange { min: 6, max: 2 }.roll(&mut rng).expect("rolls");
            assert!((2..=6).contains(&n));
        }
    }

    #[test]
    fn store_creates_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("config").join("BetterChinookPatrol.json"));

        let loaded = store.load();
        assert!(loaded.saved);
        assert_eq!(loaded.config, PatrolConfig::default());
        assert!(store.path().exists());

        let again = store.load();
        assert!(!again.saved);
    }

    #[test]
    fn store_uses_defaults_when_missing_file_cannot_be_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "").expect("write");
        let store = ConfigStore::new(blocker.join("BetterChinookPatrol.json"));

        assert!(matches!(store.try_load(), Err(PatrolError::Io(_))));
        let loaded = store.load();
        assert!(!loaded.saved);
        assert_eq!(loaded.config, PatrolConfig::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn store_falls_back_on_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write");

        let loaded = ConfigStore::new(&path).load();
        assert!(!loaded.saved);
        assert_eq!(loaded.config, PatrolConfig::default());
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "{ not json");
    }

    #[test]
    fn store_updates_outdated_file_preserving_unknown_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("old.json");
        std::fs::write(
            &path,
            r#"{ "Min crate drops per chinook": 2, "Legacy option": 42 }"#,
        )
        .expect("write");

        let loaded = ConfigStore::new(&path).load();
        assert!(loaded.saved);
        assert_eq!(loaded.config.min_crate_drops_per_chinook, 2);

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(written["Legacy option"], json!(42));
        assert_eq!(written["Min crate drops per chinook"], json!(2));
        assert_eq!(written["Disallowed monument tiers"], json!(["Tier0"]));
    }
}
