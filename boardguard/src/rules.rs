//! Design Rule Set
//!
//! A flat table of numeric manufacturing limits, addressable by camelCase
//! key so that rule tables coming from UI or import code can be applied
//! without a compile-time dependency on this struct's field names.
//!
//! All lengths are millimeters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::BoardGuardError;

/// Built-in rule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePreset {
    Conservative,
    Standard,
    Aggressive,
}

impl RulePreset {
    pub const ALL: [RulePreset; 3] = [
        RulePreset::Conservative,
        RulePreset::Standard,
        RulePreset::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RulePreset::Conservative => "conservative",
            RulePreset::Standard => "standard",
            RulePreset::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RulePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RulePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RulePreset::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown rule preset '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignRules {
    pub min_trace_width: f64,
    pub max_trace_width: f64,
    pub min_trace_length: f64,
    /// Generic copper-to-copper clearance
    pub min_clearance: f64,
    /// Clearance when either object is a via
    pub min_via_clearance: f64,
    /// Clearance when either object is a pad (and neither is a via)
    pub min_pad_clearance: f64,
    pub min_via_size: f64,
    pub max_via_size: f64,
    pub min_via_drill: f64,
    pub min_annular_ring: f64,
    pub min_drill_size: f64,
    pub max_drill_size: f64,
    pub min_pad_size: f64,
    pub min_hole_to_hole_spacing: f64,
    pub min_board_edge_clearance: f64,
    pub min_silkscreen_width: f64,
    pub min_solder_mask_clearance: f64,
    pub min_thermal_spoke_width: f64,
    /// Board thickness over drill diameter
    pub max_aspect_ratio: f64,
    pub board_thickness: f64,
}

impl Default for DesignRules {
    fn default() -> Self {
        Self {
            min_trace_width: 0.15,
            max_trace_width: 10.0,
            min_trace_length: 0.01,
            min_clearance: 0.15,
            min_via_clearance: 0.2,
            min_pad_clearance: 0.2,
            min_via_size: 0.25,
            max_via_size: 6.0,
            min_via_drill: 0.15,
            min_annular_ring: 0.05,
            min_drill_size: 0.15,
            max_drill_size: 6.3,
            min_pad_size: 0.2,
            min_hole_to_hole_spacing: 0.25,
            min_board_edge_clearance: 0.3,
            min_silkscreen_width: 0.15,
            min_solder_mask_clearance: 0.05,
            min_thermal_spoke_width: 0.2,
            max_aspect_ratio: 10.0,
            board_thickness: 1.6,
        }
    }
}

/// Declares the key table once and derives [`RULE_KEYS`], the mutable
/// slot lookup and [`DesignRules::get_rule`] from it
macro_rules! rule_table {
    ($($key:literal => $field:ident),* $(,)?) => {
        /// Every key accepted by [`DesignRules::get_rule`] / [`DesignRules::set_rule`]
        pub const RULE_KEYS: &[&str] = &[$($key),*];

        impl DesignRules {
            fn slot(&mut self, key: &str) -> Option<&mut f64> {
                match key {
                    $($key => Some(&mut self.$field),)*
                    _ => None,
                }
            }

            pub fn get_rule(&self, key: &str) -> Option<f64> {
                match key {
                    $($key => Some(self.$field),)*
                    _ => None,
                }
            }
        }
    };
}

rule_table! {
    "minTraceWidth" => min_trace_width,
    "maxTraceWidth" => max_trace_width,
    "minTraceLength" => min_trace_length,
    "minClearance" => min_clearance,
    "minViaClearance" => min_via_clearance,
    "minPadClearance" => min_pad_clearance,
    "minViaSize" => min_via_size,
    "maxViaSize" => max_via_size,
    "minViaDrill" => min_via_drill,
    "minAnnularRing" => min_annular_ring,
    "minDrillSize" => min_drill_size,
    "maxDrillSize" => max_drill_size,
    "minPadSize" => min_pad_size,
    "minHoleToHoleSpacing" => min_hole_to_hole_spacing,
    "minBoardEdgeClearance" => min_board_edge_clearance,
    "minSilkscreenWidth" => min_silkscreen_width,
    "minSolderMaskClearance" => min_solder_mask_clearance,
    "minThermalSpokeWidth" => min_thermal_spoke_width,
    "maxAspectRatio" => max_aspect_ratio,
    "boardThickness" => board_thickness,
}

impl DesignRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preset(preset: RulePreset) -> Self {
        let mut rules = Self::default();
        rules.apply_preset(preset);
        rules
    }

    /// Overwrite the preset-controlled subset of rules
    pub fn apply_preset(&mut self, preset: RulePreset) {
        let values: &[(&str, f64)] = match preset {
            RulePreset::Conservative => &[
                ("minTraceWidth", 0.25),
                ("minClearance", 0.25),
                ("minViaClearance", 0.3),
                ("minPadClearance", 0.3),
                ("minViaSize", 0.6),
                ("minViaDrill", 0.3),
                ("minAnnularRing", 0.15),
                ("minDrillSize", 0.3),
            ],
            RulePreset::Standard => &[
                ("minTraceWidth", 0.15),
                ("minClearance", 0.15),
                ("minViaClearance", 0.2),
                ("minPadClearance", 0.2),
                ("minViaSize", 0.25),
                ("minViaDrill", 0.15),
                ("minAnnularRing", 0.05),
                ("minDrillSize", 0.15),
            ],
            RulePreset::Aggressive => &[
                ("minTraceWidth", 0.09),
                ("minClearance", 0.09),
                ("minViaClearance", 0.1),
                ("minPadClearance", 0.1),
                ("minViaSize", 0.2),
                ("minViaDrill", 0.1),
                ("minAnnularRing", 0.03),
                ("minDrillSize", 0.1),
            ],
        };
        for (key, value) in values {
            self.set_rule(key, *value);
        }
        tracing::debug!("Applied {} design rule preset", preset);
    }

    /// Set a rule by key. Unknown keys are logged and ignored.
    pub fn set_rule(&mut self, key: &str, value: f64) -> bool {
        match self.slot(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                tracing::warn!("Ignoring unknown design rule '{}' (value {})", key, value);
                false
            }
        }
    }

    /// All rules as (key, value) pairs in a stable order
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        RULE_KEYS
            .iter()
            .filter_map(|key| self.get_rule(key).map(|v| (*key, v)))
            .collect()
    }

    /// Load a rule table from JSON. Keys that are absent keep their
    /// standard defaults; unknown keys are logged and ignored.
    pub fn from_json_str(json: &str) -> Result<Self, BoardGuardError> {
        let parse_err = |e: serde_json::Error| {
            BoardGuardError::Parse(format!("Failed to parse rules JSON: {}", e))
        };

        let value: Value = serde_json::from_str(json).map_err(parse_err)?;
        let Some(table) = value.as_object() else {
            return Err(BoardGuardError::Parse(
                "Rules JSON must be an object of rule keys".to_string(),
            ));
        };
        for key in table.keys().filter(|k| !RULE_KEYS.contains(&k.as_str())) {
            tracing::warn!("Ignoring unknown design rule '{}' in rules file", key);
        }

        serde_json::from_value(value).map_err(parse_err)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, BoardGuardError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
