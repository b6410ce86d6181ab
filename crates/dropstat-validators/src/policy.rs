//! Validation policy: thresholds and the chain order
//!
//! Rule bodies are policy and are expected to change; everything tunable
//! about them lives here so it can be shipped as YAML.

use dropstat_core::ValidatorKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationPolicy {
    /// Profile name (e.g. "standard@1.0")
    pub name: String,

    /// Execution order of the chain
    pub order: Vec<ValidatorKind>,

    // === Stage time ===

    /// Grace period around stage open/close times (ms)
    pub stage_time_tolerance_ms: i64,

    // === Rates (per activity window) ===

    /// Reports an identity may already have stored inside the window
    pub max_reports_per_user: usize,

    /// Reports an IP may already have stored inside the window
    pub max_reports_per_ip: usize,

    pub blocked_users: Vec<String>,

    pub blocked_ips: Vec<String>,

    // === Drops ===

    /// Distinct items a single report may contain
    pub max_item_kinds: usize,

    /// Per-item cap, used only for stages without a drop table
    pub max_quantity_per_item: u32,
}

impl ValidationPolicy {
    pub fn standard() -> Self {
        Self {
            name: "standard@1.0".to_string(),
            order: ValidatorKind::CANONICAL.to_vec(),
            stage_time_tolerance_ms: 10 * 60 * 1000,
            max_reports_per_user: 120,
            max_reports_per_ip: 600,
            blocked_users: Vec::new(),
            blocked_ips: Vec::new(),
            max_item_kinds: 20,
            max_quantity_per_item: 99,
        }
    }

    /// Same order, no rate limits or caps worth mentioning
    pub fn permissive() -> Self {
        Self {
            name: "permissive@1.0".to_string(),
            stage_time_tolerance_ms: i64::MAX / 4,
            max_reports_per_user: usize::MAX,
            max_reports_per_ip: usize::MAX,
            max_item_kinds: usize::MAX,
            max_quantity_per_item: u32::MAX,
            ..Self::standard()
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }

    pub fn for_name(name: &str) -> Self {
        match name {
            "permissive" => Self::permissive(),
            _ => Self::standard(),
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
