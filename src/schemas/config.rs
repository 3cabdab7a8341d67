//! Config schema - engine policy knobs

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::types::TaskType;

/// Unix timestamp of the default legacy gate cut-over (2025-01-01T00:00:00Z).
const DEFAULT_CUTOVER_TIMESTAMP: i64 = 1_735_689_600;

/// Main configuration for the validation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Work items created before this instant are exempt from the legacy gate
    /// record requirement
    #[serde(default = "default_legacy_gate_cutover")]
    pub legacy_gate_cutover: DateTime<Utc>,

    /// Minimum share of children that must be done (not merely cancelled or
    /// archived) before the parent completes
    #[serde(default = "default_completion_threshold_percent")]
    pub completion_threshold_percent: u32,

    /// Minimum description length for the documentation check
    #[serde(default = "default_min_description_length")]
    pub min_description_length: usize,

    /// Minimum context confidence score for starting a task
    #[serde(default = "default_context_confidence_threshold")]
    pub context_confidence_threshold: f64,

    /// Minimum coverage percentage for testing tasks entering review
    #[serde(default = "default_min_test_coverage")]
    pub min_test_coverage: f64,

    /// Replacements for the built-in time-box limits
    #[serde(default)]
    pub time_box_hours: HashMap<TaskType, f64>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_legacy_gate_cutover() -> DateTime<Utc> {
    Utc.timestamp_opt(DEFAULT_CUTOVER_TIMESTAMP, 0)
        .single()
        .unwrap_or_default()
}

fn default_completion_threshold_percent() -> u32 {
    80
}

fn default_min_description_length() -> usize {
    50
}

fn default_context_confidence_threshold() -> f64 {
    0.7
}

fn default_min_test_coverage() -> f64 {
    80.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            schema_version: default_schema_version(),
            legacy_gate_cutover: default_legacy_gate_cutover(),
            completion_threshold_percent: default_completion_threshold_percent(),
            min_description_length: default_min_description_length(),
            context_confidence_threshold: default_context_confidence_threshold(),
            min_test_coverage: default_min_test_coverage(),
            time_box_hours: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Check values that serde cannot constrain
    pub fn validate(&self) -> Result<(), String> {
        if self.completion_threshold_percent > 100 {
            return Err(format!(
                "completion_threshold_percent must be at most 100, got {}",
                self.completion_threshold_percent
            ));
        }
        if !(0.0..=1.0).contains(&self.context_confidence_threshold) {
            return Err(format!(
                "context_confidence_threshold must be between 0 and 1, got {}",
                self.context_confidence_threshold
            ));
        }
        if let Some((task_type, hours)) = self.time_box_hours.iter().find(|(_, h)| **h <= 0.0) {
            return Err(format!(
                "time_box_hours for {} must be positive, got {}",
                task_type, hours
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.completion_threshold_percent, 80);
        assert_eq!(config.min_description_length, 50);
        assert_eq!(config.legacy_gate_cutover.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert!(config.time_box_hours.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{"completion_threshold_percent": 90, "time_box_hours": {"implementation": 6}}"#;
        let parsed: EngineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.completion_threshold_percent, 90);
        assert_eq!(parsed.time_box_hours.get(&TaskType::Implementation), Some(&6.0));
        // Other fields should have defaults
        assert_eq!(parsed.min_description_length, 50);
        assert_eq!(parsed.context_confidence_threshold, 0.7);
    }

    #[test]
    fn test_config_validate_rejects_out_of_range() {
        let config = EngineConfig {
            completion_threshold_percent: 120,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.time_box_hours.insert(TaskType::Design, 0.0);
        assert!(config.validate().unwrap_err().contains("design"));
    }
}
