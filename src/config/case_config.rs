//! Case Configuration - the completion table plus case-wide switches
//!
//! The case file is TOML. The completion table arrives already typed as
//! `[[completion]]` rows; everything here is about loading and checking the
//! invariants the well-construction engine relies on.

use crate::types::CompletionInterval;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// Segment Length
// ============================================================================

/// Raw SEGMENTLENGTH value: either a number or a keyword-like string.
///
/// Resolution into a segmentation method happens in
/// `engine::method::resolve_method`, not at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentLength {
    Length(f64),
    Keyword(String),
}

impl Default for SegmentLength {
    fn default() -> Self {
        SegmentLength::Length(0.0)
    }
}

impl std::fmt::Display for SegmentLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentLength::Length(v) => write!(f, "{v}"),
            SegmentLength::Keyword(s) => write!(f, "{s}"),
        }
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one completion case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Segmentation method selector
    #[serde(default)]
    pub segment_length: SegmentLength,

    /// Lump consecutive cells until this length is reached (CELLS only)
    #[serde(default)]
    pub minimum_segment_length: f64,

    /// Keep gravel-packed, perforated-only wells in the run
    #[serde(default)]
    pub gp_perf_devicelayer: bool,

    /// The completion table, all wells
    #[serde(default)]
    pub completion: Vec<CompletionInterval>,
}

impl CaseConfig {
    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&contents, path)?;
        info!(
            path = %path.display(),
            rows = config.completion.len(),
            "Loaded completion case"
        );
        Ok(config)
    }

    /// Parse and validate TOML text. `origin` is only used for error messages.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        // Two-pass: unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(origin.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate case-wide values and the completion table invariants.
    ///
    /// Rules:
    /// - minimum segment length must be finite and >= 0
    /// - completion rows per (well, branch) are depth ordered and contiguous
    /// - packer rows are zero length, all other rows have positive length
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if !self.minimum_segment_length.is_finite() || self.minimum_segment_length < 0.0 {
            errors.push(format!(
                "minimum_segment_length = {} must be a finite value >= 0",
                self.minimum_segment_length
            ));
        }

        errors.extend(super::validation::validate_completion_table(&self.completion));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Completion rows for one well and lateral, in table order.
    pub fn get_completion(&self, well: &str, lateral: u32) -> Vec<CompletionInterval> {
        self.completion
            .iter()
            .filter(|row| row.well == well && row.branch == lateral)
            .cloned()
            .collect()
    }

    /// Lateral numbers present for a well, ascending.
    pub fn laterals(&self, well: &str) -> Vec<u32> {
        let mut laterals: Vec<u32> = self
            .completion
            .iter()
            .filter(|row| row.well == well)
            .map(|row| row.branch)
            .collect();
        laterals.sort_unstable();
        laterals.dedup();
        laterals
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Case I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Case parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Case serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Case validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnnulusType, DeviceType};

    const CASE: &str = r#"
segment_length = "cells"
gp_perf_devicelayer = true

[[completion]]
well = "A1"
branch = 1
start_md = 0.0
end_md = 500.0
inner_diameter = 0.15
outer_diameter = 0.22
annulus = "OA"
valves_per_joint = 1.0
device_type = "AICD"
device_number = 1

[[completion]]
well = "A1"
branch = 1
start_md = 500.0
end_md = 500.0
inner_diameter = 0.0
outer_diameter = 0.0
annulus = "PA"

[[completion]]
well = "A1"
branch = 1
start_md = 500.0
end_md = 900.0
inner_diameter = 0.15
outer_diameter = 0.22
annulus = "GP"
"#;

    #[test]
    fn test_parse_case() {
        let config = CaseConfig::from_toml_str(CASE, Path::new("case.toml")).unwrap();
        assert_eq!(config.segment_length, SegmentLength::Keyword("cells".to_string()));
        assert!(config.gp_perf_devicelayer);
        assert_eq!(config.completion.len(), 3);
        assert_eq!(config.completion[0].device_type, DeviceType::Aicd);
        assert_eq!(config.completion[1].annulus, AnnulusType::Packer);
        assert_eq!(config.completion[2].device_type, DeviceType::Perf);
        assert!((config.completion[2].roughness - 1e-5).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_segment_length_accepts_integer() {
        let config =
            CaseConfig::from_toml_str("segment_length = -1", Path::new("case.toml")).unwrap();
        assert_eq!(config.segment_length, SegmentLength::Length(-1.0));
    }

    #[test]
    fn test_laterals_sorted_unique() {
        let mut config = CaseConfig::from_toml_str(CASE, Path::new("case.toml")).unwrap();
        let mut lateral = config.completion[0].clone();
        lateral.branch = 3;
        config.completion.insert(0, lateral);
        assert_eq!(config.laterals("A1"), vec![1, 3]);
        assert!(config.laterals("B2").is_empty());
        assert_eq!(config.get_completion("A1", 1).len(), 3);
    }

    #[test]
    fn test_negative_minimum_segment_length_rejected() {
        let err = CaseConfig::from_toml_str("minimum_segment_length = -2.0", Path::new("c.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_to_toml_round_trip_keeps_method() {
        let config = CaseConfig::from_toml_str(CASE, Path::new("case.toml")).unwrap();
        let text = config.to_toml().unwrap();
        let again = CaseConfig::from_toml_str(&text, Path::new("case.toml")).unwrap();
        assert_eq!(again.segment_length, config.segment_length);
        assert_eq!(again.completion, config.completion);
    }
}
