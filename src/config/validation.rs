//! Case validation: unknown-key detection with Levenshtein suggestions
//! and completion-table invariant checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree (including `[[completion]]` rows), compare against
//! known field names, and emit warnings with "did you mean?" suggestions.
//! Then proceed with normal serde deserialization. Warnings never break a
//! case.

use crate::types::CompletionInterval;
use std::collections::{BTreeMap, HashSet};

/// Allowed mismatch between one row's end and the next row's start.
pub const CONTIGUITY_TOLERANCE_M: f64 = 1e-6;

/// A non-fatal case warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " - did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Case Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `CaseConfig`.
///
/// Rows of an array of tables are addressed without an index, so every
/// `[[completion]]` row maps onto `completion.<field>`.
pub fn known_case_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        "segment_length",
        "minimum_segment_length",
        "gp_perf_devicelayer",
        // [[completion]]
        "completion",
        "completion.well",
        "completion.branch",
        "completion.start_md",
        "completion.end_md",
        "completion.inner_diameter",
        "completion.outer_diameter",
        "completion.roughness",
        "completion.annulus",
        "completion.valves_per_joint",
        "completion.device_type",
        "completion.device_number",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// Tables inside arrays are walked under the array's own path, and each
/// path is reported once. For example `{ a = [{ b = 1 }, { b = 2, c = 3 }] }`
/// yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            } else if let Some(rows) = v.as_array() {
                for row in rows.iter().filter(|r| r.is_table()) {
                    for key in walk_toml_keys(row, &path) {
                        if !keys.contains(&key) {
                            keys.push(key);
                        }
                    }
                }
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties go to the alphabetically first key so the suggestion is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut candidates: Vec<&str> = known.iter().copied().collect();
    candidates.sort_unstable();

    let mut best: Option<(&str, usize)> = None;
    for k in candidates {
        let dist = levenshtein(unknown, k);
        if dist > 3 {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((k, dist)),
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown case keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_case_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown case key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Completion Table Invariants
// ============================================================================

/// Check the completion-table invariants the engine consumes.
///
/// Returns one message per violation; an empty vector means the table is
/// usable. Rows are grouped per (well, branch) in table order.
pub fn validate_completion_table(rows: &[CompletionInterval]) -> Vec<String> {
    let mut errors = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let label = format!("completion[{idx}] ({} branch {})", row.well, row.branch);
        if row.well.trim().is_empty() {
            errors.push(format!("{label}: well name is empty"));
        }
        if !row.start_md.is_finite() || !row.end_md.is_finite() {
            errors.push(format!("{label}: depths must be finite"));
            continue;
        }
        if row.start_md > row.end_md {
            errors.push(format!(
                "{label}: start_md {} is deeper than end_md {}",
                row.start_md, row.end_md
            ));
        }
        if row.is_packer() && row.length().abs() > CONTIGUITY_TOLERANCE_M {
            errors.push(format!(
                "{label}: packer must have zero length, got {}-{}",
                row.start_md, row.end_md
            ));
        }
        if !row.is_packer() && row.length() <= 0.0 {
            errors.push(format!(
                "{label}: {} interval must have positive length, got {}-{}",
                row.annulus, row.start_md, row.end_md
            ));
        }
        if !row.valves_per_joint.is_finite() || row.valves_per_joint < 0.0 {
            errors.push(format!(
                "{label}: valves_per_joint = {} must be >= 0",
                row.valves_per_joint
            ));
        }
    }

    let mut groups: BTreeMap<(&str, u32), Vec<&CompletionInterval>> = BTreeMap::new();
    for row in rows {
        groups.entry((row.well.as_str(), row.branch)).or_default().push(row);
    }
    for ((well, branch), group) in groups {
        for pair in group.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let gap = next.start_md - prev.end_md;
            if gap.abs() > CONTIGUITY_TOLERANCE_M {
                let kind = if gap > 0.0 { "gap" } else { "overlap" };
                errors.push(format!(
                    "{well} branch {branch}: {kind} between {}-{} and {}-{}",
                    prev.start_md, prev.end_md, next.start_md, next.end_md
                ));
            }
        }
    }

    errors
}

// ============================================================================
// Tests
// ============================================================================
