//! Segmentation method resolution
//!
//! | Input                                  | Method  |
//! |----------------------------------------|---------|
//! | number > 0                             | FIX     |
//! | number = 0                             | CELLS   |
//! | number < 0                             | USER    |
//! | text containing "welsegs" or "infill"  | WELSEGS |
//! | text containing "cell"                 | CELLS   |
//! | text containing "user"                 | USER    |

use super::error::CompletionError;
use crate::config::SegmentLength;
use serde::{Deserialize, Serialize};

/// How tubing segment boundaries are generated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SegmentMethod {
    /// One segment per grid cell
    Cells,
    /// Fixed-length segments of the given length (m)
    Fix(f64),
    /// Boundaries from the completion table
    User,
    /// Boundaries from the simulator's WELSEGS topology
    Welsegs,
}

impl std::fmt::Display for SegmentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentMethod::Cells => write!(f, "CELLS"),
            SegmentMethod::Fix(length) => write!(f, "FIX({length})"),
            SegmentMethod::User => write!(f, "USER"),
            SegmentMethod::Welsegs => write!(f, "WELSEGS"),
        }
    }
}

/// Resolve the case's segment length value into a segmentation method.
pub fn resolve_method(value: &SegmentLength) -> Result<SegmentMethod, CompletionError> {
    match value {
        SegmentLength::Length(length) if length.is_nan() => Err(CompletionError::Configuration {
            value: value.to_string(),
        }),
        SegmentLength::Length(length) if *length > 0.0 => Ok(SegmentMethod::Fix(*length)),
        SegmentLength::Length(length) if *length == 0.0 => Ok(SegmentMethod::Cells),
        SegmentLength::Length(_) => Ok(SegmentMethod::User),
        SegmentLength::Keyword(text) => {
            let lower = text.to_lowercase();
            if lower.contains("welsegs") || lower.contains("infill") {
                Ok(SegmentMethod::Welsegs)
            } else if lower.contains("cell") {
                Ok(SegmentMethod::Cells)
            } else if lower.contains("user") {
                Ok(SegmentMethod::User)
            } else {
                Err(CompletionError::Configuration { value: text.clone() })
            }
        }
    }
}
