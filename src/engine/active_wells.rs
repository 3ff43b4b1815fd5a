//! Active well selection
//!
//! Gravel-packed wells that are only perforated get no device layer, so
//! the engine leaves them alone unless `gp_perf_devicelayer` is set.

use crate::types::{AnnulusType, CompletionInterval};
use serde::{Deserialize, Serialize};

/// Non-fatal condition reported alongside an engine result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Every well was filtered out
    NoActiveWells,
    /// COMPSEGS cells without a COMPDAT match were dropped by the join
    DroppedCells { well: String, lateral: u32, count: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::NoActiveWells => write!(
                f,
                "There are no active wells to work on, e.g. all wells are gravel packed (GP) \
                 with device type PERF. Set gp_perf_devicelayer = true to activate them."
            ),
            Diagnostic::DroppedCells { well, lateral, count } => write!(
                f,
                "Well {well} lateral {lateral}: {count} COMPSEGS cells have no COMPDAT entry and were dropped"
            ),
        }
    }
}

/// Wells the engine will process, in first-encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveWells {
    pub wells: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ActiveWells {
    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }
}

/// True when a well is gravel packed everywhere and carries no active device.
fn is_gravel_pack_perforated(rows: &[&CompletionInterval]) -> bool {
    let all_gravel_pack = rows.iter().all(|r| r.annulus == AnnulusType::GravelPack);
    let any_device = rows.iter().any(|r| r.device_type.is_active());
    all_gravel_pack && !any_device
}

/// Decide which wells of the completion table must be processed.
pub fn active_wells(table: &[CompletionInterval], gp_perf_devicelayer: bool) -> ActiveWells {
    let mut names: Vec<&str> = Vec::new();
    for row in table {
        if !names.contains(&row.well.as_str()) {
            names.push(&row.well);
        }
    }

    let wells: Vec<String> = names
        .into_iter()
        .filter(|name| {
            let rows: Vec<&CompletionInterval> = table.iter().filter(|r| r.well == *name).collect();
            gp_perf_devicelayer || !is_gravel_pack_perforated(&rows)
        })
        .map(str::to_string)
        .collect();

    let diagnostics = if wells.is_empty() {
        vec![Diagnostic::NoActiveWells]
    } else {
        Vec::new()
    };
    ActiveWells { wells, diagnostics }
}
