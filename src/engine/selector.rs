//! Well data selection: the per-lateral slice of case and schedule data
//!
//! COMPSEGS rows are inner-joined with COMPDAT rows on (I, J, K). When the
//! same cell shows up more than once the last occurrence wins, as it does
//! in the simulator.

use super::error::CompletionError;
use crate::config::CaseConfig;
use crate::schedule::{ScheduleProvider, Topology};
use crate::types::{CellIndex, CompdatRecord, CompletionInterval, CompsegsRecord, GridConnection};
use std::collections::HashSet;
use tracing::{debug, warn};

/// The well a processing pass works on.
///
/// Built once per well by the engine and passed by reference to every
/// stage; stages never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WellContext {
    well_name: Option<String>,
}

impl WellContext {
    pub fn new(well_name: impl Into<String>) -> Self {
        Self {
            well_name: Some(well_name.into()),
        }
    }

    /// The well name, or `MissingWell` when no well has been set.
    pub fn well_name(&self) -> Result<&str, CompletionError> {
        self.well_name.as_deref().ok_or(CompletionError::MissingWell)
    }
}

/// Everything the later stages need for one lateral
#[derive(Debug, Clone)]
pub struct WellSelection {
    pub well: String,
    pub lateral: u32,
    /// Completion rows of this lateral, depth ordered
    pub completion: Vec<CompletionInterval>,
    /// WELSEGS header and this branch's records, if the well has WELSEGS
    pub topology: Option<Topology>,
    /// Joined and de-duplicated grid connections
    pub reservoir: Vec<GridConnection>,
    /// COMPSEGS rows dropped by the join
    pub dropped_cells: usize,
}

/// Gather completion rows, topology and grid connections for one lateral.
pub fn select_well<S: ScheduleProvider + ?Sized>(
    ctx: &WellContext,
    case: &CaseConfig,
    schedule: &S,
    lateral: u32,
) -> Result<WellSelection, CompletionError> {
    let well = ctx.well_name()?;

    let mut completion = case.get_completion(well, lateral);
    if completion.is_empty() {
        return Err(CompletionError::InvalidCompletion {
            well: well.to_string(),
            lateral,
            reason: "no completion rows for this lateral".to_string(),
        });
    }
    completion.sort_by(|a, b| a.start_md.total_cmp(&b.start_md).then(a.end_md.total_cmp(&b.end_md)));

    let topology = schedule.get_welsegs(well, lateral)?;
    let compsegs = schedule.get_compsegs(well, lateral);
    let compdat = schedule.get_compdat(well);
    let (joined, dropped_cells) = join_cells(&compsegs, &compdat);
    if dropped_cells > 0 {
        warn!(
            well,
            lateral,
            dropped = dropped_cells,
            "COMPSEGS cells without COMPDAT entry dropped"
        );
    }
    let reservoir = keep_last_per_cell(joined);

    debug!(
        well,
        lateral,
        completion_rows = completion.len(),
        cells = reservoir.len(),
        has_topology = topology.is_some(),
        "Selected well data"
    );

    Ok(WellSelection {
        well: well.to_string(),
        lateral,
        completion,
        topology,
        reservoir,
        dropped_cells,
    })
}

/// Inner join on (I, J, K). Returns the joined rows and the number of
/// COMPSEGS rows without a match.
pub fn join_cells(compsegs: &[CompsegsRecord], compdat: &[CompdatRecord]) -> (Vec<GridConnection>, usize) {
    let mut joined = Vec::with_capacity(compsegs.len());
    let mut dropped = 0;
    for cell in compsegs {
        let before = joined.len();
        joined.extend(
            compdat
                .iter()
                .filter(|c| c.cell() == cell.cell())
                .map(|c| GridConnection::join(cell, c)),
        );
        if joined.len() == before {
            dropped += 1;
        }
    }
    (joined, dropped)
}

/// Drop repeated cell indices, keeping the last occurrence in its position.
pub fn keep_last_per_cell(rows: Vec<GridConnection>) -> Vec<GridConnection> {
    let mut seen: HashSet<CellIndex> = HashSet::with_capacity(rows.len());
    let mut kept: Vec<GridConnection> = rows
        .into_iter()
        .rev()
        .filter(|row| seen.insert(row.cell()))
        .collect();
    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{WellSchedule, WellTables};
    use crate::types::{AnnulusType, DeviceType};

    fn compsegs(i: u32, start: f64, end: f64) -> CompsegsRecord {
        CompsegsRecord {
            i,
            j: 1,
            k: 1,
            branch: 1,
            start_md: start,
            end_md: end,
            direction: None,
            end_grid: None,
            perf_depth: None,
            therm: None,
            segment: None,
        }
    }

    fn compdat(i: u32, skin: f64) -> CompdatRecord {
        CompdatRecord {
            i,
            j: 1,
            k: 1,
            k2: Some(1),
            status: "OPEN".to_string(),
            satnum: None,
            connection_factor: Some(10.0),
            diameter: 0.2,
            kh: None,
            skin,
            dfact: None,
            direction: Some("X".to_string()),
            equivalent_radius: None,
        }
    }

    fn case() -> CaseConfig {
        CaseConfig {
            completion: vec![CompletionInterval {
                well: "A1".to_string(),
                branch: 1,
                start_md: 0.0,
                end_md: 30.0,
                inner_diameter: 0.15,
                outer_diameter: 0.22,
                roughness: 1e-5,
                annulus: AnnulusType::OpenAnnulus,
                valves_per_joint: 1.0,
                device_type: DeviceType::Aicd,
                device_number: 1,
                annulus_zone: 0,
            }],
            ..CaseConfig::default()
        }
    }

    #[test]
    fn test_missing_well_name() {
        let schedule = WellSchedule::default();
        let err = select_well(&WellContext::default(), &case(), &schedule, 1).unwrap_err();
        assert!(matches!(err, CompletionError::MissingWell));
    }

    #[test]
    fn test_join_drops_unmatched_cells() {
        let (joined, dropped) = join_cells(
            &[compsegs(1, 0.0, 10.0), compsegs(2, 10.0, 20.0)],
            &[compdat(1, 0.0)],
        );
        assert_eq!(joined.len(), 1);
        assert_eq!(dropped, 1);
        assert_eq!(joined[0].md, 5.0);
        assert_eq!(joined[0].compdat_direction.as_deref(), Some("X"));
    }

    #[test]
    fn test_duplicate_cells_keep_last() {
        let (joined, _) = join_cells(
            &[compsegs(1, 0.0, 10.0), compsegs(2, 10.0, 20.0)],
            &[compdat(1, 0.0), compdat(2, 0.0), compdat(1, 3.0)],
        );
        assert_eq!(joined.len(), 3);
        let kept = keep_last_per_cell(joined);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].i, 1);
        assert_eq!(kept[0].skin, 3.0, "last COMPDAT entry must win");
        assert_eq!(kept[1].i, 2);
    }

    #[test]
    fn test_select_well_unknown_lateral() {
        let schedule = WellSchedule::default();
        let err = select_well(&WellContext::new("A1"), &case(), &schedule, 2).unwrap_err();
        assert!(matches!(err, CompletionError::InvalidCompletion { lateral: 2, .. }));
    }

    #[test]
    fn test_select_well_counts_dropped_cells() {
        let mut schedule = WellSchedule::default();
        schedule.insert_well(
            "A1",
            WellTables {
                compdat: vec![compdat(1, 0.0)],
                compsegs: vec![compsegs(1, 0.0, 10.0), compsegs(9, 10.0, 20.0)],
                welsegs: None,
            },
        );
        let selection = select_well(&WellContext::new("A1"), &case(), &schedule, 1).unwrap();
        assert_eq!(selection.reservoir.len(), 1);
        assert_eq!(selection.dropped_cells, 1);
        assert!(selection.topology.is_none());
    }
}
