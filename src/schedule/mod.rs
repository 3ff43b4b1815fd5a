//! Schedule Module
//!
//! The engine reads simulator schedule data through [`ScheduleProvider`].
//! [`WellSchedule`] is the in-memory provider used by the binary and the
//! tests: per-well COMPDAT, COMPSEGS and WELSEGS tables loaded from JSON.
//!
//! Two repairs are applied on the way out:
//! - incremental (`INC`) WELSEGS depths are converted to absolute depths
//! - overlapping COMPSEGS ranges from cells penetrated twice are untangled

use crate::types::{
    CompdatRecord, CompsegsRecord, InfoType, WelsegsHeader, WelsegsRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Overlap (m) tolerated between consecutive COMPSEGS rows before repair.
pub const COMPSEGS_OVERLAP_TOLERANCE_M: f64 = 0.1;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Schedule I/O error ({0}): {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Schedule parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Well {well}: segment {segment} refers to unknown outlet segment {outlet}")]
    UnknownOutlet { well: String, segment: u32, outlet: u32 },
}

// ============================================================================
// Provider Contract
// ============================================================================

/// Segment topology of one branch: the WELSEGS header plus that branch's records.
pub type Topology = (WelsegsHeader, Vec<WelsegsRecord>);

/// Source of simulator schedule data for the well-construction engine.
pub trait ScheduleProvider {
    /// Grid-connection data for all cells of a well.
    fn get_compdat(&self, well: &str) -> Vec<CompdatRecord>;

    /// Depth-indexed cell rows of one lateral.
    fn get_compsegs(&self, well: &str, lateral: u32) -> Vec<CompsegsRecord>;

    /// Segment topology of one lateral, absolute depths. `None` when the
    /// well has no WELSEGS.
    fn get_welsegs(&self, well: &str, lateral: u32) -> Result<Option<Topology>, ScheduleError>;
}

// ============================================================================
// In-Memory Schedule
// ============================================================================

/// Schedule tables of one well
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellTables {
    #[serde(default)]
    pub compdat: Vec<CompdatRecord>,
    #[serde(default)]
    pub compsegs: Vec<CompsegsRecord>,
    #[serde(default)]
    pub welsegs: Option<WelsegsTable>,
}

/// WELSEGS keyword of one well
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelsegsTable {
    pub header: WelsegsHeader,
    pub records: Vec<WelsegsRecord>,
}

/// Schedule data for every well in a case, keyed by well name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellSchedule {
    #[serde(default)]
    pub wells: BTreeMap<String, WellTables>,
}

impl WellSchedule {
    /// Load a JSON schedule dump.
    pub fn load_from_file(path: &Path) -> Result<Self, ScheduleError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ScheduleError::Io(path.to_path_buf(), e))?;
        let schedule: Self = serde_json::from_str(&contents)?;
        info!(path = %path.display(), wells = schedule.wells.len(), "Loaded schedule");
        Ok(schedule)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ScheduleError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Add or replace the tables of one well.
    pub fn insert_well(&mut self, well: impl Into<String>, tables: WellTables) {
        self.wells.insert(well.into(), tables);
    }
}

impl ScheduleProvider for WellSchedule {
    fn get_compdat(&self, well: &str) -> Vec<CompdatRecord> {
        self.wells
            .get(well)
            .map(|t| t.compdat.clone())
            .unwrap_or_default()
    }

    fn get_compsegs(&self, well: &str, lateral: u32) -> Vec<CompsegsRecord> {
        let rows: Vec<CompsegsRecord> = self
            .wells
            .get(well)
            .map(|t| {
                t.compsegs
                    .iter()
                    .filter(|r| r.branch == lateral)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        fix_compsegs(rows, well)
    }

    fn get_welsegs(&self, well: &str, lateral: u32) -> Result<Option<Topology>, ScheduleError> {
        let Some(table) = self.wells.get(well).and_then(|t| t.welsegs.as_ref()) else {
            return Ok(None);
        };
        let (header, records) = fix_welsegs(&table.header, &table.records)?;
        let records = records.into_iter().filter(|r| r.branch == lateral).collect();
        Ok(Some((header, records)))
    }
}

// ============================================================================
// Repairs
// ============================================================================

/// Convert a WELSEGS table given in `INC` to `ABS`.
///
/// Each record's depths are increments relative to its outlet segment;
/// records draining into segment 1 are relative to the header node.
/// Records must be listed after their outlet, as the simulator requires.
pub fn fix_welsegs(
    header: &WelsegsHeader,
    records: &[WelsegsRecord],
) -> Result<(WelsegsHeader, Vec<WelsegsRecord>), ScheduleError> {
    if header.info_type == InfoType::Abs {
        return Ok((header.clone(), records.to_vec()));
    }

    let mut absolute: HashMap<u32, (f64, f64)> = HashMap::with_capacity(records.len());
    let mut fixed = Vec::with_capacity(records.len());
    for record in records {
        let (base_md, base_tvd) = if record.outlet == 1 {
            (header.md, header.tvd)
        } else {
            *absolute
                .get(&record.outlet)
                .ok_or_else(|| ScheduleError::UnknownOutlet {
                    well: header.well.clone(),
                    segment: record.segment,
                    outlet: record.outlet,
                })?
        };
        let md = base_md + record.md;
        let tvd = base_tvd + record.tvd;
        absolute.insert(record.segment, (md, tvd));
        fixed.push(WelsegsRecord {
            md,
            tvd,
            ..record.clone()
        });
    }

    let mut header = header.clone();
    header.info_type = InfoType::Abs;
    Ok((header, fixed))
}

/// Untangle overlapping COMPSEGS ranges of one branch.
///
/// Happens when a big cell is penetrated more than once by a complex well
/// path. Either the current cell's start is moved down to the previous end,
/// or the previous cell's end is pulled up to the current start.
pub fn fix_compsegs(mut rows: Vec<CompsegsRecord>, well: &str) -> Vec<CompsegsRecord> {
    for idx in 1..rows.len() {
        let (prev_start, prev_end) = (rows[idx - 1].start_md, rows[idx - 1].end_md);
        let (start, end) = (rows[idx].start_md, rows[idx].end_md);
        if start - prev_end >= -COMPSEGS_OVERLAP_TOLERANCE_M {
            continue;
        }
        if end > prev_end {
            debug!(well, start, prev_end, "Moving overlapping cell start");
            rows[idx].start_md = prev_end;
        } else if start > prev_start {
            debug!(well, start, prev_end, "Trimming previous cell end");
            rows[idx - 1].end_md = start;
        } else {
            info!(
                well,
                i = rows[idx].i,
                j = rows[idx].j,
                k = rows[idx].k,
                "Cell range lies inside the previous cell, left unchanged"
            );
        }
    }
    rows
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

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

    fn welsegs(segment: u32, branch: u32, outlet: u32, md: f64, tvd: f64) -> WelsegsRecord {
        WelsegsRecord {
            segment,
            branch,
            outlet,
            md,
            tvd,
            inner_diameter: 0.15,
            roughness: 1e-5,
            cross_section: None,
        }
    }

    fn header(info_type: InfoType) -> WelsegsHeader {
        WelsegsHeader {
            well: "A1".to_string(),
            tvd: 1000.0,
            md: 1500.0,
            wellbore_volume: None,
            info_type,
            pressure_drop: "HFA".to_string(),
            flow_model: None,
        }
    }

    #[test]
    fn test_fix_welsegs_abs_unchanged() {
        let records = vec![welsegs(2, 1, 1, 1600.0, 1050.0)];
        let (h, r) = fix_welsegs(&header(InfoType::Abs), &records).unwrap();
        assert_eq!(h.info_type, InfoType::Abs);
        assert_eq!(r, records);
    }

    #[test]
    fn test_fix_welsegs_inc_accumulates_along_outlets() {
        let records = vec![
            welsegs(2, 1, 1, 100.0, 10.0),
            welsegs(3, 1, 2, 50.0, 5.0),
            welsegs(4, 2, 2, 30.0, 1.0),
        ];
        let (h, r) = fix_welsegs(&header(InfoType::Inc), &records).unwrap();
        assert_eq!(h.info_type, InfoType::Abs);
        assert_eq!(r[0].md, 1600.0);
        assert_eq!(r[1].md, 1650.0);
        assert_eq!(r[1].tvd, 1015.0);
        assert_eq!(r[2].md, 1630.0);
    }

    #[test]
    fn test_fix_welsegs_unknown_outlet() {
        let records = vec![welsegs(3, 1, 7, 50.0, 5.0)];
        let err = fix_welsegs(&header(InfoType::Inc), &records).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownOutlet { outlet: 7, .. }));
    }

    #[test]
    fn test_fix_compsegs_moves_start() {
        let rows = fix_compsegs(vec![compsegs(1, 0.0, 10.0), compsegs(2, 8.0, 20.0)], "A1");
        assert_eq!(rows[1].start_md, 10.0);
        assert_eq!(rows[1].end_md, 20.0);
    }

    #[test]
    fn test_fix_compsegs_trims_previous_end() {
        let rows = fix_compsegs(vec![compsegs(1, 0.0, 20.0), compsegs(2, 8.0, 15.0)], "A1");
        assert_eq!(rows[0].end_md, 8.0);
        assert_eq!(rows[1].start_md, 8.0);
    }

    #[test]
    fn test_fix_compsegs_small_overlap_tolerated() {
        let rows = fix_compsegs(vec![compsegs(1, 0.0, 10.0), compsegs(2, 9.95, 20.0)], "A1");
        assert_eq!(rows[1].start_md, 9.95);
    }

    #[test]
    fn test_provider_filters_branch() {
        let mut schedule = WellSchedule::default();
        let mut other = compsegs(3, 0.0, 5.0);
        other.branch = 2;
        schedule.insert_well(
            "A1",
            WellTables {
                compdat: vec![],
                compsegs: vec![compsegs(1, 0.0, 10.0), other],
                welsegs: Some(WelsegsTable {
                    header: header(InfoType::Abs),
                    records: vec![welsegs(2, 1, 1, 1600.0, 1010.0), welsegs(3, 2, 2, 1620.0, 1012.0)],
                }),
            },
        );
        assert_eq!(schedule.get_compsegs("A1", 2).len(), 1);
        let (_, records) = schedule.get_welsegs("A1", 2).unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].segment, 3);
        assert!(schedule.get_welsegs("B2", 1).unwrap().is_none());
        assert!(schedule.get_compdat("B2").is_empty());
    }

    #[test]
    fn test_schedule_from_json() {
        let json = r#"{
            "wells": {
                "A1": {
                    "compdat": [{"i": 1, "j": 1, "k": 1, "diameter": 0.2, "skin": 0.0}],
                    "compsegs": [{"i": 1, "j": 1, "k": 1, "branch": 1, "start_md": 0.0, "end_md": 10.0}]
                }
            }
        }"#;
        let schedule = WellSchedule::from_json_str(json).unwrap();
        let compdat = schedule.get_compdat("A1");
        assert_eq!(compdat.len(), 1);
        assert_eq!(compdat[0].status, "OPEN");
        assert_eq!(schedule.get_compsegs("A1", 1).len(), 1);
    }
}
