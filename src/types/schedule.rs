//! Simulator schedule records: grid connections and segment topology
//!
//! Field names follow the simulator keyword items (COMPDAT, COMPSEGS,
//! WELSEGS) but are already typed; parsing keyword text happens upstream.

use serde::{Deserialize, Serialize};

/// Grid cell indices shared by COMPDAT and COMPSEGS rows
pub type CellIndex = (u32, u32, u32);

/// One COMPDAT row: connection data for a grid cell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompdatRecord {
    pub i: u32,
    pub j: u32,
    pub k: u32,
    #[serde(default)]
    pub k2: Option<u32>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub satnum: Option<u32>,
    #[serde(default)]
    pub connection_factor: Option<f64>,
    #[serde(default)]
    pub diameter: f64,
    #[serde(default)]
    pub kh: Option<f64>,
    #[serde(default)]
    pub skin: f64,
    #[serde(default)]
    pub dfact: Option<f64>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub equivalent_radius: Option<f64>,
}

fn default_status() -> String {
    "OPEN".to_string()
}

impl CompdatRecord {
    pub fn cell(&self) -> CellIndex {
        (self.i, self.j, self.k)
    }
}

/// One COMPSEGS row: the measured-depth range of a cell along a branch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompsegsRecord {
    pub i: u32,
    pub j: u32,
    pub k: u32,
    pub branch: u32,
    pub start_md: f64,
    pub end_md: f64,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub end_grid: Option<u32>,
    #[serde(default)]
    pub perf_depth: Option<f64>,
    #[serde(default)]
    pub therm: Option<f64>,
    /// User-assigned segment number; `None` when defaulted.
    #[serde(default)]
    pub segment: Option<u32>,
}

impl CompsegsRecord {
    pub fn cell(&self) -> CellIndex {
        (self.i, self.j, self.k)
    }
}

/// Whether WELSEGS depths are absolute or incremental along outlets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum InfoType {
    #[default]
    Abs,
    Inc,
}

/// WELSEGS header record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WelsegsHeader {
    pub well: String,
    /// True vertical depth of the top segment node
    pub tvd: f64,
    /// Measured depth of the top segment node
    pub md: f64,
    #[serde(default)]
    pub wellbore_volume: Option<f64>,
    #[serde(default)]
    pub info_type: InfoType,
    #[serde(default = "default_pressure_drop")]
    pub pressure_drop: String,
    #[serde(default)]
    pub flow_model: Option<String>,
}

fn default_pressure_drop() -> String {
    "HFA".to_string()
}

/// WELSEGS segment record (single segment, `segment == segment2`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WelsegsRecord {
    pub segment: u32,
    pub branch: u32,
    pub outlet: u32,
    pub md: f64,
    pub tvd: f64,
    #[serde(default)]
    pub inner_diameter: f64,
    #[serde(default)]
    pub roughness: f64,
    #[serde(default)]
    pub cross_section: Option<f64>,
}

/// A reservoir cell touched by the well: COMPSEGS joined with COMPDAT on
/// (I, J, K).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridConnection {
    pub i: u32,
    pub j: u32,
    pub k: u32,
    pub k2: Option<u32>,
    pub start_md: f64,
    pub end_md: f64,
    /// Matching ordinate: midpoint of the cell's measured-depth range
    pub md: f64,
    pub compsegs_direction: Option<String>,
    pub perf_depth: Option<f64>,
    pub segment: Option<u32>,
    pub status: String,
    pub satnum: Option<u32>,
    pub connection_factor: Option<f64>,
    pub diameter: f64,
    pub kh: Option<f64>,
    pub skin: f64,
    pub dfact: Option<f64>,
    pub compdat_direction: Option<String>,
    pub equivalent_radius: Option<f64>,
}

impl GridConnection {
    pub fn join(compsegs: &CompsegsRecord, compdat: &CompdatRecord) -> Self {
        Self {
            i: compsegs.i,
            j: compsegs.j,
            k: compsegs.k,
            k2: compdat.k2,
            start_md: compsegs.start_md,
            end_md: compsegs.end_md,
            md: 0.5 * (compsegs.start_md + compsegs.end_md),
            compsegs_direction: compsegs.direction.clone(),
            perf_depth: compsegs.perf_depth,
            segment: compsegs.segment,
            status: compdat.status.clone(),
            satnum: compdat.satnum,
            connection_factor: compdat.connection_factor,
            diameter: compdat.diameter,
            kh: compdat.kh,
            skin: compdat.skin,
            dfact: compdat.dfact,
            compdat_direction: compdat.direction.clone(),
            equivalent_radius: compdat.equivalent_radius,
        }
    }

    pub fn cell(&self) -> CellIndex {
        (self.i, self.j, self.k)
    }

    pub fn length(&self) -> f64 {
        self.end_md - self.start_md
    }
}
