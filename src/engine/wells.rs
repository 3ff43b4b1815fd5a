//! Per-case orchestration: run every stage for every lateral of every
//! active well and combine the results.

use super::active_wells::{active_wells, ActiveWells, Diagnostic};
use super::annulus::{correct_annulus_zone, define_annulus_zones};
use super::connect::connect_cells_to_segments;
use super::devices::get_devices;
use super::error::CompletionError;
use super::method::{resolve_method, SegmentMethod};
use super::segments::{build_segments, finalize_segments, first_outlet};
use super::selector::{select_well, WellContext};
use super::trajectory::Trajectory;
use crate::config::CaseConfig;
use crate::schedule::ScheduleProvider;
use crate::types::{ReservoirConnection, TubingSegment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// ============================================================================
// Results
// ============================================================================

/// Segments and connections of one lateral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateralCompletion {
    pub lateral: u32,
    pub segments: Vec<TubingSegment>,
    pub connections: Vec<ReservoirConnection>,
    pub dropped_cells: usize,
}

/// All laterals of one well, concatenated in ascending lateral order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WellCompletion {
    pub well: String,
    pub segments: Vec<TubingSegment>,
    pub connections: Vec<ReservoirConnection>,
    pub diagnostics: Vec<Diagnostic>,
}

impl WellCompletion {
    fn combine(&mut self, lateral: LateralCompletion) {
        if lateral.dropped_cells > 0 {
            self.diagnostics.push(Diagnostic::DroppedCells {
                well: self.well.clone(),
                lateral: lateral.lateral,
                count: lateral.dropped_cells,
            });
        }
        self.segments.extend(lateral.segments);
        self.connections.extend(lateral.connections);
    }
}

/// Case-wide result: wells appended in processing order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseCompletion {
    /// Processed wells, in processing order
    pub wells: Vec<String>,
    pub segments: Vec<TubingSegment>,
    pub connections: Vec<ReservoirConnection>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CaseCompletion {
    pub fn push(&mut self, well: WellCompletion) {
        self.wells.push(well.well);
        self.segments.extend(well.segments);
        self.connections.extend(well.connections);
        self.diagnostics.extend(well.diagnostics);
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Well construction engine for one case.
///
/// Construction resolves the segmentation method and the active well set;
/// an unrecognised method aborts here, before any well is touched.
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    method: SegmentMethod,
    minimum_segment_length: f64,
    active: ActiveWells,
}

impl CompletionEngine {
    pub fn new(case: &CaseConfig) -> Result<Self, CompletionError> {
        let method = resolve_method(&case.segment_length)?;
        let active = active_wells(&case.completion, case.gp_perf_devicelayer);
        info!(
            method = %method,
            active_wells = active.wells.len(),
            "Completion engine initialized"
        );
        Ok(Self {
            method,
            minimum_segment_length: case.minimum_segment_length,
            active,
        })
    }

    pub fn method(&self) -> SegmentMethod {
        self.method
    }

    pub fn active_wells(&self) -> &[String] {
        &self.active.wells
    }

    /// Process every active well. Any fatal error aborts the whole run.
    pub fn run<S: ScheduleProvider + ?Sized>(
        &self,
        case: &CaseConfig,
        schedule: &S,
    ) -> Result<CaseCompletion, CompletionError> {
        let mut result = CaseCompletion {
            diagnostics: self.active.diagnostics.clone(),
            ..CaseCompletion::default()
        };
        if self.active.is_empty() {
            warn!("No active wells, nothing to complete");
            return Ok(result);
        }

        for well in &self.active.wells {
            let completed = self.complete_well(&WellContext::new(well.as_str()), case, schedule)?;
            result.push(completed);
        }

        info!(
            wells = result.wells.len(),
            segments = result.segments.len(),
            connections = result.connections.len(),
            "Case completed"
        );
        Ok(result)
    }

    /// Process all laterals of the context's well in ascending order.
    pub fn complete_well<S: ScheduleProvider + ?Sized>(
        &self,
        ctx: &WellContext,
        case: &CaseConfig,
        schedule: &S,
    ) -> Result<WellCompletion, CompletionError> {
        let well = ctx.well_name()?;
        let mut completed = WellCompletion {
            well: well.to_string(),
            ..WellCompletion::default()
        };
        for lateral in case.laterals(well) {
            let lateral_result = self.complete_lateral(ctx, case, schedule, lateral)?;
            completed.combine(lateral_result);
        }
        info!(
            well,
            segments = completed.segments.len(),
            connections = completed.connections.len(),
            "Well completed"
        );
        Ok(completed)
    }

    /// Run the stage chain for one lateral:
    /// select → trajectory → zones → segments → zones → devices → cells.
    pub fn complete_lateral<S: ScheduleProvider + ?Sized>(
        &self,
        ctx: &WellContext,
        case: &CaseConfig,
        schedule: &S,
        lateral: u32,
    ) -> Result<LateralCompletion, CompletionError> {
        let selection = select_well(ctx, case, schedule, lateral)?;
        let well = selection.well.as_str();
        let topology = selection.topology.as_ref();

        let trajectory = Trajectory::resolve(topology, &selection.reservoir);
        let zoned = define_annulus_zones(&selection.completion);

        let segments = build_segments(
            &self.method,
            &zoned,
            topology,
            &selection.reservoir,
            self.minimum_segment_length,
        );
        let segments = finalize_segments(segments, &trajectory, well, lateral, first_outlet(topology));
        let segments = correct_annulus_zone(segments, &zoned);
        let segments = get_devices(well, lateral, segments, &zoned)?;
        let connections = connect_cells_to_segments(well, lateral, &selection.reservoir, &segments)?;

        debug!(
            well,
            lateral,
            method = %self.method,
            segments = segments.len(),
            connections = connections.len(),
            "Lateral completed"
        );
        Ok(LateralCompletion {
            lateral,
            segments,
            connections,
            dropped_cells: selection.dropped_cells,
        })
    }
}
