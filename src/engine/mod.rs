//! Well Construction Engine
//!
//! ## Per-Lateral Stage Chain
//!
//! ```text
//! STAGE 1: Active wells      (once per case: skip GP + PERF-only wells)
//! STAGE 2: Method            (once per case: FIX / CELLS / USER / WELSEGS)
//! STAGE 3: Well data         (completion rows, topology, joined cells)
//! STAGE 4: Trajectory        (md → tvd)
//! STAGE 5: Annulus zones     (on the completion rows)
//! STAGE 6: Tubing segments   (build, fill gaps, number)
//! STAGE 7: Annulus zones     (corrected onto the segments)
//! STAGE 8: Devices           (type, count, tubing properties)
//! STAGE 9: Cell connections  (cell → segment)
//! ```
//!
//! Laterals are processed in ascending order and concatenated into the
//! well result; wells are appended to the case result in active-well
//! order. Every stage takes its inputs by value or reference and returns
//! a new table; nothing is carried between wells.

mod active_wells;
mod annulus;
mod connect;
mod devices;
mod error;
mod method;
mod segments;
mod selector;
mod trajectory;
mod wells;

pub use crate::types::DEPTH_TOLERANCE_M;

pub use active_wells::{active_wells, ActiveWells, Diagnostic};
pub use annulus::{correct_annulus_zone, define_annulus_zones};
pub use connect::connect_cells_to_segments;
pub use devices::get_devices;
pub use error::CompletionError;
pub use method::{resolve_method, SegmentMethod};
pub use segments::{
    build_segments, cells_segments, finalize_segments, first_outlet, fit_to_span, fix_segments,
    insert_missing_segments, lump_minimum_length, user_segments, welsegs_segments,
};
pub use selector::{join_cells, keep_last_per_cell, select_well, WellContext, WellSelection};
pub use trajectory::Trajectory;
pub use wells::{CaseCompletion, CompletionEngine, LateralCompletion, WellCompletion};
