//! Completor: Multi-Segment Well Construction
//!
//! Builds the multi-segment representation of each well in a completion
//! case: tubing segments, annulus zones, flow-control devices and the
//! mapping of reservoir grid cells onto segments.
//!
//! ## Architecture
//!
//! - **Config**: case file (segment length, completion table) with validation
//! - **Schedule**: COMPDAT / COMPSEGS / WELSEGS tables behind `ScheduleProvider`
//! - **Engine**: the per-lateral stage chain and the case orchestrator

pub mod config;
pub mod engine;
pub mod schedule;
pub mod types;

// Re-export case configuration
pub use config::{CaseConfig, ConfigError, SegmentLength};

// Re-export commonly used types
pub use types::{
    AnnulusType, CompletionInterval, DeviceType, GridConnection, ReservoirConnection,
    SegmentDescription, TubingSegment,
};

// Re-export the engine
pub use engine::{CaseCompletion, CompletionEngine, CompletionError, Diagnostic, SegmentMethod};

// Re-export schedule access
pub use schedule::{ScheduleError, ScheduleProvider, WellSchedule};
