//! Errors raised while constructing a well

use crate::schedule::ScheduleError;
use crate::types::DeviceType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error(
        "Unrecognized segment length '{value}'. The value should be one of: 'WELSEGS', \
         'CELLS', 'USER', or a number: -1 for 'USER', 0 for 'CELLS', positive number for 'FIX'"
    )]
    Configuration { value: String },

    #[error("No well name given")]
    MissingWell,

    #[error(
        "Well {well} lateral {lateral}: segment {start_md}-{end_md} mixes devices {first} and {second}"
    )]
    AmbiguousDevice {
        well: String,
        lateral: u32,
        start_md: f64,
        end_md: f64,
        first: DeviceType,
        second: DeviceType,
    },

    #[error("Well {well} lateral {lateral}: {connections} grid connections but no tubing segments")]
    UnmappableConnection {
        well: String,
        lateral: u32,
        connections: usize,
    },

    #[error("Well {well} lateral {lateral}: {reason}")]
    InvalidCompletion {
        well: String,
        lateral: u32,
        reason: String,
    },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}
