//! Engine output rows: tubing segments and cell-to-segment connections

use super::completion::{DeviceType, DEPTH_TOLERANCE_M};
use super::schedule::GridConnection;
use serde::{Deserialize, Serialize};

/// Where a tubing segment boundary came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SegmentDescription {
    /// Produced by the segmentation method
    #[default]
    Original,
    /// Inserted to close a gap or honour a completion boundary
    Additional,
}

/// One tubing segment of a lateral
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TubingSegment {
    pub well: String,
    /// Lateral (branch) number the segment belongs to
    pub lateral: u32,
    pub id: u32,
    /// Outlet segment id; 0 means the well head
    pub outlet: u32,
    pub start_md: f64,
    pub end_md: f64,
    /// Node depth: midpoint of the segment
    pub tub_md: f64,
    pub tub_tvd: f64,
    pub inner_diameter: f64,
    pub outer_diameter: f64,
    pub roughness: f64,
    pub annulus_zone: u32,
    pub device_type: DeviceType,
    pub device_number: u32,
    pub device_count: f64,
    pub description: SegmentDescription,
}

impl TubingSegment {
    /// A bare segment spanning `[start_md, end_md]`; everything else is
    /// filled by later stages.
    pub fn spanning(start_md: f64, end_md: f64, description: SegmentDescription) -> Self {
        Self {
            well: String::new(),
            lateral: 0,
            id: 0,
            outlet: 0,
            start_md,
            end_md,
            tub_md: 0.5 * (start_md + end_md),
            tub_tvd: 0.0,
            inner_diameter: 0.0,
            outer_diameter: 0.0,
            roughness: 0.0,
            annulus_zone: 0,
            device_type: DeviceType::Perf,
            device_number: 0,
            device_count: 0.0,
            description,
        }
    }

    pub fn length(&self) -> f64 {
        self.end_md - self.start_md
    }

    pub fn is_zero_length(&self) -> bool {
        self.length().abs() <= DEPTH_TOLERANCE_M
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.start_md + self.end_md)
    }
}

/// A grid connection after it has been attached to a tubing segment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservoirConnection {
    pub well: String,
    pub lateral: u32,
    #[serde(flatten)]
    pub cell: GridConnection,
    pub segment_id: u32,
    pub tub_md: f64,
    pub annulus_zone: u32,
    pub device_type: DeviceType,
    pub device_count: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_length_uses_depth_tolerance() {
        let packer = TubingSegment::spanning(1200.0, 1200.0 + 1e-9, SegmentDescription::Additional);
        assert!(packer.is_zero_length());
        let short = TubingSegment::spanning(1200.0, 1200.01, SegmentDescription::Additional);
        assert!(!short.is_zero_length());
    }
}
