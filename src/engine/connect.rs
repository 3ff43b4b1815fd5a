//! Cell to segment connection
//!
//! Each grid connection attaches to the tubing segment containing its
//! midpoint md. Segments are half-open `[start, end)`, except the deepest
//! one which is closed. Cells outside every segment go to the nearest one,
//! ties resolved towards the shallower segment. Zero-length (packer)
//! segments never receive cells.

use super::error::CompletionError;
use crate::types::{GridConnection, ReservoirConnection, TubingSegment};

pub fn connect_cells_to_segments(
    well: &str,
    lateral: u32,
    reservoir: &[GridConnection],
    segments: &[TubingSegment],
) -> Result<Vec<ReservoirConnection>, CompletionError> {
    if reservoir.is_empty() {
        return Ok(Vec::new());
    }
    let mut targets: Vec<&TubingSegment> = segments.iter().filter(|s| !s.is_zero_length()).collect();
    if targets.is_empty() {
        return Err(CompletionError::UnmappableConnection {
            well: well.to_string(),
            lateral,
            connections: reservoir.len(),
        });
    }
    targets.sort_by(|a, b| a.start_md.total_cmp(&b.start_md));

    Ok(reservoir
        .iter()
        .map(|cell| {
            let segment = locate(&targets, cell.md);
            ReservoirConnection {
                well: well.to_string(),
                lateral,
                cell: cell.clone(),
                segment_id: segment.id,
                tub_md: segment.tub_md,
                annulus_zone: segment.annulus_zone,
                device_type: segment.device_type,
                device_count: segment.device_count,
            }
        })
        .collect())
}

/// `targets` must be non-empty and sorted by depth.
fn locate<'a>(targets: &[&'a TubingSegment], md: f64) -> &'a TubingSegment {
    let last = targets.len() - 1;
    let idx = targets.partition_point(|s| s.end_md <= md);

    if idx <= last && targets[idx].start_md <= md {
        return targets[idx];
    }
    if idx > last {
        // Deepest segment is closed at its end; anything below is nearest to it
        return targets[last];
    }
    if idx == 0 {
        return targets[0];
    }
    let above = targets[idx - 1];
    let below = targets[idx];
    if below.start_md - md < md - above.end_md {
        below
    } else {
        above
    }
}
