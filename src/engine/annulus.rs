//! Annulus zones
//!
//! A zone is a run of consecutive completion intervals sharing the same
//! annulus content. Packers isolate: a packer gets its own zone and the
//! interval below it starts a new one. Zone ids are dense from 0 in depth
//! order within a lateral.

use super::DEPTH_TOLERANCE_M;
use crate::types::{CompletionInterval, TubingSegment};

/// First pass: assign zone ids to the depth-ordered completion rows.
pub fn define_annulus_zones(rows: &[CompletionInterval]) -> Vec<CompletionInterval> {
    let mut zone = 0;
    let mut zoned = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        if idx > 0 {
            let prev = &rows[idx - 1];
            if row.annulus != prev.annulus || row.is_packer() || prev.is_packer() {
                zone += 1;
            }
        }
        zoned.push(CompletionInterval {
            annulus_zone: zone,
            ..row.clone()
        });
    }
    zoned
}

/// The completion row a segment `[start, end]` belongs to.
///
/// Zero-length segments match a packer at the same depth first. Otherwise
/// the row containing the segment midpoint (half-open, deepest row closed)
/// wins, then the nearest row with ties going to the shallower one.
pub(crate) fn covering_interval(
    rows: &[CompletionInterval],
    start: f64,
    end: f64,
) -> Option<&CompletionInterval> {
    if (end - start).abs() <= DEPTH_TOLERANCE_M {
        if let Some(packer) = rows
            .iter()
            .find(|r| r.is_packer() && (r.start_md - start).abs() <= DEPTH_TOLERANCE_M)
        {
            return Some(packer);
        }
    }

    let mid = 0.5 * (start + end);
    let open: Vec<&CompletionInterval> = rows.iter().filter(|r| !r.is_packer()).collect();
    let candidates = if open.is_empty() { rows.iter().collect() } else { open };
    let deepest = candidates.len().checked_sub(1)?;

    let contains = candidates.iter().enumerate().find(|(idx, r)| {
        r.start_md <= mid && (mid < r.end_md || (*idx == deepest && mid <= r.end_md))
    });
    if let Some((_, row)) = contains {
        return Some(*row);
    }

    let distance = |r: &CompletionInterval| {
        if mid < r.start_md {
            r.start_md - mid
        } else {
            (mid - r.end_md).max(0.0)
        }
    };
    let mut best: Option<(&CompletionInterval, f64)> = None;
    for row in candidates {
        let d = distance(row);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((row, d)),
        }
    }
    best.map(|(row, _)| row)
}

/// Second pass: re-derive every segment's zone after segmentation may have
/// introduced boundaries that do not line up with the completion rows.
pub fn correct_annulus_zone(
    segments: Vec<TubingSegment>,
    zoned_rows: &[CompletionInterval],
) -> Vec<TubingSegment> {
    segments
        .into_iter()
        .map(|segment| {
            let annulus_zone = covering_interval(zoned_rows, segment.start_md, segment.end_md)
                .map_or(segment.annulus_zone, |row| row.annulus_zone);
            TubingSegment {
                annulus_zone,
                ..segment
            }
        })
        .collect()
}
