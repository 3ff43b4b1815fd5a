//! Tubing segment construction
//!
//! `build_segments` is the single entry point for all four methods:
//!
//! 1. generate raw boundaries (CELLS / FIX / USER / WELSEGS)
//! 2. fit them to the completion span `[first start, last end]`
//! 3. `insert_missing_segments`: close gaps, split at every completion
//!    boundary, add a zero-length segment for every packer
//!
//! `finalize_segments` then numbers the result and places the nodes on the
//! trajectory.

use super::method::SegmentMethod;
use super::trajectory::Trajectory;
use super::DEPTH_TOLERANCE_M;
use crate::schedule::Topology;
use crate::types::{CompletionInterval, GridConnection, SegmentDescription, TubingSegment};
use tracing::warn;

type Span = (f64, f64);

/// Upper bound on the number of FIX segments generated for one lateral
pub const MAX_FIX_SEGMENTS: usize = 100_000;

/// Generate, fit and complete the tubing segments of one lateral.
///
/// Returns segments sorted by depth, contiguous, covering the completion
/// span. A method without source data (no cells, no topology) still yields
/// additional segments over the span; only a packer-only completion comes
/// back empty.
pub fn build_segments(
    method: &SegmentMethod,
    intervals: &[CompletionInterval],
    topology: Option<&Topology>,
    connections: &[GridConnection],
    minimum_segment_length: f64,
) -> Vec<TubingSegment> {
    let raw = match method {
        SegmentMethod::Cells => cells_segments(connections, minimum_segment_length),
        SegmentMethod::Fix(length) => fix_segments(intervals, *length),
        SegmentMethod::User => user_segments(intervals),
        SegmentMethod::Welsegs => topology.map(welsegs_segments).unwrap_or_default(),
    };
    let raw: Vec<TubingSegment> = raw
        .into_iter()
        .map(|(start, end)| TubingSegment::spanning(start, end, SegmentDescription::Original))
        .collect();

    let fitted = match completion_span(intervals) {
        Some(span) => fit_to_span(raw, span),
        None => raw,
    };
    insert_missing_segments(fitted, intervals)
}

// ============================================================================
// Raw Generation
// ============================================================================

/// First start and deepest end of the completion rows.
fn completion_span(intervals: &[CompletionInterval]) -> Option<Span> {
    let start = intervals.iter().map(|r| r.start_md).reduce(f64::min)?;
    let end = intervals.iter().map(|r| r.end_md).reduce(f64::max)?;
    Some((start, end))
}

fn sort_spans(spans: &mut [Span]) {
    spans.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
}

fn push_distinct(spans: &mut Vec<Span>, span: Span) {
    let exists = spans.iter().any(|s| {
        (s.0 - span.0).abs() <= DEPTH_TOLERANCE_M && (s.1 - span.1).abs() <= DEPTH_TOLERANCE_M
    });
    if !exists {
        spans.push(span);
    }
}

/// One segment per distinct cell range, lumped by user segment numbers
/// when every cell carries one, then by the minimum segment length.
pub fn cells_segments(connections: &[GridConnection], minimum_segment_length: f64) -> Vec<Span> {
    let mut cells: Vec<&GridConnection> = connections.iter().collect();
    cells.sort_by(|a, b| a.start_md.total_cmp(&b.start_md).then(a.end_md.total_cmp(&b.end_md)));

    let spans: Vec<Span> = if !cells.is_empty() && cells.iter().all(|c| c.segment.is_some()) {
        let mut lumped: Vec<(Option<u32>, Span)> = Vec::new();
        for cell in cells {
            match lumped.last_mut() {
                Some((segment, span)) if *segment == cell.segment => span.1 = cell.end_md,
                _ => lumped.push((cell.segment, (cell.start_md, cell.end_md))),
            }
        }
        lumped.into_iter().map(|(_, span)| span).collect()
    } else {
        cells.iter().map(|c| (c.start_md, c.end_md)).collect()
    };

    let mut distinct = Vec::with_capacity(spans.len());
    for span in lump_minimum_length(spans, minimum_segment_length) {
        push_distinct(&mut distinct, span);
    }
    distinct
}

/// Merge consecutive spans until each reaches `minimum` in length. The
/// trailing remainder stays a segment of its own.
pub fn lump_minimum_length(spans: Vec<Span>, minimum: f64) -> Vec<Span> {
    if minimum <= 0.0 || spans.len() < 2 {
        return spans;
    }
    let mut lumped = Vec::new();
    let mut accumulated = 0.0;
    let mut first = 0;
    for idx in 0..spans.len() - 1 {
        accumulated += spans[idx].1 - spans[idx].0;
        if accumulated >= minimum {
            lumped.push((spans[first].0, spans[idx].1));
            accumulated = 0.0;
            first = idx + 1;
        }
    }
    lumped.push((spans[first].0, spans[spans.len() - 1].1));
    lumped
}

/// Fixed-length segments from the first completion depth; the last one is
/// cut at the deepest completion depth.
///
/// A length that would need more than `MAX_FIX_SEGMENTS` segments is
/// coarsened to span / `MAX_FIX_SEGMENTS`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn fix_segments(intervals: &[CompletionInterval], length: f64) -> Vec<Span> {
    let Some((start, end)) = completion_span(intervals) else {
        return Vec::new();
    };
    if length <= 0.0 || !length.is_finite() {
        return Vec::new();
    }

    let span = end - start;
    let mut length = length;
    let mut count = ((span - DEPTH_TOLERANCE_M) / length).ceil().max(0.0) as usize;
    if count > MAX_FIX_SEGMENTS {
        warn!(
            requested = length,
            count,
            max = MAX_FIX_SEGMENTS,
            "Segment length too small for the completion span, coarsening"
        );
        length = span / MAX_FIX_SEGMENTS as f64;
        count = MAX_FIX_SEGMENTS;
    }

    (0..count)
        .map(|k| {
            let seg_start = start + k as f64 * length;
            let seg_end = if k + 1 == count {
                end
            } else {
                (start + (k + 1) as f64 * length).min(end)
            };
            (seg_start, seg_end)
        })
        .collect()
}

/// The distinct (start, end) pairs of the completion table.
pub fn user_segments(intervals: &[CompletionInterval]) -> Vec<Span> {
    let mut spans = Vec::with_capacity(intervals.len());
    for row in intervals {
        push_distinct(&mut spans, (row.start_md, row.end_md));
    }
    sort_spans(&mut spans);
    spans
}

/// Segments between consecutive WELSEGS node depths of the branch.
pub fn welsegs_segments(topology: &Topology) -> Vec<Span> {
    let mut nodes: Vec<f64> = topology.1.iter().map(|r| r.md).collect();
    nodes.sort_by(f64::total_cmp);
    nodes.dedup_by(|a, b| (*a - *b).abs() <= DEPTH_TOLERANCE_M);
    nodes.windows(2).map(|w| (w[0], w[1])).collect()
}

// ============================================================================
// Fitting and Completion
// ============================================================================

/// Clip segments to `span`, drop what falls outside, and cover missing
/// head or tail with additional segments. With nothing left after
/// clipping, one additional segment covers the whole span.
pub fn fit_to_span(segments: Vec<TubingSegment>, span: Span) -> Vec<TubingSegment> {
    let (span_start, span_end) = span;
    let mut fitted: Vec<TubingSegment> = segments
        .into_iter()
        .filter_map(|s| {
            let start = s.start_md.max(span_start);
            let end = s.end_md.min(span_end);
            (end - start > DEPTH_TOLERANCE_M)
                .then(|| TubingSegment::spanning(start, end, s.description))
        })
        .collect();
    if fitted.is_empty() {
        if span_end - span_start > DEPTH_TOLERANCE_M {
            fitted.push(TubingSegment::spanning(
                span_start,
                span_end,
                SegmentDescription::Additional,
            ));
        }
        return fitted;
    }
    sort_segments(&mut fitted);

    let head = fitted[0].start_md;
    if head - span_start > DEPTH_TOLERANCE_M {
        fitted.insert(
            0,
            TubingSegment::spanning(span_start, head, SegmentDescription::Additional),
        );
    }
    let tail = fitted[fitted.len() - 1].end_md;
    if span_end - tail > DEPTH_TOLERANCE_M {
        fitted.push(TubingSegment::spanning(tail, span_end, SegmentDescription::Additional));
    }
    fitted
}

fn sort_segments(segments: &mut [TubingSegment]) {
    segments.sort_by(|a, b| {
        a.start_md
            .total_cmp(&b.start_md)
            .then(a.end_md.total_cmp(&b.end_md))
    });
}

/// Make the segment list contiguous and honour every completion boundary.
///
/// - gaps between consecutive segments get an additional segment
/// - overlaps are resolved in favour of the shallower segment
/// - a segment containing a completion boundary is split there
/// - each packer depth gets a zero-length segment
pub fn insert_missing_segments(
    segments: Vec<TubingSegment>,
    intervals: &[CompletionInterval],
) -> Vec<TubingSegment> {
    let mut sorted: Vec<TubingSegment> = segments.into_iter().filter(|s| !s.is_zero_length()).collect();
    if sorted.is_empty() {
        return sorted;
    }
    sort_segments(&mut sorted);

    // Gaps and overlaps
    let mut contiguous: Vec<TubingSegment> = Vec::with_capacity(sorted.len());
    for segment in sorted {
        let Some(prev_end) = contiguous.last().map(|s| s.end_md) else {
            contiguous.push(segment);
            continue;
        };
        if segment.start_md - prev_end > DEPTH_TOLERANCE_M {
            contiguous.push(TubingSegment::spanning(
                prev_end,
                segment.start_md,
                SegmentDescription::Additional,
            ));
            contiguous.push(segment);
        } else if segment.end_md - prev_end > DEPTH_TOLERANCE_M {
            contiguous.push(TubingSegment::spanning(prev_end, segment.end_md, segment.description));
        }
    }

    // Completion boundaries
    let mut boundaries: Vec<f64> = intervals
        .iter()
        .flat_map(|r| [r.start_md, r.end_md])
        .collect();
    boundaries.sort_by(f64::total_cmp);
    boundaries.dedup_by(|a, b| (*a - *b).abs() <= DEPTH_TOLERANCE_M);

    let mut split = Vec::with_capacity(contiguous.len() + boundaries.len());
    for segment in contiguous {
        let mut start = segment.start_md;
        for &cut in &boundaries {
            if cut - start > DEPTH_TOLERANCE_M && segment.end_md - cut > DEPTH_TOLERANCE_M {
                split.push(TubingSegment::spanning(start, cut, segment.description));
                start = cut;
            }
        }
        split.push(TubingSegment::spanning(start, segment.end_md, segment.description));
    }

    // Packers
    let top = split[0].start_md;
    let bottom = split[split.len() - 1].end_md;
    for packer in intervals.iter().filter(|r| r.is_packer()) {
        let depth = packer.start_md;
        let inside = depth >= top - DEPTH_TOLERANCE_M && depth <= bottom + DEPTH_TOLERANCE_M;
        let present = split
            .iter()
            .any(|s| s.is_zero_length() && (s.start_md - depth).abs() <= DEPTH_TOLERANCE_M);
        if inside && !present {
            split.push(TubingSegment::spanning(depth, depth, SegmentDescription::Additional));
        }
    }
    sort_segments(&mut split);
    split
}

// ============================================================================
// Numbering
// ============================================================================

/// Outlet of the branch's first segment as defined by the topology, or 0
/// (well head) without topology.
///
/// WELSEGS segment 1 is the header (top) node, which has no tubing segment
/// of its own here, so an outlet of 1 maps to the well head. Other outlets
/// keep the topology's numbering: they name the junction segment of the
/// parent branch as the simulator numbers it, not an id assigned here.
pub fn first_outlet(topology: Option<&Topology>) -> u32 {
    topology
        .and_then(|(_, records)| records.iter().min_by(|a, b| a.md.total_cmp(&b.md)))
        .map_or(0, |r| if r.outlet <= 1 { 0 } else { r.outlet })
}

/// Assign ids (dense from 1), outlets, node depths and ownership.
pub fn finalize_segments(
    segments: Vec<TubingSegment>,
    trajectory: &Trajectory,
    well: &str,
    lateral: u32,
    first_outlet: u32,
) -> Vec<TubingSegment> {
    let mut outlet = first_outlet;
    segments
        .into_iter()
        .zip(1_u32..)
        .map(|(segment, id)| {
            let tub_md = segment.midpoint();
            let numbered = TubingSegment {
                well: well.to_string(),
                lateral,
                id,
                outlet,
                tub_md,
                tub_tvd: trajectory.tvd_at(tub_md),
                ..segment
            };
            outlet = id;
            numbered
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
