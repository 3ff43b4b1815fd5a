//! Measured depth to true vertical depth relationship of a lateral

use crate::schedule::Topology;
use crate::types::GridConnection;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sorted (md, tvd) points with linear interpolation between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    points: Vec<(f64, f64)>,
}

impl Trajectory {
    /// Build from raw points; sorted by md, then tvd.
    pub fn from_points(mut points: Vec<(f64, f64)>) -> Self {
        points.retain(|(md, tvd)| md.is_finite() && tvd.is_finite());
        points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        Self { points }
    }

    /// Header node plus every record of the branch.
    pub fn from_topology(topology: &Topology) -> Self {
        let (header, records) = topology;
        let points = std::iter::once((header.md, header.tvd))
            .chain(records.iter().map(|r| (r.md, r.tvd)))
            .collect();
        Self::from_points(points)
    }

    /// Cell midpoints against their perforation depth. Cells without a
    /// perforation depth are skipped; with none at all the trajectory is
    /// the identity (vertical well).
    pub fn from_connections(connections: &[GridConnection]) -> Self {
        let points: Vec<(f64, f64)> = connections
            .iter()
            .filter_map(|c| c.perf_depth.map(|tvd| (c.md, tvd)))
            .collect();
        if points.is_empty() {
            debug!("No perforation depths available, using md as tvd");
        }
        Self::from_points(points)
    }

    /// Prefer the WELSEGS topology, fall back to the grid connections.
    pub fn resolve(topology: Option<&Topology>, connections: &[GridConnection]) -> Self {
        match topology {
            Some(t) if !t.1.is_empty() => Self::from_topology(t),
            _ => Self::from_connections(connections),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Interpolated tvd at `md`. Depths outside the known range take the
    /// nearest end point; an empty trajectory returns `md` itself.
    pub fn tvd_at(&self, md: f64) -> f64 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return md;
        };
        if md <= first.0 {
            return first.1;
        }
        if md >= last.0 {
            return last.1;
        }
        let upper = self.points.partition_point(|p| p.0 <= md);
        let (md0, tvd0) = self.points[upper - 1];
        let (md1, tvd1) = self.points[upper];
        if md1 - md0 <= f64::EPSILON {
            return tvd0;
        }
        tvd0 + (tvd1 - tvd0) * (md - md0) / (md1 - md0)
    }
}
