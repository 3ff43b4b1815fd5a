//! Device assembly: put flow-control devices on the tubing segments

use super::annulus::covering_interval;
use super::error::CompletionError;
use super::DEPTH_TOLERANCE_M;
use crate::types::{CompletionInterval, DeviceType, TubingSegment, JOINT_LENGTH_M};

/// Device type, number, count and tubing properties for every segment.
///
/// A segment takes the active device of the completion rows it overlaps;
/// PERF only when none of them carries one. Two different active device
/// types within one segment are ambiguous. The count is the number of
/// joints covered times valves per joint. Diameters and roughness come from
/// the row with the largest overlap.
pub fn get_devices(
    well: &str,
    lateral: u32,
    segments: Vec<TubingSegment>,
    completion: &[CompletionInterval],
) -> Result<Vec<TubingSegment>, CompletionError> {
    segments
        .into_iter()
        .map(|segment| assemble(well, lateral, segment, completion))
        .collect()
}

fn assemble(
    well: &str,
    lateral: u32,
    segment: TubingSegment,
    completion: &[CompletionInterval],
) -> Result<TubingSegment, CompletionError> {
    let overlapping: Vec<(&CompletionInterval, f64)> = if segment.is_zero_length() {
        Vec::new()
    } else {
        completion
            .iter()
            .filter(|r| !r.is_packer())
            .map(|r| (r, r.overlap(segment.start_md, segment.end_md)))
            .filter(|(_, overlap)| *overlap > DEPTH_TOLERANCE_M)
            .collect()
    };

    let Some(&(widest, _)) = overlapping
        .iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
    else {
        // Packer node or a segment beyond every row: tubing only, no devices
        let Some(row) = covering_interval(completion, segment.start_md, segment.end_md) else {
            return Ok(segment);
        };
        return Ok(TubingSegment {
            inner_diameter: row.inner_diameter,
            outer_diameter: row.outer_diameter,
            roughness: row.roughness,
            device_type: DeviceType::Perf,
            device_number: 0,
            device_count: 0.0,
            ..segment
        });
    };

    let mut device_type = DeviceType::Perf;
    for (row, _) in &overlapping {
        if !row.device_type.is_active() || row.device_type == device_type {
            continue;
        }
        if device_type.is_active() {
            return Err(CompletionError::AmbiguousDevice {
                well: well.to_string(),
                lateral,
                start_md: segment.start_md,
                end_md: segment.end_md,
                first: device_type,
                second: row.device_type,
            });
        }
        device_type = row.device_type;
    }

    let (device_number, device_count) = if device_type.is_active() {
        let with_device: Vec<&(&CompletionInterval, f64)> = overlapping
            .iter()
            .filter(|(r, _)| r.device_type == device_type)
            .collect();
        let number = with_device
            .iter()
            .copied()
            .reduce(|best, next| if next.1 > best.1 { next } else { best })
            .map_or(0, |(r, _)| r.device_number);
        let count: f64 = with_device
            .iter()
            .map(|(r, overlap)| r.valves_per_joint * overlap / JOINT_LENGTH_M)
            .sum();
        (number, count)
    } else {
        (0, 0.0)
    };

    Ok(TubingSegment {
        inner_diameter: widest.inner_diameter,
        outer_diameter: widest.outer_diameter,
        roughness: widest.roughness,
        device_type,
        device_number,
        device_count,
        ..segment
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnnulusType, SegmentDescription};

    fn row(start: f64, end: f64, device_type: DeviceType, vpj: f64) -> CompletionInterval {
        CompletionInterval {
            well: "A1".to_string(),
            branch: 1,
            start_md: start,
            end_md: end,
            inner_diameter: 0.15,
            outer_diameter: 0.22,
            roughness: 1e-5,
            annulus: AnnulusType::OpenAnnulus,
            valves_per_joint: vpj,
            device_type,
            device_number: 3,
            annulus_zone: 0,
        }
    }

    fn seg(start: f64, end: f64) -> TubingSegment {
        TubingSegment::spanning(start, end, SegmentDescription::Original)
    }

    #[test]
    fn test_device_count_from_valves_per_joint() {
        let completion = vec![
            row(0.0, 200.0, DeviceType::Perf, 0.0),
            row(200.0, 600.0, DeviceType::Icd, 1.0),
        ];
        let out = get_devices("A1", 1, vec![seg(200.0, 600.0)], &completion).unwrap();
        assert_eq!(out[0].device_type, DeviceType::Icd);
        assert_eq!(out[0].device_number, 3);
        assert!((out[0].device_count - 400.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_active_device_wins_over_perf() {
        let completion = vec![
            row(0.0, 10.0, DeviceType::Perf, 0.0),
            row(10.0, 12.0, DeviceType::Aicd, 2.0),
        ];
        let out = get_devices("A1", 1, vec![seg(0.0, 12.0)], &completion).unwrap();
        assert_eq!(out[0].device_type, DeviceType::Aicd);
        assert!((out[0].device_count - 2.0 * 2.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_perf_only_segment_has_no_devices() {
        let completion = vec![row(0.0, 100.0, DeviceType::Perf, 0.0)];
        let out = get_devices("A1", 1, vec![seg(0.0, 50.0)], &completion).unwrap();
        assert_eq!(out[0].device_type, DeviceType::Perf);
        assert_eq!(out[0].device_count, 0.0);
        assert_eq!(out[0].inner_diameter, 0.15);
    }

    #[test]
    fn test_two_active_devices_are_ambiguous() {
        let completion = vec![
            row(0.0, 10.0, DeviceType::Icd, 1.0),
            row(10.0, 20.0, DeviceType::Aicv, 1.0),
        ];
        let err = get_devices("A1", 1, vec![seg(0.0, 20.0)], &completion).unwrap_err();
        assert!(matches!(
            err,
            CompletionError::AmbiguousDevice {
                first: DeviceType::Icd,
                second: DeviceType::Aicv,
                ..
            }
        ));
    }

    #[test]
    fn test_tubing_properties_from_largest_overlap() {
        let mut narrow = row(0.0, 5.0, DeviceType::Perf, 0.0);
        narrow.inner_diameter = 0.1;
        let mut wide = row(5.0, 20.0, DeviceType::Perf, 0.0);
        wide.inner_diameter = 0.2;
        wide.roughness = 2e-5;
        let out = get_devices("A1", 1, vec![seg(0.0, 20.0)], &[narrow, wide]).unwrap();
        assert_eq!(out[0].inner_diameter, 0.2);
        assert_eq!(out[0].roughness, 2e-5);
    }

    #[test]
    fn test_packer_segment_gets_no_devices() {
        let mut packer = row(10.0, 10.0, DeviceType::Perf, 0.0);
        packer.annulus = AnnulusType::Packer;
        let completion = vec![
            row(0.0, 10.0, DeviceType::Icd, 1.0),
            packer,
            row(10.0, 20.0, DeviceType::Icd, 1.0),
        ];
        let out = get_devices("A1", 1, vec![seg(10.0, 10.0)], &completion).unwrap();
        assert_eq!(out[0].device_type, DeviceType::Perf);
        assert_eq!(out[0].device_count, 0.0);
    }
}
