//! User-authored completion table rows

use serde::{Deserialize, Serialize};

/// Standard tubing joint length (m) used to convert valves-per-joint into
/// a device count for a depth range.
pub const JOINT_LENGTH_M: f64 = 12.0;

/// Depth comparison tolerance (m)
pub const DEPTH_TOLERANCE_M: f64 = 1e-6;

/// Annulus content between tubing and casing / open hole
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AnnulusType {
    /// Open annulus
    #[serde(rename = "OA")]
    OpenAnnulus,
    /// Gravel pack
    #[serde(rename = "GP")]
    GravelPack,
    /// Packer (zero-length isolation point)
    #[serde(rename = "PA")]
    Packer,
}

impl AnnulusType {
    pub fn is_packer(self) -> bool {
        self == AnnulusType::Packer
    }
}

impl std::fmt::Display for AnnulusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnulusType::OpenAnnulus => write!(f, "OA"),
            AnnulusType::GravelPack => write!(f, "GP"),
            AnnulusType::Packer => write!(f, "PA"),
        }
    }
}

/// Flow-control device placed on the tubing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceType {
    /// Plain perforation, no device
    #[default]
    Perf,
    /// Autonomous inflow control device
    Aicd,
    /// Autonomous inflow control valve
    Aicv,
    /// Density activated recovery valve
    Dar,
    /// Inflow control device
    Icd,
    /// Valve
    Valve,
    /// Inflow control valve
    Icv,
}

impl DeviceType {
    /// Every device type except plain perforation counts as an active device.
    pub fn is_active(self) -> bool {
        self != DeviceType::Perf
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeviceType::Perf => "PERF",
            DeviceType::Aicd => "AICD",
            DeviceType::Aicv => "AICV",
            DeviceType::Dar => "DAR",
            DeviceType::Icd => "ICD",
            DeviceType::Valve => "VALVE",
            DeviceType::Icv => "ICV",
        };
        write!(f, "{label}")
    }
}

/// One row of the completion table.
///
/// Within a (well, branch) the rows are depth ordered and contiguous;
/// packer rows have `start_md == end_md`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionInterval {
    pub well: String,
    pub branch: u32,
    pub start_md: f64,
    pub end_md: f64,
    pub inner_diameter: f64,
    pub outer_diameter: f64,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    pub annulus: AnnulusType,
    #[serde(default)]
    pub valves_per_joint: f64,
    #[serde(default)]
    pub device_type: DeviceType,
    #[serde(default)]
    pub device_number: u32,
    /// Filled in by the annulus zone pass; never read from input.
    #[serde(skip)]
    pub annulus_zone: u32,
}

fn default_roughness() -> f64 {
    1e-5
}

impl CompletionInterval {
    pub fn length(&self) -> f64 {
        self.end_md - self.start_md
    }

    pub fn is_packer(&self) -> bool {
        self.annulus.is_packer()
    }

    /// Length of the overlap between this interval and `[start, end]`.
    pub fn overlap(&self, start: f64, end: f64) -> f64 {
        (self.end_md.min(end) - self.start_md.max(start)).max(0.0)
    }
}
