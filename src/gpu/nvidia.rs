// NVIDIA-specific GPU handling

use std::fmt;

use serde::Serialize;

use crate::error::{ProbeError, Result};
use crate::gpu::DeviceDescriptor;

/// NVIDIA GPU families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GpuArchitecture {
    Maxwell,
    Pascal,
    Turing,
    Ampere,
    AdaLovelace,
}

impl fmt::Display for GpuArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GpuArchitecture::Maxwell => write!(f, "Maxwell"),
            GpuArchitecture::Pascal => write!(f, "Pascal"),
            GpuArchitecture::Turing => write!(f, "Turing"),
            GpuArchitecture::Ampere => write!(f, "Ampere"),
            GpuArchitecture::AdaLovelace => write!(f, "Ada Lovelace"),
        }
    }
}

/// Maps a GPU onto its architecture family
pub fn resolve_architecture(device: &DeviceDescriptor) -> Result<GpuArchitecture> {
    // TODO: map device ID ranges to families once the switching workflow needs per-family handling
    Err(ProbeError::unsupported(format!(
        "architecture resolution for {}",
        device.pci_id()
    )))
}
