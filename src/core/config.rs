// Probe configuration

use std::path::PathBuf;

use crate::core::distro::OS_RELEASE_PATH;
use crate::core::switch_tool::SWITCH_TOOL;
use crate::gpu::detection::PCI_DEVICE_PATH;

/// Paths and tool names the probe looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub pci_device_path: PathBuf,
    pub os_release_path: String,
    pub switch_tool: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            pci_device_path: PathBuf::from(PCI_DEVICE_PATH),
            os_release_path: OS_RELEASE_PATH.to_string(),
            switch_tool: SWITCH_TOOL.to_string(),
        }
    }
}
