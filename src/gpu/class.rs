// Vendor and class reference data for PCI device classification

use crate::gpu::DeviceDescriptor;

/// PCI vendor ID assigned to NVIDIA
pub const NVIDIA_VENDOR_ID: &str = "10de";

/// Class codes of display controllers: VGA, 3D and "other display".
/// Audio (0x040300) and bridge functions on the same card are excluded.
pub const GPU_CLASS_CODES: &[&str] = &["0x030000", "0x030200", "0x038000"];

/// The registry used by the probe
pub static DEFAULT_REGISTRY: VendorClassRegistry =
    VendorClassRegistry::new(NVIDIA_VENDOR_ID, GPU_CLASS_CODES);

/// Which vendor counts as NVIDIA and which class codes count as GPUs
#[derive(Debug, Clone, Copy)]
pub struct VendorClassRegistry {
    nvidia_vendor_id: &'static str,
    gpu_classes: &'static [&'static str],
}

impl VendorClassRegistry {
    pub const fn new(
        nvidia_vendor_id: &'static str,
        gpu_classes: &'static [&'static str],
    ) -> Self {
        Self {
            nvidia_vendor_id,
            gpu_classes,
        }
    }

    /// Exact, case-sensitive vendor ID comparison
    pub fn is_nvidia_device(&self, device: &DeviceDescriptor) -> bool {
        device.vendor_id == self.nvidia_vendor_id
    }

    /// Class code membership test
    pub fn is_gpu(&self, device: &DeviceDescriptor) -> bool {
        self.gpu_classes.contains(&device.pci_class.as_str())
    }

    pub fn is_nvidia_gpu(&self, device: &DeviceDescriptor) -> bool {
        self.is_nvidia_device(device) && self.is_gpu(device)
    }
}

impl Default for VendorClassRegistry {
    fn default() -> Self {
        DEFAULT_REGISTRY
    }
}
