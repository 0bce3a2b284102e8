// GPU module for the Optimus capability probe
//
// This module handles PCI device description, classification and
// NVIDIA GPU detection

pub mod class;
pub mod detection;
pub mod nvidia;

use std::fmt;

use serde::Serialize;

/// Identity of one PCI-attached device, as read from its uevent file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    pub pci_class: String, // Class code, e.g. "0x030000"
    pub vendor_id: String, // Vendor ID (e.g., "10de" for NVIDIA)
    pub device_id: String, // Device ID
    pub bus_slot: String,  // domain:bus:device.function, e.g. "0000:01:00.0"
}

impl DeviceDescriptor {
    /// The `vendor:device` pair understood by `lspci -d`
    pub fn pci_id(&self) -> String {
        format!("{}:{}", self.vendor_id, self.device_id)
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [{}] class {}", self.bus_slot, self.pci_id(), self.pci_class)
    }
}

/// A metadata block that lacked one or more required keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteDevice {
    pub missing: Vec<&'static str>,
}

impl fmt::Display for IncompleteDevice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "incomplete device metadata, missing {}", self.missing.join(", "))
    }
}

/// Accumulates device properties until all of them are known
#[derive(Debug, Clone, Default)]
pub struct DeviceDescriptorBuilder {
    pci_class: Option<String>,
    vendor_id: Option<String>,
    device_id: Option<String>,
    bus_slot: Option<String>,
}

impl DeviceDescriptorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pci_class(&mut self, class: impl Into<String>) -> &mut Self {
        self.pci_class = Some(class.into());
        self
    }

    pub fn pci_id(
        &mut self,
        vendor_id: impl Into<String>,
        device_id: impl Into<String>,
    ) -> &mut Self {
        self.vendor_id = Some(vendor_id.into());
        self.device_id = Some(device_id.into());
        self
    }

    pub fn bus_slot(&mut self, slot: impl Into<String>) -> &mut Self {
        self.bus_slot = Some(slot.into());
        self
    }

    /// Yields the descriptor, or the list of keys that never showed up
    pub fn build(&self) -> Result<DeviceDescriptor, IncompleteDevice> {
        match (&self.pci_class, &self.vendor_id, &self.device_id, &self.bus_slot) {
            (Some(pci_class), Some(vendor_id), Some(device_id), Some(bus_slot)) => {
                Ok(DeviceDescriptor {
                    pci_class: pci_class.clone(),
                    vendor_id: vendor_id.clone(),
                    device_id: device_id.clone(),
                    bus_slot: bus_slot.clone(),
                })
            }
            _ => {
                let mut missing = Vec::new();
                if self.pci_class.is_none() {
                    missing.push("PCI_CLASS");
                }
                if self.vendor_id.is_none() || self.device_id.is_none() {
                    missing.push("PCI_ID");
                }
                if self.bus_slot.is_none() {
                    missing.push("PCI_SLOT_NAME");
                }
                Err(IncompleteDevice { missing })
            }
        }
    }
}

/// An NVIDIA GPU together with its human-readable model name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedGpu {
    #[serde(flatten)]
    pub descriptor: DeviceDescriptor,
    pub model_name: String,
}
