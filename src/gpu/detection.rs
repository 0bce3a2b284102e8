// GPU detection module for the Optimus capability probe
//
// This module walks the kernel's PCI device directory, parses each
// device's uevent metadata and picks out the NVIDIA display controllers.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::command::{CommandRunner, ExecutionError};
use crate::error::Result;
use crate::gpu::class::VendorClassRegistry;
use crate::gpu::{DetectedGpu, DeviceDescriptor, DeviceDescriptorBuilder, IncompleteDevice};

/// Where the kernel exposes one directory per PCI function
pub const PCI_DEVICE_PATH: &str = "/sys/bus/pci/devices";

/// Unparsed metadata of one PCI device directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeviceEntry {
    pub slot: String,       // Directory name, e.g. "0000:01:00.0"
    pub lines: Vec<String>, // KEY=VALUE lines of the uevent file
}

/// Scans the PCI bus through a command runner
pub struct PciScanner<'a> {
    runner: &'a dyn CommandRunner,
    device_root: PathBuf,
    registry: VendorClassRegistry,
}

impl<'a> PciScanner<'a> {
    /// Scanner over an arbitrary device directory
    pub fn with_root(runner: &'a dyn CommandRunner, device_root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            device_root: device_root.into(),
            registry: VendorClassRegistry::default(),
        }
    }

    pub fn registry(mut self, registry: VendorClassRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn device_root(&self) -> &Path {
        &self.device_root
    }

    /// Reads the uevent metadata of every device under the device root.
    /// Devices whose metadata cannot be read are skipped.
    pub fn enumerate_devices(&self) -> Result<Vec<RawDeviceEntry>> {
        let dir = match fs::read_dir(&self.device_root) {
            Ok(dir) => dir,
            Err(e) => {
                log::warn!("Cannot list {}: {}", self.device_root.display(), e);
                return Ok(Vec::new());
            }
        };

        let mut slots: Vec<String> = dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        slots.sort();

        let mut devices = Vec::with_capacity(slots.len());
        for slot in slots {
            let uevent_path = self.device_root.join(&slot).join("uevent");
            let uevent = uevent_path.to_string_lossy().into_owned();

            match self.runner.read_stdout(&["cat", uevent.as_str()]) {
                Ok(text) => devices.push(RawDeviceEntry {
                    slot,
                    lines: text.trim_end().lines().map(str::to_string).collect(),
                }),
                Err(e @ ExecutionError::Failed { .. }) => {
                    log::debug!("Skipping {}: {}", slot, e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(devices)
    }

    /// All NVIDIA display controllers on the bus
    pub fn find_nvidia_gpus(&self) -> Result<Vec<DeviceDescriptor>> {
        let gpus = self
            .enumerate_devices()?
            .iter()
            .filter_map(|entry| match parse_device_properties(&entry.lines) {
                Ok(descriptor) => Some(descriptor),
                Err(incomplete) => {
                    log::debug!("Ignoring {}: {}", entry.slot, incomplete);
                    None
                }
            })
            .filter(|descriptor| self.registry.is_nvidia_gpu(descriptor))
            .collect();

        Ok(gpus)
    }

    /// Looks up the marketing name of a device with `lspci -d`
    pub fn resolve_device_name(&self, device: &DeviceDescriptor) -> Result<String> {
        let pci_id = device.pci_id();
        let output = self.runner.read_stdout(&["lspci", "-d", &pci_id])?;
        Ok(device_name_from_lspci(&output))
    }

    /// NVIDIA GPUs with their resolved model names
    pub fn detect_nvidia_gpus(&self) -> Result<Vec<DetectedGpu>> {
        self.find_nvidia_gpus()?
            .into_iter()
            .map(|descriptor| {
                let model_name = self.resolve_device_name(&descriptor)?;
                Ok(DetectedGpu { descriptor, model_name })
            })
            .collect()
    }

    /// Whether at least one NVIDIA GPU sits on the bus. Each match is
    /// logged with its model name.
    pub fn has_nvidia_gpu(&self) -> Result<bool> {
        let gpus = self.detect_nvidia_gpus()?;
        for gpu in &gpus {
            log::info!("NVIDIA GPU found: {}", gpu.model_name);
        }
        Ok(!gpus.is_empty())
    }
}

/// Builds a descriptor from uevent lines.
///
/// Each line is split on its first `=`; lines without one and unknown
/// keys are ignored. Quotes are stripped from values. `PCI_ID` and class
/// codes are normalized to lowercase hex, and the class code to the
/// `0x`-prefixed six digit form, so `PCI_CLASS=30000` reads as `0x030000`.
pub fn parse_device_properties<S: AsRef<str>>(
    lines: &[S],
) -> std::result::Result<DeviceDescriptor, IncompleteDevice> {
    let mut builder = DeviceDescriptorBuilder::new();

    for line in lines {
        let Some((key, value)) = line.as_ref().split_once('=') else {
            continue;
        };
        let value = value.replace('"', "");
        let value = value.trim();

        match key.trim() {
            "PCI_CLASS" => {
                builder.pci_class(canonical_class_code(value));
            }
            "PCI_ID" => {
                if let Some((vendor_id, device_id)) = value.split_once(':') {
                    builder.pci_id(vendor_id.to_lowercase(), device_id.to_lowercase());
                }
            }
            "PCI_SLOT_NAME" => {
                builder.bus_slot(value);
            }
            _ => {}
        }
    }

    builder.build()
}

/// "30000", "0x30000" and "0x030000" all become "0x030000"
fn canonical_class_code(raw: &str) -> String {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw)
        .to_lowercase();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return raw.to_string();
    }
    format!("0x{:0>6}", digits)
}

/// Extracts the device description from `lspci` output: the text after
/// the last colon of the first line, or the whole line if it has none
pub fn device_name_from_lspci(output: &str) -> String {
    let line = output.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    line.rsplit(':').next().unwrap_or(line).trim().to_string()
}
