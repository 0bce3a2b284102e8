// System capability aggregation for the Optimus capability probe
//
// A host supports GPU switching only when it has an NVIDIA GPU, runs a
// supported distribution and has the switching tool installed.

use serde::Serialize;

use crate::core::command::CommandRunner;
use crate::core::config::ProbeConfig;
use crate::core::context::ExecutionContext;
use crate::core::distro::{self, Distribution};
use crate::core::switch_tool;
use crate::error::Result;
use crate::gpu::detection::PciScanner;
use crate::gpu::DetectedGpu;

/// The three independent checks behind the support decision
pub trait CapabilitySource {
    fn has_switch_tool(&self) -> Result<bool>;

    fn has_nvidia_gpu(&self) -> Result<bool>;

    fn is_distro_supported(&self) -> Result<bool>;
}

/// Outcome of the three checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityVerdict {
    pub gpu_present: bool,
    pub distro_supported: bool,
    pub switch_tool_present: bool,
}

impl CapabilityVerdict {
    /// All checks must pass; there is no partial support
    pub fn is_supported(&self) -> bool {
        self.gpu_present && self.distro_supported && self.switch_tool_present
    }
}

/// Runs every check and collects the results
pub fn evaluate(source: &dyn CapabilitySource) -> Result<CapabilityVerdict> {
    Ok(CapabilityVerdict {
        switch_tool_present: source.has_switch_tool()?,
        gpu_present: source.has_nvidia_gpu()?,
        distro_supported: source.is_distro_supported()?,
    })
}

/// Whether the host can run the GPU switching workflow
pub fn is_system_supported(source: &dyn CapabilitySource) -> Result<bool> {
    Ok(evaluate(source)?.is_supported())
}

/// Everything the probe found, for display
#[derive(Debug, Clone, Serialize)]
pub struct SystemReport {
    pub context: ExecutionContext,
    pub distribution: Distribution,
    pub gpus: Vec<DetectedGpu>,
    pub verdict: CapabilityVerdict,
    pub supported: bool,
}

impl SystemReport {
    /// Returns a textual summary of the report
    pub fn summary(&self) -> String {
        let mut summary = String::new();
        let yes_no = |value: bool| if value { "Yes" } else { "No" };

        summary.push_str(&format!("Sandboxed: {}\n", yes_no(self.context.sandboxed)));
        summary.push_str(&format!("Display Server: {}\n", self.context.display_server));
        summary.push_str(&format!(
            "Distribution: {} ({})\n",
            self.distribution,
            if self.verdict.distro_supported { "supported" } else { "not supported" }
        ));
        summary.push_str(&format!(
            "Switching Tool: {}\n",
            yes_no(self.verdict.switch_tool_present)
        ));

        if self.gpus.is_empty() {
            summary.push_str("NVIDIA GPU: None\n");
        }
        for gpu in &self.gpus {
            summary.push_str(&format!(
                "NVIDIA GPU: {} ({})\n",
                gpu.model_name, gpu.descriptor.bus_slot
            ));
        }

        summary.push_str(&format!(
            "\nSystem {}\n",
            if self.supported { "supported" } else { "NOT supported" }
        ));
        summary
    }
}

/// Probes the real system
pub struct SystemValidator<'a> {
    runner: &'a dyn CommandRunner,
    context: ExecutionContext,
    config: ProbeConfig,
}

impl<'a> SystemValidator<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        context: ExecutionContext,
        config: ProbeConfig,
    ) -> Self {
        Self { runner, context, config }
    }

    pub fn scanner(&self) -> PciScanner<'a> {
        PciScanner::with_root(self.runner, self.config.pci_device_path.clone())
    }

    pub fn detect_distribution(&self) -> Result<Distribution> {
        distro::detect_distribution(self.runner, &self.config.os_release_path)
    }

    /// Runs every probe once and gathers the findings
    pub fn report(&self) -> Result<SystemReport> {
        let distribution = self.detect_distribution()?;
        let gpus = self.scanner().detect_nvidia_gpus()?;
        for gpu in &gpus {
            log::info!("NVIDIA GPU found: {}", gpu.model_name);
        }

        let verdict = CapabilityVerdict {
            gpu_present: !gpus.is_empty(),
            distro_supported: distribution.is_supported(),
            switch_tool_present: self.has_switch_tool()?,
        };

        Ok(SystemReport {
            context: self.context,
            distribution,
            gpus,
            verdict,
            supported: verdict.is_supported(),
        })
    }
}

impl CapabilitySource for SystemValidator<'_> {
    fn has_switch_tool(&self) -> Result<bool> {
        switch_tool::has_switch_tool(self.runner, self.context.sandboxed, &self.config.switch_tool)
    }

    fn has_nvidia_gpu(&self) -> Result<bool> {
        self.scanner().has_nvidia_gpu()
    }

    fn is_distro_supported(&self) -> Result<bool> {
        distro::is_distro_supported(self.runner, &self.config.os_release_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::testing::{Scripted, ScriptedRunner};
    use crate::error::ProbeError;
    use std::fs;
    use tempfile::TempDir;

    struct FixedSource {
        switch_tool: bool,
        gpu: bool,
        distro: bool,
    }

    impl CapabilitySource for FixedSource {
        fn has_switch_tool(&self) -> Result<bool> {
            Ok(self.switch_tool)
        }

        fn has_nvidia_gpu(&self) -> Result<bool> {
            Ok(self.gpu)
        }

        fn is_distro_supported(&self) -> Result<bool> {
            Ok(self.distro)
        }
    }

    struct FailingGpuProbe;

    impl CapabilitySource for FailingGpuProbe {
        fn has_switch_tool(&self) -> Result<bool> {
            Ok(true)
        }

        fn has_nvidia_gpu(&self) -> Result<bool> {
            Err(ProbeError::unsupported("no PCI bus"))
        }

        fn is_distro_supported(&self) -> Result<bool> {
            Ok(true)
        }
    }

    #[test]
    fn supported_only_when_every_check_passes() {
        for bits in 0..8u8 {
            let source = FixedSource {
                switch_tool: bits & 1 != 0,
                gpu: bits & 2 != 0,
                distro: bits & 4 != 0,
            };
            let supported = is_system_supported(&source).unwrap();
            assert_eq!(supported, bits == 7, "combination {:03b}", bits);
        }
    }

    #[test]
    fn check_errors_propagate() {
        assert!(is_system_supported(&FailingGpuProbe).is_err());
    }

    const UBUNTU: &str = "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\n";
    const RTX_3060: &str = "PCI_CLASS=30000\nPCI_ID=10DE:2560\nPCI_SLOT_NAME=0000:01:00.0\n";
    const RTX_3060_NAME: &str = "NVIDIA Corporation GA106M [GeForce RTX 3060 Mobile / Max-Q]";

    fn laptop_tree() -> TempDir {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("0000:01:00.0");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("uevent"), RTX_3060).unwrap();
        root
    }

    fn laptop_runner(has_tool: bool) -> ScriptedRunner {
        let which_reply = if has_tool {
            Scripted::Stdout("/usr/bin/prime-select\n".to_string())
        } else {
            Scripted::Exit(1)
        };
        ScriptedRunner::new()
            .on("cat /etc/os-release", Scripted::Stdout(UBUNTU.to_string()))
            .on(
                "lspci -d 10de:2560",
                Scripted::Stdout(format!("01:00.0 3D controller: {}\n", RTX_3060_NAME)),
            )
            .on("which prime-select", which_reply)
    }

    // The scripted runner plays the host, so every command is relayed to it
    fn sandboxed() -> ExecutionContext {
        ExecutionContext {
            sandboxed: true,
            ..ExecutionContext::host()
        }
    }

    fn config_for(root: &TempDir) -> ProbeConfig {
        ProbeConfig {
            pci_device_path: root.path().to_path_buf(),
            ..ProbeConfig::default()
        }
    }

    #[test]
    fn optimus_laptop_is_supported() {
        let root = laptop_tree();
        let runner = laptop_runner(true);
        let validator = SystemValidator::new(&runner, sandboxed(), config_for(&root));

        assert!(is_system_supported(&validator).unwrap());

        let report = validator.report().unwrap();
        assert!(report.supported);
        assert_eq!(report.distribution, Distribution::Ubuntu);
        assert_eq!(report.gpus.len(), 1);
        assert_eq!(report.gpus[0].model_name, RTX_3060_NAME);
        assert!(report.summary().contains("System supported"));
    }

    #[test]
    fn missing_switch_tool_is_unsupported() {
        let root = laptop_tree();
        let runner = laptop_runner(false);
        let validator = SystemValidator::new(&runner, sandboxed(), config_for(&root));

        let verdict = evaluate(&validator).unwrap();
        assert!(verdict.gpu_present);
        assert!(verdict.distro_supported);
        assert!(!verdict.switch_tool_present);
        assert!(!verdict.is_supported());
    }

    #[test]
    fn report_serializes_to_json() {
        let root = laptop_tree();
        let runner = laptop_runner(true);
        let validator = SystemValidator::new(&runner, sandboxed(), config_for(&root));

        let json = serde_json::to_value(validator.report().unwrap()).unwrap();
        assert_eq!(json["supported"], true);
        assert_eq!(json["distribution"], "Ubuntu");
        assert_eq!(json["gpus"][0]["vendor_id"], "10de");
        assert_eq!(json["gpus"][0]["bus_slot"], "0000:01:00.0");
    }
}
