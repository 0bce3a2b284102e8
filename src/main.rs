use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use optimus_probe::core::command::HostCommandRunner;
use optimus_probe::core::config::ProbeConfig;
use optimus_probe::core::context::ExecutionContext;
use optimus_probe::core::validator::SystemValidator;
use optimus_probe::gpu::detection::PCI_DEVICE_PATH;
use optimus_probe::ui;

#[derive(Parser, Debug)]
#[command(
    name = "optimus-probe",
    version,
    about = "Checks whether this host can run NVIDIA Optimus GPU switching"
)]
struct Args {
    /// Print a plain-text report instead of starting the TUI
    #[arg(long)]
    cli: bool,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "cli")]
    json: bool,

    /// Directory holding one entry per PCI device
    #[arg(long, value_name = "PATH", default_value = PCI_DEVICE_PATH)]
    sysfs_root: PathBuf,

    /// Log probe progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let interactive = !args.cli && !args.json;

    // stderr output would tear the TUI, so stay quiet there unless asked
    let default_level = match (args.verbose, interactive) {
        (true, _) => LevelFilter::Info,
        (false, true) => LevelFilter::Off,
        (false, false) => LevelFilter::Warn,
    };
    optimus_probe::init_logging(default_level);

    let context = ExecutionContext::from_env();
    let config = ProbeConfig {
        pci_device_path: args.sysfs_root,
        ..ProbeConfig::default()
    };
    log::debug!("Execution context: {:?}", context);

    if interactive {
        ui::run_tui(context, config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let runner = HostCommandRunner::for_context(&context);
    let validator = SystemValidator::new(&runner, context, config);

    let report = match validator.report() {
        Ok(report) => report,
        Err(e) => {
            log::error!("Probe failed: {}", e);
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Optimus Probe {}", optimus_probe::VERSION);
        println!("==================\n");
        print!("{}", report.summary());
    }

    Ok(if report.supported { ExitCode::SUCCESS } else { ExitCode::from(1) })
}
