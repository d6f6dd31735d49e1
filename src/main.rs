mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use tracing::{error, info, warn};

use cli::{Command, CommonArgs, MonitorArgs, VmsArgs};
use pve_capacity::{
    ProxmoxClient, ProxmoxError,
    core::infrastructure::{
        app_config::AppConfig,
        credentials::CredentialStore,
        logging::{LogOptions, init_logging},
    },
    monitor::{
        application::service::{
            collector_service::{HostFailure, VmFilter, collect_host, collect_vm_records, poll_hosts},
            export_service::write_json,
        },
        domain::{
            model::{ClusterReport, ClusterSnapshot, VmReport},
            projector::predict_growth,
            statistics::VmStatistics,
        },
        presentation::{
            dashboard::{render_dashboard, render_server_vms},
            style::{Color, Palette},
            vm_view::{render_statistics, render_vm_details, render_vm_summary},
        },
    },
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const MONITOR_LOG_FILE: &str = "proxmox_monitor.log";
const VMS_LOG_FILE: &str = "proxmox_vm_details.log";

#[tokio::main]
async fn main() -> ExitCode {
    let command = match cli::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("{}", cli::usage());
            return ExitCode::from(2);
        }
    };

    let result = match command {
        Command::Help => {
            println!("{}", cli::usage());
            Ok(())
        }
        Command::Version => {
            println!("pve-capacity {}", VERSION);
            Ok(())
        }
        Command::Monitor(args) => run_monitor(args).await,
        Command::Vms(args) => run_vms(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if tracing::dispatcher::has_been_set() {
                error!("{:#}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(exit_code(&e))
        }
    }
}

/// 2 for configuration problems, 3 when no host produced data, 1 otherwise.
fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<ProxmoxError>() {
        Some(ProxmoxError::Configuration(_)) => 2,
        Some(ProxmoxError::NoData(_)) => 3,
        _ => 1,
    }
}

/// Loads settings, starts logging and decides on colors.
fn prepare(common: &CommonArgs, default_log: &str) -> anyhow::Result<(AppConfig, Palette)> {
    let mut config = AppConfig::from_env()?;
    if let Some(path) = &common.config {
        config.credentials_path = path.clone();
    }

    let color = !common.no_color && std::env::var_os("NO_COLOR").is_none();
    let log_file = config
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_log));
    init_logging(&LogOptions {
        verbose: common.verbose,
        color,
        file: Some(log_file),
    })?;
    if common.verbose {
        info!("Debug mode enabled");
    }

    Ok((config, Palette::new(color)))
}

fn print_banner(title: &str, width: usize, palette: Palette) {
    let rule = "=".repeat(width);
    println!(
        "\n{}\n",
        palette.bold(format!("{}\n{}\n{}", rule, title, rule), Color::Cyan)
    );
}

fn report_failures(failures: &[HostFailure], palette: Palette) {
    for failure in failures {
        println!(
            "{}",
            palette.paint(
                format!(
                    "Error: Failed to process server {}: {}",
                    failure.host, failure.error
                ),
                Color::Red
            )
        );
    }
}

async fn run_monitor(args: MonitorArgs) -> anyhow::Result<()> {
    let (config, palette) = prepare(&args.common, MONITOR_LOG_FILE)?;
    info!(
        credentials = %config.credentials_path.display(),
        "Starting Proxmox capacity monitor"
    );
    print_banner("PROXMOX CLUSTER MONITORING AND PREDICTION TOOL", 60, palette);

    let store = CredentialStore::load(&config.credentials_path)?;
    let config = &config;
    let outcome = poll_hosts(&store, move |host, credentials| async move {
        println!(
            "{}",
            palette.paint(format!("Processing server {}...", host), Color::Blue)
        );
        let client = ProxmoxClient::connect(&host, &credentials, config).await?;
        collect_host(&client, &host).await
    })
    .await;
    report_failures(&outcome.failed, palette);

    if outcome.succeeded.is_empty() {
        return Err(ProxmoxError::NoData("No data collected from any server".to_string()).into());
    }

    let snapshot: ClusterSnapshot = outcome.succeeded.into_iter().collect();
    if args.list_vms {
        for (server, nodes) in &snapshot {
            print!("{}", render_server_vms(server, nodes, palette));
        }
    }

    let prediction = predict_growth(&snapshot);
    if snapshot.values().flat_map(|nodes| nodes.values()).all(|n| n.vms_running == 0) {
        warn!("No running VMs found, cannot predict growth");
    }
    info!(prediction, "Predicted potential additional VMs");
    print!(
        "{}",
        render_dashboard(&snapshot, prediction, Local::now(), palette)
    );

    if args.common.export {
        let output = &args.common.output;
        write_json(&ClusterReport::new(snapshot, prediction), output)
            .await
            .with_context(|| format!("Failed to export {}", output.display()))?;
        println!(
            "{}",
            palette.paint(format!("Data exported to {}", output.display()), Color::Green)
        );
    }

    info!("Monitoring complete");
    println!("\n{}", palette.paint("Monitoring complete!", Color::Green));
    Ok(())
}

async fn run_vms(args: VmsArgs) -> anyhow::Result<()> {
    let (config, palette) = prepare(&args.common, VMS_LOG_FILE)?;
    info!(
        credentials = %config.credentials_path.display(),
        "Starting Proxmox VM details"
    );
    print_banner("PROXMOX VM DETAILS AND MONITORING TOOL", 70, palette);

    let store = CredentialStore::load(&config.credentials_path)?;
    let filter = VmFilter {
        status: args.status.clone(),
        name: args.name.clone(),
    };
    let (config, filter) = (&config, &filter);
    let outcome = poll_hosts(&store, move |host, credentials| async move {
        println!(
            "{}",
            palette.paint(format!("Processing server {}...", host), Color::Blue)
        );
        let client = ProxmoxClient::connect(&host, &credentials, config).await?;
        let vms = collect_vm_records(&client, &host, filter).await?;
        println!(
            "{}",
            palette.paint(format!("Found {} VMs on {}", vms.len(), host), Color::Green)
        );
        Ok(vms)
    })
    .await;
    report_failures(&outcome.failed, palette);

    let vms: Vec<_> = outcome
        .succeeded
        .into_iter()
        .flat_map(|(_, vms)| vms)
        .collect();
    if vms.is_empty() {
        return Err(ProxmoxError::NoData("No VMs found matching the criteria".to_string()).into());
    }

    print!("{}", render_vm_summary(&vms, palette));
    if args.stats {
        print!(
            "{}",
            render_statistics(&VmStatistics::from_records(&vms), palette)
        );
    }
    if (args.detailed || args.all_details) && !args.summary_only {
        print!("{}", render_vm_details(&vms, args.all_details, palette));
    }

    if args.common.export {
        let output = &args.common.output;
        write_json(&VmReport::new(vms), output)
            .await
            .with_context(|| format!("Failed to export {}", output.display()))?;
        println!(
            "{}",
            palette.paint(format!("VM data exported to {}", output.display()), Color::Green)
        );
    }

    info!("VM details complete");
    println!("\n{}", palette.paint("VM details monitoring complete!", Color::Green));
    Ok(())
}
