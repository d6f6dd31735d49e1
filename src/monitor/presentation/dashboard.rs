//! Console views of a cluster snapshot.

use std::fmt::Write;

use chrono::{DateTime, Local};

use super::{
    style::{Color, Palette, free_color, growth_color, status_color, stopped_color, utilization_color},
    table::Table,
};
use crate::monitor::domain::{
    aggregator::ClusterTotals,
    model::{ClusterSnapshot, NodeMap},
};

/// Prints a core count without a trailing `.0`.
pub(crate) fn format_count(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// The per-node capacity table with totals, growth and utilization.
pub fn render_dashboard(
    snapshot: &ClusterSnapshot,
    growth_prediction: u64,
    generated_at: DateTime<Local>,
    palette: Palette,
) -> String {
    let mut table = Table::new([
        "Server",
        "Node",
        "VMs Running",
        "VMs Stopped",
        "CPU Used",
        "CPU Free",
        "Mem Used (GB)",
        "Mem Free (GB)",
        "Disk Used (GB)",
        "Disk Free (GB)",
    ]);

    for (server, nodes) in snapshot {
        for (node, stats) in nodes {
            table.add_row(vec![
                server.clone(),
                node.clone(),
                stats.vms_running.to_string(),
                palette.paint(stats.vms_stopped, stopped_color(stats.vms_stopped)),
                format!(
                    "{}/{}",
                    format_count(stats.cpu_used.trunc()),
                    format_count(stats.cpu_max.trunc())
                ),
                palette.paint(
                    format_count(stats.cpu_free.trunc()),
                    free_color(stats.cpu_free, stats.cpu_max),
                ),
                format!("{:.2}/{:.2}", stats.mem_used, stats.mem_max),
                palette.paint(
                    format!("{:.2}", stats.mem_free),
                    free_color(stats.mem_free, stats.mem_max),
                ),
                format!("{:.2}/{:.2}", stats.disk_used, stats.disk_max),
                palette.paint(
                    format!("{:.2}", stats.disk_free),
                    free_color(stats.disk_free, stats.disk_max),
                ),
            ]);
        }
    }

    let totals = ClusterTotals::from_snapshot(snapshot);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{}",
        palette.bold(
            format!(
                "Proxmox Cluster Dashboard - {}",
                generated_at.format("%Y-%m-%d %H:%M:%S")
            ),
            Color::Cyan
        )
    );
    let _ = writeln!(out, "{}", table.render());
    let _ = writeln!(
        out,
        "\n{} {}",
        palette.paint(
            format!("Total VMs Running: {}, Total VMs Stopped:", totals.vms_running),
            Color::Blue
        ),
        palette.paint(totals.vms_stopped, stopped_color(totals.vms_stopped))
    );
    let _ = writeln!(
        out,
        "{} {}",
        palette.paint("Predicted additional VMs the cluster can support:", Color::Blue),
        palette.paint(growth_prediction, growth_color(growth_prediction))
    );

    let _ = writeln!(out, "\n{}", palette.bold("Resource Utilization:", Color::White));
    for (label, percent) in [
        ("CPU", totals.cpu_utilization()),
        ("Memory", totals.mem_utilization()),
        ("Disk", totals.disk_utilization()),
    ] {
        let _ = writeln!(
            out,
            "{}: {}",
            label,
            palette.paint(format!("{:.1}%", percent), utilization_color(percent))
        );
    }
    out
}

/// One table of VMs per node of `server`.
pub fn render_server_vms(server: &str, nodes: &NodeMap, palette: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n{}",
        palette.bold(format!("--- VMs on server {} ---", server), Color::Cyan)
    );

    for (node, stats) in nodes {
        let heading = palette.bold(format!("Node: {}", node), Color::Yellow);
        if stats.vm_details.is_empty() {
            let _ = writeln!(out, "\n{} - {}", heading, palette.paint("No VMs found", Color::Red));
            continue;
        }

        let mut table = Table::new(["VM Name", "Status", "CPU", "RAM (GB)", "Disk (GB)"]);
        for vm in &stats.vm_details {
            table.add_row(vec![
                vm.name.clone(),
                palette.paint(&vm.status, status_color(&vm.status)),
                format_count(vm.cpu_cores),
                format!("{:.2}", vm.memory_gb),
                format!("{:.2}", vm.disk_gb),
            ]);
        }
        let _ = writeln!(out, "\n{}", heading);
        let _ = writeln!(out, "{}", table.render());
    }
    out
}
