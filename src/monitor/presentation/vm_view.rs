//! Console views of flat VM record lists.

use std::fmt::Write;

use super::{
    dashboard::format_count,
    style::{Color, Palette, cpu_usage_color, status_color},
    table::Table,
};
use crate::{
    core::domain::value_object::short_hostname,
    monitor::domain::{model::VmRecord, statistics::VmStatistics, units::format_bytes},
};

const NAME_WIDTH: usize = 20;
const OS_WIDTH: usize = 10;

/// Records ordered by (server, node, vmid).
fn sorted(vms: &[VmRecord]) -> Vec<&VmRecord> {
    let mut sorted: Vec<&VmRecord> = vms.iter().collect();
    sorted.sort_by(|a, b| {
        (a.server.as_str(), a.node.as_str(), a.vmid).cmp(&(b.server.as_str(), b.node.as_str(), b.vmid))
    });
    sorted
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn no_match(palette: Palette) -> String {
    format!("{}\n", palette.paint("No VMs found matching the criteria.", Color::Red))
}

pub fn render_vm_summary(vms: &[VmRecord], palette: Palette) -> String {
    if vms.is_empty() {
        return no_match(palette);
    }

    let mut table = Table::new([
        "Server", "Node", "VMID", "Name", "Status", "CPU", "RAM (GB)", "Disk (GB)", "Uptime",
        "CPU %", "OS Type",
    ]);
    for vm in sorted(vms) {
        let cpu = if vm.is_running() {
            palette.paint(
                format!("{:.1}%", vm.cpu_usage_percent),
                cpu_usage_color(vm.cpu_usage_percent),
            )
        } else {
            "N/A".to_string()
        };
        let os_type = if vm.os_type == "N/A" {
            vm.os_type.clone()
        } else {
            vm.os_type.chars().take(OS_WIDTH).collect()
        };

        table.add_row(vec![
            short_hostname(&vm.server).to_string(),
            vm.node.clone(),
            vm.vmid.to_string(),
            truncate(&vm.name, NAME_WIDTH),
            palette.paint(&vm.status, status_color(&vm.status)),
            format!("{}C/{}S", format_count(vm.cpu_cores), format_count(vm.sockets)),
            format!("{:.1}", vm.memory_gb),
            format!("{:.1}", vm.disk_gb),
            vm.uptime_formatted.clone(),
            cpu,
            os_type,
        ]);
    }

    format!(
        "\n{}\n{}\n",
        palette.bold(format!("VM Summary - {} VMs found", vms.len()), Color::Cyan),
        table.render()
    )
}

/// One block per VM. `all_details` adds the raw disk and network configs.
pub fn render_vm_details(vms: &[VmRecord], all_details: bool, palette: Palette) -> String {
    if vms.is_empty() {
        return no_match(palette);
    }

    let mut out = String::new();
    let rule = "=".repeat(80);
    for vm in sorted(vms) {
        let _ = writeln!(
            out,
            "\n{}",
            palette.bold(
                format!(
                    "{}\nVM: {} (ID: {}) on {}\n{}",
                    rule, vm.name, vm.vmid, vm.server, rule
                ),
                Color::Cyan
            )
        );

        let template = if vm.template { " [TEMPLATE]" } else { "" };
        let _ = writeln!(out, "{}", palette.paint("Basic Information:", Color::Yellow));
        let _ = writeln!(out, "  Server: {}", vm.server);
        let _ = writeln!(out, "  Node: {}", vm.node);
        let _ = writeln!(
            out,
            "  Status: {}{}",
            palette.paint(&vm.status, status_color(&vm.status)),
            template
        );
        let _ = writeln!(out, "  OS Type: {}", vm.os_type);
        let _ = writeln!(out, "  Machine: {}", vm.machine);
        let _ = writeln!(out, "  BIOS: {}", vm.bios);
        let _ = writeln!(out, "  Agent: {}", vm.agent);
        if !vm.description.is_empty() {
            let _ = writeln!(out, "  Description: {}", vm.description);
        }
        if !vm.tags.is_empty() {
            let _ = writeln!(out, "  Tags: {}", vm.tags);
        }

        let _ = writeln!(out, "\n{}", palette.paint("CPU & Memory:", Color::Yellow));
        let _ = writeln!(out, "  CPU Cores: {}", format_count(vm.cpu_cores));
        let _ = writeln!(out, "  CPU Sockets: {}", format_count(vm.sockets));
        let _ = writeln!(
            out,
            "  Memory: {:.2} GB ({} MB)",
            vm.memory_gb,
            format_count(vm.memory_mb)
        );
        if vm.is_running() {
            let _ = writeln!(
                out,
                "  CPU Usage: {}",
                palette.paint(
                    format!("{:.2}%", vm.cpu_usage_percent),
                    cpu_usage_color(vm.cpu_usage_percent)
                )
            );
            let _ = writeln!(
                out,
                "  Memory Used: {} / {}",
                format_bytes(Some(vm.memory_used_bytes)),
                format_bytes(Some(vm.memory_max_bytes))
            );
            let _ = writeln!(out, "  Uptime: {}", vm.uptime_formatted);
        }

        if !vm.disks.is_empty() {
            let _ = writeln!(out, "\n{}", palette.paint("Disk Information:", Color::Yellow));
            for disk in &vm.disks {
                let _ = writeln!(
                    out,
                    "  {}: {:.2} GB on {}",
                    disk.interface, disk.size_gb, disk.storage
                );
                if all_details {
                    let _ = writeln!(out, "    Raw config: {}", disk.raw_config);
                }
            }
            let _ = writeln!(out, "  Total Disk Space: {:.2} GB", vm.disk_gb);
        }

        if !vm.networks.is_empty() {
            let _ = writeln!(out, "\n{}", palette.paint("Network Information:", Color::Yellow));
            for net in &vm.networks {
                let _ = writeln!(
                    out,
                    "  {}: {} on {}",
                    net.interface,
                    net.display_model().unwrap_or("Unknown"),
                    net.bridge().unwrap_or("N/A")
                );
                if let Some(mac) = net.mac_address() {
                    let _ = writeln!(out, "    MAC: {}", mac);
                }
                if all_details {
                    let _ = writeln!(out, "    Raw config: {}", net.raw_config);
                }
            }
        }

        let _ = writeln!(out, "  Boot Order: {}", vm.boot_order);
    }
    out
}

pub fn render_statistics(stats: &VmStatistics, palette: Palette) -> String {
    let mut out = String::new();
    if stats.total == 0 {
        return out;
    }

    let _ = writeln!(out, "\n{}", palette.bold("VM Statistics", Color::Cyan));
    let _ = writeln!(out, "Total VMs: {}", stats.total);
    let _ = writeln!(out, "Running VMs: {}", palette.paint(stats.running, Color::Green));
    let _ = writeln!(out, "Stopped VMs: {}", palette.paint(stats.stopped, Color::Red));
    let _ = writeln!(out, "Templates: {}", stats.templates);

    if stats.running > 0 {
        let _ = writeln!(
            out,
            "\n{}",
            palette.paint("Resource Usage (Running VMs):", Color::Yellow)
        );
        let _ = writeln!(out, "Total CPU Cores: {}", format_count(stats.running_cores));
        let _ = writeln!(out, "Total Memory: {:.2} GB", stats.running_memory_gb);
        let _ = writeln!(out, "Average CPU Usage: {:.2}%", stats.average_cpu_usage);
        let _ = writeln!(out, "Total Disk Space (All VMs): {:.2} GB", stats.total_disk_gb);
    }

    if !stats.os_distribution.is_empty() {
        let _ = writeln!(out, "\n{}", palette.paint("OS Distribution:", Color::Yellow));
        for (os, count) in &stats.os_distribution {
            let _ = writeln!(out, "  {}: {}", os, count);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::domain::{
        model::{DiskInfo, NetworkInterface},
        units::BYTES_PER_GB,
    };
    use crate::tests::fixtures::vm_record;
    use std::collections::BTreeMap;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("exactly-twenty-chars", 20), "exactly-twenty-chars");
        assert_eq!(
            truncate("a-very-long-virtual-machine", 20),
            "a-very-long-virtual-..."
        );
    }

    #[test]
    fn test_summary_is_sorted() {
        let mut b = vm_record(200, "running", 2.0, 4.0, 20.0);
        b.server = "pve2.example.com".to_string();
        b.node = "pve2".to_string();
        b.cpu_usage_percent = 12.34;
        let a2 = vm_record(101, "stopped", 1.0, 1.0, 5.0);
        let a1 = vm_record(100, "running", 4.0, 8.0, 32.0);

        let out = render_vm_summary(&[b, a2, a1], Palette::plain());
        assert!(out.contains("VM Summary - 3 VMs found"));

        let rows: Vec<&str> = out.lines().filter(|l| l.starts_with("| pve")).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("| 100 "));
        assert!(rows[1].contains("| 101 "));
        assert!(rows[2].starts_with("| pve2 "));
        assert!(rows[2].contains("| 2C/1S "));
        assert!(rows[2].contains("| 12.3% "));
        assert!(rows[1].contains("| N/A "));
    }

    #[test]
    fn test_empty_lists() {
        let out = render_vm_summary(&[], Palette::plain());
        assert_eq!(out, "No VMs found matching the criteria.\n");
        assert_eq!(render_vm_details(&[], true, Palette::plain()), out);
        assert_eq!(
            render_statistics(&VmStatistics::default(), Palette::plain()),
            ""
        );
    }

    #[test]
    fn test_details() {
        let mut vm = vm_record(100, "running", 4.0, 8.0, 32.0);
        vm.template = true;
        vm.tags = "prod".to_string();
        vm.memory_used_bytes = 2.0 * BYTES_PER_GB;
        vm.memory_max_bytes = 8.0 * BYTES_PER_GB;
        vm.disks = vec![DiskInfo {
            interface: "scsi0".to_string(),
            storage: "local-lvm".to_string(),
            volume: Some("vm-100-disk-0".to_string()),
            size_gb: 32.0,
            raw_config: "local-lvm:vm-100-disk-0,size=32G".to_string(),
        }];
        vm.networks = vec![NetworkInterface {
            interface: "net0".to_string(),
            model: None,
            attributes: BTreeMap::from([
                ("virtio".to_string(), "BC:24:11:00:00:01".to_string()),
                ("bridge".to_string(), "vmbr0".to_string()),
            ]),
            raw_config: "virtio=BC:24:11:00:00:01,bridge=vmbr0".to_string(),
        }];

        let brief = render_vm_details(std::slice::from_ref(&vm), false, Palette::plain());
        assert!(brief.contains("VM: vm-100 (ID: 100) on pve1.example.com"));
        assert!(brief.contains("  Status: running [TEMPLATE]"));
        assert!(brief.contains("  Tags: prod"));
        assert!(!brief.contains("Description:"));
        assert!(brief.contains("  Memory: 8.00 GB (8192 MB)"));
        assert!(brief.contains("  Memory Used: 2.00 GB / 8.00 GB"));
        assert!(brief.contains("  scsi0: 32.00 GB on local-lvm"));
        assert!(brief.contains("  net0: virtio on vmbr0"));
        assert!(brief.contains("    MAC: BC:24:11:00:00:01"));
        assert!(!brief.contains("Raw config"));

        let full = render_vm_details(&[vm], true, Palette::plain());
        assert!(full.contains("    Raw config: local-lvm:vm-100-disk-0,size=32G"));
        assert!(full.contains("    Raw config: virtio=BC:24:11:00:00:01,bridge=vmbr0"));
    }

    #[test]
    fn test_statistics_view() {
        let mut running = vm_record(1, "running", 4.0, 8.0, 100.0);
        running.os_type = "l26".to_string();
        running.cpu_usage_percent = 25.0;
        let stopped = vm_record(2, "stopped", 2.0, 2.0, 50.0);

        let stats = VmStatistics::from_records(&[running, stopped]);
        let out = render_statistics(&stats, Palette::plain());
        assert!(out.contains("Total VMs: 2"));
        assert!(out.contains("Running VMs: 1"));
        assert!(out.contains("Total CPU Cores: 4"));
        assert!(out.contains("Average CPU Usage: 25.00%"));
        assert!(out.contains("Total Disk Space (All VMs): 150.00 GB"));
        assert!(out.contains("  l26: 1"));
        assert!(out.contains("  Unknown: 1"));
    }
}
