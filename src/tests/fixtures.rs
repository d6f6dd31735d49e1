use crate::monitor::domain::model::VmRecord;

/// A VM record on `pve1.example.com`/`pve1` named `vm-{vmid}`.
pub(crate) fn vm_record(
    vmid: u32,
    status: &str,
    cpu_cores: f64,
    memory_gb: f64,
    disk_gb: f64,
) -> VmRecord {
    VmRecord {
        server: "pve1.example.com".to_string(),
        node: "pve1".to_string(),
        vmid,
        name: format!("vm-{}", vmid),
        status: status.to_string(),
        cpu_cores,
        sockets: 1.0,
        memory_mb: memory_gb * 1024.0,
        memory_gb,
        disk_gb,
        disks: Vec::new(),
        networks: Vec::new(),
        boot_order: "N/A".to_string(),
        os_type: "N/A".to_string(),
        machine: "N/A".to_string(),
        bios: "N/A".to_string(),
        agent: "N/A".to_string(),
        template: false,
        description: String::new(),
        tags: String::new(),
        cpu_usage_percent: 0.0,
        uptime_seconds: 0.0,
        uptime_formatted: if status == "running" { "N/A" } else { "Stopped" }.to_string(),
        memory_used_bytes: 0.0,
        memory_used_gb: 0.0,
        memory_max_bytes: 0.0,
        memory_max_gb: 0.0,
    }
}
