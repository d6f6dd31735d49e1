//! Domain model for node status from the `/nodes/{node}/status` endpoint.

use serde::{Deserialize, Serialize};

/// Detailed status information for a Proxmox node.
///
/// Every field is optional: a node that omits a figure is reported with
/// zero capacity for it instead of failing the whole host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NodeStatus {
    /// CPU usage (0.0 to 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    /// Physical memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryInfo>,
    /// Swap usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap: Option<MemoryInfo>,
    /// System uptime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Kernel version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kversion: Option<String>,
    /// IO delay (0.0 to 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<f64>,
    /// CPU model and topology.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpuinfo: Option<CpuInfo>,
    /// Proxmox VE version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pveversion: Option<String>,
}

impl NodeStatus {
    /// Number of logical CPUs the node exposes to guests.
    pub fn cpu_count(&self) -> f64 {
        self.cpuinfo
            .as_ref()
            .and_then(|info| info.cpus)
            .map(f64::from)
            .unwrap_or(0.0)
    }

    /// Total physical memory in bytes.
    pub fn memory_total_bytes(&self) -> u64 {
        self.memory.as_ref().and_then(|m| m.total).unwrap_or(0)
    }
}

/// Memory usage information, in bytes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MemoryInfo {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub used: Option<u64>,
    #[serde(default)]
    pub free: Option<u64>,
}

/// CPU topology as reported under `cpuinfo`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CpuInfo {
    /// Logical CPU count.
    #[serde(default)]
    pub cpus: Option<u32>,
    #[serde(default)]
    pub sockets: Option<u32>,
    #[serde(default)]
    pub cores: Option<u32>,
    #[serde(default)]
    pub model: Option<String>,
}
