use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// NIC models Proxmox writes as the key of the MAC address attribute
/// (`virtio=BC:24:11:..`).
const NIC_MODELS: [&str; 4] = ["virtio", "e1000", "rtl8139", "vmxnet3"];

/// A virtual disk attached to a VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    /// Interface key (`scsi0`, `virtio1`, ...).
    pub interface: String,
    /// Backing storage pool (`local-lvm`), or the whole first segment
    /// when it carries no pool (`none`).
    pub storage: String,
    /// Volume inside the pool (`vm-100-disk-0`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    pub size_gb: f64,
    /// The configuration value as returned by the API.
    pub raw_config: String,
}

/// A virtual network interface attached to a VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    /// Interface key (`net0`, ...).
    pub interface: String,
    /// Bare segment of the configuration value, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Every `key=value` segment of the configuration value.
    pub attributes: BTreeMap<String, String>,
    pub raw_config: String,
}

impl NetworkInterface {
    fn model_attribute(&self) -> Option<(&str, &str)> {
        NIC_MODELS.iter().find_map(|model| {
            self.attributes
                .get_key_value(*model)
                .map(|(k, v)| (k.as_str(), v.as_str()))
        })
    }

    /// Model to display: the bare segment, else the NIC model key.
    pub fn display_model(&self) -> Option<&str> {
        self.model
            .as_deref()
            .or_else(|| self.model_attribute().map(|(model, _)| model))
    }

    pub fn mac_address(&self) -> Option<&str> {
        self.attributes
            .get("macaddr")
            .map(String::as_str)
            .or_else(|| self.model_attribute().map(|(_, mac)| mac))
    }

    pub fn bridge(&self) -> Option<&str> {
        self.attributes.get("bridge").map(String::as_str)
    }
}

/// Normalized view of one VM, built from its configuration and live status.
///
/// Every field is always present; missing source data maps to 0, `N/A`
/// or an empty collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmRecord {
    pub server: String,
    pub node: String,
    pub vmid: u32,
    pub name: String,
    pub status: String,

    pub cpu_cores: f64,
    pub sockets: f64,
    pub memory_mb: f64,
    pub memory_gb: f64,
    /// Sum of the sizes of all attached disks.
    pub disk_gb: f64,
    pub disks: Vec<DiskInfo>,
    pub networks: Vec<NetworkInterface>,

    pub boot_order: String,
    pub os_type: String,
    pub machine: String,
    pub bios: String,
    pub agent: String,
    pub template: bool,
    pub description: String,
    pub tags: String,

    pub cpu_usage_percent: f64,
    pub uptime_seconds: f64,
    pub uptime_formatted: String,
    pub memory_used_bytes: f64,
    pub memory_used_gb: f64,
    pub memory_max_bytes: f64,
    pub memory_max_gb: f64,
}

impl VmRecord {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}
