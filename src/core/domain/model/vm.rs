//! Domain models for QEMU virtual machines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loosely-typed API object (VM configuration, VM live status).
///
/// These payloads carry a variable set of keys (`scsi0`, `net3`, ...)
/// and are turned into typed records by the extractor.
pub type RawRecord = Map<String, Value>;

/// A virtual machine as returned by the `/nodes/{node}/qemu` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VmListItem {
    /// The VM identifier (unique per cluster).
    pub vmid: u32,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current status (e.g., "running", "stopped").
    #[serde(default)]
    pub status: String,
    /// Number of virtual CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<f64>,
    /// Maximum memory in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
    /// Uptime in seconds (if running).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Semicolon separated tags (if any).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl VmListItem {
    /// Returns true only for the exact status `running`.
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}
