use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{node_aggregate::ClusterSnapshot, vm_record::VmRecord};

/// Export shape of a `monitor` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub timestamp: DateTime<Utc>,
    pub growth_prediction: u64,
    pub server_data: ClusterSnapshot,
}

impl ClusterReport {
    pub fn new(server_data: ClusterSnapshot, growth_prediction: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            growth_prediction,
            server_data,
        }
    }
}

/// Export shape of a `vms` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmReport {
    pub timestamp: DateTime<Utc>,
    pub total_vms: usize,
    pub vms: Vec<VmRecord>,
}

impl VmReport {
    pub fn new(vms: Vec<VmRecord>) -> Self {
        Self {
            timestamp: Utc::now(),
            total_vms: vms.len(),
            vms,
        }
    }
}
