use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::vm_record::VmRecord;

/// Capacity figures for one node, derived from its VM records.
///
/// `*_used` counts running VMs only. `*_free` is `max - used` and goes
/// negative when a node is overcommitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeAggregate {
    pub vms_running: u64,
    pub vms_stopped: u64,
    pub cpu_used: f64,
    pub cpu_free: f64,
    pub cpu_max: f64,
    pub mem_used: f64,
    pub mem_free: f64,
    pub mem_max: f64,
    pub disk_used: f64,
    pub disk_free: f64,
    pub disk_max: f64,
    pub vm_details: Vec<VmRecord>,
}

/// Node name to aggregate, for one server.
pub type NodeMap = BTreeMap<String, NodeAggregate>;

/// Server address to its nodes.
pub type ClusterSnapshot = BTreeMap<String, NodeMap>;
