//! Per-node aggregation and the cluster-wide rollup.

use serde::{Deserialize, Serialize};

use super::model::{ClusterSnapshot, NodeAggregate, VmRecord};

/// What a node offers, before any VM is accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeCapacity {
    pub cpu_max: f64,
    pub mem_max_gb: f64,
    /// Sum over node-local storage pools only.
    pub disk_max_gb: f64,
}

/// Folds a node's VM records into its aggregate.
///
/// Only running VMs count towards `*_used`. Free capacity is not clamped.
pub fn aggregate_node(capacity: NodeCapacity, records: Vec<VmRecord>) -> NodeAggregate {
    let mut aggregate = NodeAggregate {
        cpu_max: capacity.cpu_max,
        mem_max: capacity.mem_max_gb,
        disk_max: capacity.disk_max_gb,
        ..NodeAggregate::default()
    };

    for record in &records {
        if record.is_running() {
            aggregate.vms_running += 1;
            aggregate.cpu_used += record.cpu_cores;
            aggregate.mem_used += record.memory_gb;
            aggregate.disk_used += record.disk_gb;
        } else {
            aggregate.vms_stopped += 1;
        }
    }

    aggregate.cpu_free = aggregate.cpu_max - aggregate.cpu_used;
    aggregate.mem_free = aggregate.mem_max - aggregate.mem_used;
    aggregate.disk_free = aggregate.disk_max - aggregate.disk_used;
    aggregate.vm_details = records;
    aggregate
}

/// Sum of every node aggregate in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterTotals {
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
}

impl ClusterTotals {
    pub fn from_snapshot(snapshot: &ClusterSnapshot) -> Self {
        snapshot
            .values()
            .flat_map(|nodes| nodes.values())
            .fold(Self::default(), |mut totals, node| {
                totals.add(node);
                totals
            })
    }

    pub fn add(&mut self, node: &NodeAggregate) {
        self.vms_running += node.vms_running;
        self.vms_stopped += node.vms_stopped;
        self.cpu_used += node.cpu_used;
        self.cpu_free += node.cpu_free;
        self.cpu_max += node.cpu_max;
        self.mem_used += node.mem_used;
        self.mem_free += node.mem_free;
        self.mem_max += node.mem_max;
        self.disk_used += node.disk_used;
        self.disk_free += node.disk_free;
        self.disk_max += node.disk_max;
    }

    pub fn cpu_utilization(&self) -> f64 {
        percentage(self.cpu_used, self.cpu_max)
    }

    pub fn mem_utilization(&self) -> f64 {
        percentage(self.mem_used, self.mem_max)
    }

    pub fn disk_utilization(&self) -> f64 {
        percentage(self.disk_used, self.disk_max)
    }
}

fn percentage(used: f64, max: f64) -> f64 {
    if max > 0.0 { used / max * 100.0 } else { 0.0 }
}
