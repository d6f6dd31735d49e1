//! Per-host polling: walks one Proxmox endpoint and turns what it reports
//! into node aggregates or flat VM record lists.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::{
    core::{
        domain::{
            cluster_api::ClusterApi,
            error::{ProxmoxError, ProxmoxResult},
            model::vm::VmListItem,
            value_object::short_hostname,
        },
        infrastructure::credentials::{CredentialStore, HostCredentials},
    },
    monitor::domain::{
        aggregator::{NodeCapacity, aggregate_node},
        extractor::{VmLocation, extract_vm_record},
        model::{NodeMap, VmRecord},
        units::bytes_to_gb,
    },
};

/// Selects which VMs a listing returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmFilter {
    /// Exact status (`running`, `stopped`).
    pub status: Option<String>,
    /// Case-insensitive substring of the VM name.
    pub name: Option<String>,
}

impl VmFilter {
    pub fn matches(&self, item: &VmListItem) -> bool {
        if let Some(status) = &self.status {
            if &item.status != status {
                return false;
            }
        }
        if let Some(needle) = &self.name {
            let name = item.name.as_deref().unwrap_or_default().to_lowercase();
            if !name.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// A host that could not be polled.
#[derive(Debug)]
pub struct HostFailure {
    pub host: String,
    pub error: ProxmoxError,
}

/// Results of polling every configured host.
#[derive(Debug)]
pub struct PollOutcome<T> {
    pub succeeded: Vec<(String, T)>,
    pub failed: Vec<HostFailure>,
}

impl<T> Default for PollOutcome<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Polls hosts one after another in credential order.
///
/// A failing host is recorded and logged; it never stops the hosts after it.
pub async fn poll_hosts<T, F, Fut>(credentials: &CredentialStore, mut poll: F) -> PollOutcome<T>
where
    F: FnMut(String, HostCredentials) -> Fut,
    Fut: Future<Output = ProxmoxResult<T>>,
{
    let mut outcome = PollOutcome::default();
    for (host, creds) in credentials.iter() {
        info!(host, "Polling server");
        match poll(host.to_string(), creds.clone()).await {
            Ok(value) => outcome.succeeded.push((host.to_string(), value)),
            Err(error) => {
                warn!(host, error = %error, "Skipping server");
                outcome.failed.push(HostFailure {
                    host: host.to_string(),
                    error,
                });
            }
        }
    }
    outcome
}

/// Aggregates every node of `server` whose name matches the server's
/// short hostname.
///
/// # Errors
/// `NoMatchingNode` when no node matches; any API failure except a
/// storage pool status read.
pub async fn collect_host<A>(api: &A, server: &str) -> ProxmoxResult<NodeMap>
where
    A: ClusterApi + ?Sized,
{
    let mut nodes = NodeMap::new();
    for node in local_nodes(api, server).await? {
        let capacity = node_capacity(api, &node).await?;
        let records = node_records(api, server, &node, &VmFilter::default()).await?;
        let aggregate = aggregate_node(capacity, records);
        debug!(
            server,
            node = node.as_str(),
            running = aggregate.vms_running,
            stopped = aggregate.vms_stopped,
            "Aggregated node"
        );
        nodes.insert(node, aggregate);
    }
    Ok(nodes)
}

/// Detailed records of the VMs on `server`'s own node(s) that pass `filter`.
pub async fn collect_vm_records<A>(
    api: &A,
    server: &str,
    filter: &VmFilter,
) -> ProxmoxResult<Vec<VmRecord>>
where
    A: ClusterApi + ?Sized,
{
    let mut records = Vec::new();
    for node in local_nodes(api, server).await? {
        records.extend(node_records(api, server, &node, filter).await?);
    }
    info!(server, count = records.len(), "Collected VM records");
    Ok(records)
}

async fn local_nodes<A>(api: &A, server: &str) -> ProxmoxResult<Vec<String>>
where
    A: ClusterApi + ?Sized,
{
    let nodes: Vec<String> = api
        .nodes()
        .await?
        .into_iter()
        .filter(|item| item.is_local_to(server))
        .map(|item| item.node)
        .collect();

    if nodes.is_empty() {
        return Err(ProxmoxError::NoMatchingNode {
            server: server.to_string(),
            node: short_hostname(server).to_string(),
        });
    }
    Ok(nodes)
}

async fn node_capacity<A>(api: &A, node: &str) -> ProxmoxResult<NodeCapacity>
where
    A: ClusterApi + ?Sized,
{
    let status = api.node_status(node).await?;

    let mut disk_max_gb = 0.0;
    for storage in api.storages(node).await?.iter().filter(|s| s.is_local()) {
        match api.storage_status(node, &storage.storage).await {
            Ok(pool) => disk_max_gb += bytes_to_gb(pool.total.unwrap_or(0) as f64),
            Err(e) => warn!(
                node,
                storage = storage.storage.as_str(),
                error = %e,
                "Could not get storage status"
            ),
        }
    }

    Ok(NodeCapacity {
        cpu_max: status.cpu_count(),
        mem_max_gb: bytes_to_gb(status.memory_total_bytes() as f64),
        disk_max_gb,
    })
}

async fn node_records<A>(
    api: &A,
    server: &str,
    node: &str,
    filter: &VmFilter,
) -> ProxmoxResult<Vec<VmRecord>>
where
    A: ClusterApi + ?Sized,
{
    let location = VmLocation { server, node };
    let mut records = Vec::new();

    for item in api.vms(node).await?.iter().filter(|item| filter.matches(item)) {
        let config = api.vm_config(node, item.vmid).await?;
        let live = if item.is_running() {
            match api.vm_status_current(node, item.vmid).await {
                Ok(live) => Some(live),
                Err(e) => {
                    debug!(node, vmid = item.vmid, error = %e, "No live status");
                    None
                }
            }
        } else {
            None
        };
        records.push(extract_vm_record(location, item, &config, live.as_ref()));
    }
    Ok(records)
}
