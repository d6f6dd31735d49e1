//! Read-only view of one Proxmox endpoint, as consumed by the collector.

use crate::core::domain::{
    error::ProxmoxResult,
    model::{
        node_list_item::NodeListItem,
        node_status::NodeStatus,
        storage::{StorageListItem, StorageStatus},
        vm::{RawRecord, VmListItem},
    },
};
use async_trait::async_trait;

/// The API calls capacity collection needs. Every call is an idempotent GET.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// `GET /nodes`
    async fn nodes(&self) -> ProxmoxResult<Vec<NodeListItem>>;

    /// `GET /nodes/{node}/status`
    async fn node_status(&self, node: &str) -> ProxmoxResult<NodeStatus>;

    /// `GET /nodes/{node}/storage`
    async fn storages(&self, node: &str) -> ProxmoxResult<Vec<StorageListItem>>;

    /// `GET /nodes/{node}/storage/{storage}/status`
    async fn storage_status(&self, node: &str, storage: &str) -> ProxmoxResult<StorageStatus>;

    /// `GET /nodes/{node}/qemu`
    async fn vms(&self, node: &str) -> ProxmoxResult<Vec<VmListItem>>;

    /// `GET /nodes/{node}/qemu/{vmid}/config`
    async fn vm_config(&self, node: &str, vmid: u32) -> ProxmoxResult<RawRecord>;

    /// `GET /nodes/{node}/qemu/{vmid}/status/current`
    async fn vm_status_current(&self, node: &str, vmid: u32) -> ProxmoxResult<RawRecord>;
}
