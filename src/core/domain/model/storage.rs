//! Domain models for the `/nodes/{node}/storage` endpoints.

use serde::{Deserialize, Serialize};

/// Storage plugin types backed by disks local to the node.
///
/// Shared and network storage (NFS, CIFS, Ceph, ...) is left out of
/// node capacity so that it is not counted once per node.
pub const LOCAL_STORAGE_TYPES: [&str; 4] = ["dir", "lvm", "lvmthin", "zfspool"];

/// A storage pool as listed by `/nodes/{node}/storage`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageListItem {
    /// Storage identifier (e.g., `local`, `local-lvm`).
    pub storage: String,
    /// Storage plugin type (e.g., `dir`, `zfspool`, `nfs`).
    #[serde(rename = "type", default)]
    pub storage_type: String,
    /// Allowed content types (e.g., `images,rootdir`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// 1 when the storage is active on this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<u8>,
    /// 1 when the storage is shared between nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<u8>,
    /// Total capacity in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Used space in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<u64>,
}

impl StorageListItem {
    /// Returns true if this pool contributes to node disk capacity.
    pub fn is_local(&self) -> bool {
        LOCAL_STORAGE_TYPES.contains(&self.storage_type.as_str())
    }
}

/// Status of a single pool from `/nodes/{node}/storage/{storage}/status`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StorageStatus {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    /// Total capacity in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Used space in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<u64>,
    /// Available space in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avail: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<u8>,
}
