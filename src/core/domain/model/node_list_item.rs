use crate::core::domain::value_object::short_hostname;
use serde::{Deserialize, Serialize};

/// One entry of `GET /nodes`.
///
/// A host usually reports every member of its cluster here; capacity is only
/// read from the entry named after the host itself.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeListItem {
    pub node: String,
    /// "online", "offline" or "unknown".
    #[serde(default)]
    pub status: String,
}

impl NodeListItem {
    /// True when this node is the one served by `server` (matched on the
    /// first label of the address).
    pub fn is_local_to(&self, server: &str) -> bool {
        self.node == short_hostname(server)
    }
}
