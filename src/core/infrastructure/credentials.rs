//! The credentials file: which hosts to poll and how to log in to each.
//!
//! ```json
//! {
//!   "servers": {
//!     "pve1.example.com": { "username": "monitor@pve", "password": "..." }
//!   }
//! }
//! ```

use crate::core::domain::error::{ProxmoxError, ProxmoxResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Login for one host. The username may carry its realm (`root@pam`).
#[derive(Clone, Deserialize)]
pub struct HostCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for HostCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// All configured hosts, enumerated in lexicographic order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialStore {
    #[serde(default)]
    servers: BTreeMap<String, HostCredentials>,
}

impl CredentialStore {
    /// Reads and parses a credentials file.
    ///
    /// # Errors
    /// `ProxmoxError::Configuration` when the file is missing, unreadable,
    /// not valid JSON, or lists no servers.
    pub fn load(path: &Path) -> ProxmoxResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ProxmoxError::Configuration(format!(
                "Cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&text).map_err(|e| match e {
            ProxmoxError::Configuration(msg) => {
                ProxmoxError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parses credentials from JSON text.
    pub fn from_json(text: &str) -> ProxmoxResult<Self> {
        let store: CredentialStore = serde_json::from_str(text)
            .map_err(|e| ProxmoxError::Configuration(format!("Invalid credentials: {}", e)))?;
        if store.servers.is_empty() {
            return Err(ProxmoxError::Configuration(
                "No servers configured".to_string(),
            ));
        }
        Ok(store)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HostCredentials)> {
        self.servers
            .iter()
            .map(|(host, creds)| (host.as_str(), creds))
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl FromIterator<(String, HostCredentials)> for CredentialStore {
    fn from_iter<I: IntoIterator<Item = (String, HostCredentials)>>(iter: I) -> Self {
        Self {
            servers: iter.into_iter().collect(),
        }
    }
}
