//! Capacity reporting for Proxmox VE hosts.
//!
//! The crate logs in to each configured host, walks its node, storage and
//! QEMU endpoints, and turns the answers into per-node capacity aggregates,
//! detailed VM records and a linear growth projection.

mod auth;
pub mod core;
pub mod monitor;

use crate::core::{
    domain::{
        cluster_api::ClusterApi,
        model::{
            node_list_item::NodeListItem,
            node_status::NodeStatus,
            proxmox_connection::ProxmoxConnection,
            storage::{StorageListItem, StorageStatus},
            vm::{RawRecord, VmListItem},
        },
        value_object::{
            DEFAULT_PORT, DEFAULT_REALM, ProxmoxHost, ProxmoxPassword, ProxmoxPort, ProxmoxRealm,
            ProxmoxTicket, ProxmoxUrl, ProxmoxUsername, split_login, validate_host,
            validate_password, validate_port, validate_realm, validate_username,
        },
    },
    infrastructure::{api_client::ApiClient, app_config::AppConfig, credentials::HostCredentials},
};
use async_trait::async_trait;

pub use crate::core::domain::error::{ProxmoxError, ProxmoxResult, ValidationError};
pub use crate::core::infrastructure::client_config::{ClientConfig, RateLimitConfig};
pub use crate::core::infrastructure::retry_policy::RetryPolicy;

/// A client for the read-only Proxmox VE endpoints capacity reporting uses.
///
/// # Examples
///
/// ```no_run
/// use pve_capacity::{ProxmoxClient, ProxmoxResult};
/// use pve_capacity::core::domain::cluster_api::ClusterApi;
///
/// #[tokio::main]
/// async fn main() -> ProxmoxResult<()> {
///     let client = ProxmoxClient::builder()
///         .host("pve1.example.com")
///         .port(8006)
///         .credentials("monitor", "password", "pve")
///         .secure(true)
///         .build()?;
///
///     client.login().await?;
///     for node in client.nodes().await? {
///         println!("{} is {}", node.node, node.status);
///     }
///     Ok(())
/// }
/// ```
pub struct ProxmoxClient {
    pub(crate) api_client: ApiClient,
}

/// Builder for ProxmoxClient configuration.
///
/// Defaults to https on port 8006 and accepts self-signed certificates.
#[derive(Debug)]
pub struct ProxmoxClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    realm: Option<String>,
    secure: bool,
    accept_invalid_certs: bool,
    base_url: Option<String>,
    config: ClientConfig,
}

impl Default for ProxmoxClientBuilder {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            username: None,
            password: None,
            realm: None,
            secure: true,
            accept_invalid_certs: true,
            base_url: None,
            config: ClientConfig::default(),
        }
    }
}

impl ProxmoxClientBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self.realm = Some(realm.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Accept self-signed certificates. Proxmox ships with one by default.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Sends requests to `url` instead of the address derived from host,
    /// port and scheme. The host still names the server in logs and errors.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates every setting and creates an unauthenticated client.
    ///
    /// # Errors
    /// `ProxmoxError::Validation` for a missing or malformed setting.
    pub fn build(self) -> ProxmoxResult<ProxmoxClient> {
        let host = required("host", self.host)?;
        validate_host(&host)?;
        let port = self.port.unwrap_or(DEFAULT_PORT);
        validate_port(port)?;
        let username = required("username", self.username)?;
        validate_username(&username, self.config.block_reserved_usernames)?;
        let password = required("password", self.password)?;
        validate_password(&password)?;
        let realm = self.realm.unwrap_or_else(|| DEFAULT_REALM.to_string());
        validate_realm(&realm)?;

        let url = match &self.base_url {
            Some(raw) => ProxmoxUrl::parse(raw)?,
            None => ProxmoxUrl::from_parts(&host, port, self.secure)?,
        };

        let connection = ProxmoxConnection::new(
            ProxmoxHost::new_unchecked(host),
            ProxmoxPort::new_unchecked(port),
            ProxmoxUsername::new_unchecked(username),
            ProxmoxPassword::new_unchecked(password),
            ProxmoxRealm::new_unchecked(realm),
            self.secure,
            self.accept_invalid_certs,
            url,
        );

        Ok(ProxmoxClient {
            api_client: ApiClient::new(connection, self.config)?,
        })
    }
}

fn required(field: &str, value: Option<String>) -> ProxmoxResult<String> {
    value.ok_or_else(|| {
        ValidationError::Field {
            field: field.to_string(),
            message: format!("{} is required", field),
        }
        .into()
    })
}

impl ProxmoxClient {
    /// Creates a new builder for ProxmoxClient configuration
    pub fn builder() -> ProxmoxClientBuilder {
        ProxmoxClientBuilder::default()
    }

    /// Builds a client for one configured host and logs in.
    ///
    /// The login may carry its realm (`monitor@pve`); otherwise the
    /// configured default realm is used.
    pub async fn connect(
        host: &str,
        credentials: &HostCredentials,
        config: &AppConfig,
    ) -> ProxmoxResult<Self> {
        let (username, realm) = split_login(&credentials.username, &config.default_realm);
        let client = Self::builder()
            .host(host)
            .port(config.port)
            .credentials(username, credentials.password.as_str(), realm)
            .secure(config.secure)
            .accept_invalid_certs(config.accept_invalid_certs)
            .config(config.client_config())
            .build()?;
        client.login().await?;
        Ok(client)
    }

    /// Authenticates with the Proxmox server and stores the session ticket.
    ///
    /// # Errors
    /// `Authentication` for rejected credentials, `HostUnavailable` when the
    /// server cannot be reached within the retry budget.
    pub async fn login(&self) -> ProxmoxResult<()> {
        self.api_client.login().await
    }

    /// Returns true while the stored ticket is still fresh.
    pub async fn is_authenticated(&self) -> bool {
        self.api_client.is_authenticated().await
    }

    /// Returns the current session ticket, if logged in.
    pub async fn auth_token(&self) -> Option<ProxmoxTicket> {
        self.api_client.auth().await.map(|auth| auth.ticket().clone())
    }

    pub fn host(&self) -> &str {
        self.api_client.connection().host().as_str()
    }
}

#[async_trait]
impl ClusterApi for ProxmoxClient {
    async fn nodes(&self) -> ProxmoxResult<Vec<NodeListItem>> {
        self.api_client.get("nodes").await
    }

    async fn node_status(&self, node: &str) -> ProxmoxResult<NodeStatus> {
        self.api_client.get(&format!("nodes/{}/status", node)).await
    }

    async fn storages(&self, node: &str) -> ProxmoxResult<Vec<StorageListItem>> {
        self.api_client.get(&format!("nodes/{}/storage", node)).await
    }

    async fn storage_status(&self, node: &str, storage: &str) -> ProxmoxResult<StorageStatus> {
        self.api_client
            .get(&format!("nodes/{}/storage/{}/status", node, storage))
            .await
    }

    async fn vms(&self, node: &str) -> ProxmoxResult<Vec<VmListItem>> {
        self.api_client.get(&format!("nodes/{}/qemu", node)).await
    }

    async fn vm_config(&self, node: &str, vmid: u32) -> ProxmoxResult<RawRecord> {
        self.api_client
            .get(&format!("nodes/{}/qemu/{}/config", node, vmid))
            .await
    }

    async fn vm_status_current(&self, node: &str, vmid: u32) -> ProxmoxResult<RawRecord> {
        self.api_client
            .get(&format!("nodes/{}/qemu/{}/status/current", node, vmid))
            .await
    }
}

#[cfg(test)]
mod tests;
