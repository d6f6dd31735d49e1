use crate::core::domain::error::ValidationError;
use url::Url;

/// Root of the JSON flavour of the Proxmox API.
const API_ROOT: &str = "api2/json";

/// The validated base URL of a Proxmox API endpoint (`https://host:port/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxUrl(Url);

impl ProxmoxUrl {
    /// Builds the base URL from its parts.
    pub(crate) fn from_parts(host: &str, port: u16, secure: bool) -> Result<Self, ValidationError> {
        let scheme = if secure { "https" } else { "http" };
        let raw = format!("{}://{}:{}/", scheme, host, port);
        Self::parse(&raw)
    }

    /// Parses a base URL; only `http` and `https` are accepted.
    pub(crate) fn parse(raw: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(raw)
            .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::ConstraintViolation(format!(
                "Invalid scheme '{}'. Must be one of: http, https",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(ValidationError::Field {
                field: "url".to_string(),
                message: "URL must contain a host".to_string(),
            });
        }
        Ok(Self(url))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the full URL of an API path such as `nodes/pve1/status`.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.0.as_str().trim_end_matches('/'),
            API_ROOT,
            path.trim_start_matches('/')
        )
    }
}
