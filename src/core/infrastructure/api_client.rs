//! Internal HTTP client that handles authentication, retries and automatic ticket refresh.

use crate::{
    auth::application::service::login_service::LoginService,
    core::{
        domain::{
            error::{ProxmoxError, ProxmoxResult, ValidationError},
            model::{proxmox_auth::ProxmoxAuth, proxmox_connection::ProxmoxConnection},
        },
        infrastructure::client_config::ClientConfig,
    },
};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// The `{"data": ...}` envelope every Proxmox API answer is wrapped in.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub data: T,
}

/// Internal HTTP client that manages authentication and provides read access to the Proxmox API.
///
/// This client automatically adds the necessary authentication headers (`PVEAuthCookie` and
/// `CSRFPreventionToken`) to each request. If a request receives a `401 Unauthorized` response,
/// it refreshes the ticket once using the stored credentials and retries the request.
/// Transport failures are retried according to [`ClientConfig::retry`].
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<ProxmoxConnection>,
    auth: Arc<RwLock<Option<ProxmoxAuth>>>,
    config: Arc<ClientConfig>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`. The client starts unauthenticated.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Connection` if the HTTP client cannot be built, or
    /// `ProxmoxError::Validation` for a zero rate limit.
    pub fn new(connection: ProxmoxConnection, config: ClientConfig) -> ProxmoxResult<Self> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(connection.accept_invalid_certs())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProxmoxError::Connection(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let rate = non_zero("requests_per_second", rl.requests_per_second)?;
                let burst = non_zero("burst_size", rl.burst_size)?;
                let quota = Quota::per_second(rate).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        debug!(
            host = connection.host().as_str(),
            url = connection.url().as_str(),
            secure = connection.is_secure(),
            rate_limited = rate_limiter.is_some(),
            "API client ready"
        );

        Ok(Self {
            http_client,
            connection: Arc::new(connection),
            auth: Arc::new(RwLock::new(None)),
            config: Arc::new(config),
            rate_limiter,
        })
    }

    /// Returns a reference to the underlying connection details.
    pub fn connection(&self) -> &ProxmoxConnection {
        &self.connection
    }

    /// Sets the authentication state (used after a successful login).
    pub async fn set_auth(&self, auth: ProxmoxAuth) {
        let mut lock = self.auth.write().await;
        *lock = Some(auth);
    }

    /// Returns the current authentication state, if any.
    pub async fn auth(&self) -> Option<ProxmoxAuth> {
        self.auth.read().await.clone()
    }

    /// Returns `true` if there is a valid (non‑expired) ticket.
    pub async fn is_authenticated(&self) -> bool {
        let lock = self.auth.read().await;
        lock.as_ref()
            .map(|a| !a.needs_refresh(self.config.ticket_lifetime))
            .unwrap_or(false)
    }

    /// Performs a fresh login and stores the resulting ticket.
    ///
    /// Transport failures are retried like any other request.
    pub async fn login(&self) -> ProxmoxResult<()> {
        let host = self.connection.host().as_str();
        self.config
            .retry
            .run(host, || self.refresh_auth())
            .await
    }

    /// Performs an authenticated GET request and unwraps the `data` envelope.
    ///
    /// # Type Parameters
    /// - `T`: The expected payload type (must implement `DeserializeOwned`).
    ///
    /// # Errors
    /// Returns `ProxmoxError::HostUnavailable` once transport retries are exhausted,
    /// `ProxmoxError::Api` for non-success statuses and
    /// `ProxmoxError::MalformedResponse` when the body does not parse.
    pub async fn get<T>(&self, path: &str) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        let host = self.connection.host().as_str();
        self.config
            .retry
            .run(host, || self.execute_request(path))
            .await
    }

    /// One attempt: ensures authentication, sends the request,
    /// handles 401 by refreshing once, and parses the response.
    async fn execute_request<T>(&self, path: &str) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        // Ensure we have a valid ticket (refresh if needed)
        self.ensure_authenticated().await?;

        let response = self.send(path).await?;

        // Handle 401 Unauthorized: refresh once and retry
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!(path, "Ticket rejected, refreshing");
            self.refresh_auth().await?;
            let response = self.send(path).await?;
            return Self::parse_response(response).await;
        }

        Self::parse_response(response).await
    }

    async fn send(&self, path: &str) -> ProxmoxResult<reqwest::Response> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.connection.url().api_url(path);
        debug!(%url, "GET");
        let mut req_builder = self.http_client.get(&url);
        if let Some(auth) = self.auth.read().await.as_ref() {
            req_builder = auth.authorize(req_builder);
        }

        req_builder
            .send()
            .await
            .map_err(|e| ProxmoxError::Transport(format!("HTTP request failed: {}", e)))
    }

    async fn parse_response<T>(response: reqwest::Response) -> ProxmoxResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(ProxmoxError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProxmoxError::Transport(format!("Failed to read response: {}", e)))?;

        serde_json::from_slice::<ApiResponse<T>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|e| ProxmoxError::MalformedResponse(format!("Failed to parse response: {}", e)))
    }

    /// Ensures that we have a valid (non‑expired) ticket. If not, attempts to refresh.
    async fn ensure_authenticated(&self) -> ProxmoxResult<()> {
        let need_refresh = {
            let auth_guard = self.auth.read().await;
            match auth_guard.as_ref() {
                Some(auth) => auth.needs_refresh(self.config.ticket_lifetime),
                None => true,
            }
        };

        if need_refresh {
            self.refresh_auth().await?;
        }
        Ok(())
    }

    /// Performs a fresh login using the stored credentials to obtain a new ticket.
    async fn refresh_auth(&self) -> ProxmoxResult<()> {
        let service = LoginService::new();
        let auth = service.execute(&self.http_client, &self.connection).await?;
        self.set_auth(auth).await;
        Ok(())
    }
}

fn non_zero(field: &str, value: u32) -> ProxmoxResult<NonZeroU32> {
    NonZeroU32::new(value).ok_or_else(|| {
        ValidationError::Field {
            field: field.to_string(),
            message: "Rate limit values must be greater than zero".to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        domain::value_object::{
            ProxmoxCSRFToken, ProxmoxHost, ProxmoxPassword, ProxmoxPort, ProxmoxRealm,
            ProxmoxTicket, ProxmoxUrl, ProxmoxUsername,
        },
        infrastructure::{client_config::RateLimitConfig, retry_policy::RetryPolicy},
    };
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    fn create_test_connection(server_url: &str) -> ProxmoxConnection {
        let host = ProxmoxHost::new_unchecked("pve1.test".to_string());
        let port = ProxmoxPort::new_unchecked(8006);
        let username = ProxmoxUsername::new_unchecked("testuser".to_string());
        let password = ProxmoxPassword::new_unchecked("testpass".to_string());
        let realm = ProxmoxRealm::new_unchecked("pam".to_string());
        let url = ProxmoxUrl::parse(&format!("{}/", server_url)).unwrap();
        ProxmoxConnection::new(host, port, username, password, realm, false, true, url)
    }

    fn create_test_auth() -> ProxmoxAuth {
        let ticket = ProxmoxTicket::new_unchecked("PVE:testuser@pam:4EEC61E2::sig".to_string());
        let csrf = ProxmoxCSRFToken::new_unchecked("4EEC61E2:token".to_string());
        ProxmoxAuth::new(ticket, Some(csrf))
    }

    fn fast_config() -> ClientConfig {
        ClientConfig {
            retry: RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(5)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_get_success_unwraps_data() {
        let mock_server = MockServer::start().await;
        let client = ApiClient::new(create_test_connection(&mock_server.uri()), fast_config())
            .unwrap();
        client.set_auth(create_test_auth()).await;

        Mock::given(method("GET"))
            .and(path("/api2/json/test"))
            .and(header("Cookie", "PVEAuthCookie=PVE:testuser@pam:4EEC61E2::sig"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": "ok"})),
            )
            .mount(&mock_server)
            .await;

        let result: String = client.get("test").await.unwrap();
        assert_eq!(result, "ok");
    }

    #[tokio::test]
    async fn test_unauthorized_triggers_refresh() {
        let mock_server = MockServer::start().await;
        let client = ApiClient::new(create_test_connection(&mock_server.uri()), fast_config())
            .unwrap();
        client.set_auth(create_test_auth()).await;

        // First GET returns 401
        Mock::given(method("GET"))
            .and(path("/api2/json/test"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api2/json/access/ticket"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "ticket": "PVE:testuser@pam:4EEC61E2::new_sig",
                    "CSRFPreventionToken": "4EEC61E2:abc123"
                }
            })))
            .mount(&mock_server)
            .await;

        // Second GET (retry) returns 200
        Mock::given(method("GET"))
            .and(path("/api2/json/test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": "ok"})),
            )
            .mount(&mock_server)
            .await;

        let result: String = client.get("test").await.unwrap();
        assert_eq!(result, "ok");

        let auth = client.auth().await.unwrap();
        assert_eq!(auth.ticket().as_str(), "PVE:testuser@pam:4EEC61E2::new_sig");
        assert_eq!(auth.csrf_token().unwrap().as_str(), "4EEC61E2:abc123");
    }

    #[tokio::test]
    async fn test_refresh_failure_returns_error() {
        let mock_server = MockServer::start().await;
        let client = ApiClient::new(create_test_connection(&mock_server.uri()), fast_config())
            .unwrap();

        Mock::given(method("POST"))
            .and(path("/api2/json/access/ticket"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let result: ProxmoxResult<String> = client.get("test").await;
        assert!(matches!(result, Err(ProxmoxError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mock_server = MockServer::start().await;
        let client = ApiClient::new(create_test_connection(&mock_server.uri()), fast_config())
            .unwrap();
        client.set_auth(create_test_auth()).await;

        Mock::given(method("GET"))
            .and(path("/api2/json/test"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result: ProxmoxResult<String> = client.get("test").await;
        match result {
            Err(ProxmoxError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_not_retried() {
        let mock_server = MockServer::start().await;
        let client = ApiClient::new(create_test_connection(&mock_server.uri()), fast_config())
            .unwrap();
        client.set_auth(create_test_auth()).await;

        Mock::given(method("GET"))
            .and(path("/api2/json/test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result: ProxmoxResult<String> = client.get("test").await;
        assert!(matches!(result, Err(ProxmoxError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_exhausts_retries() {
        // Bind and release a port so nothing is listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            ApiClient::new(create_test_connection(&format!("http://{}", addr)), fast_config())
                .unwrap();
        client.set_auth(create_test_auth()).await;

        let result: ProxmoxResult<String> = client.get("test").await;
        match result {
            Err(ProxmoxError::HostUnavailable { host, attempts, .. }) => {
                assert_eq!(host, "pve1.test");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_rate_limit_is_rejected() {
        let config = ClientConfig {
            rate_limit: Some(RateLimitConfig {
                requests_per_second: 0,
                burst_size: 1,
            }),
            ..Default::default()
        };
        let result = ApiClient::new(create_test_connection("http://127.0.0.1:1"), config);
        assert!(matches!(result, Err(ProxmoxError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_rate_limiting_delays_requests() {
        use std::time::Instant;

        let mock_server = MockServer::start().await;
        let config = ClientConfig {
            rate_limit: Some(RateLimitConfig {
                requests_per_second: 2,
                burst_size: 2,
            }),
            ..fast_config()
        };
        let client = ApiClient::new(create_test_connection(&mock_server.uri()), config).unwrap();
        client.set_auth(create_test_auth()).await;

        Mock::given(method("GET"))
            .and(path("/api2/json/test"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": "ok"})),
            )
            .expect(4)
            .mount(&mock_server)
            .await;

        // The burst passes immediately, the next two wait for the quota to refill.
        let start = Instant::now();
        for _ in 0..4 {
            client.get::<String>("test").await.unwrap();
        }
        assert!(start.elapsed() >= Duration::from_millis(900));
    }
}
