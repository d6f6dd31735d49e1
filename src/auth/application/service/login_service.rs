use crate::{
    auth::application::{
        request::login_request::LoginRequest, response::login_response::LoginResponse,
    },
    core::domain::{
        error::{ProxmoxError, ProxmoxResult, ValidationError},
        model::{proxmox_auth::ProxmoxAuth, proxmox_connection::ProxmoxConnection},
        value_object::{ProxmoxCSRFToken, ProxmoxTicket, validate_csrf_token, validate_ticket},
    },
};

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use tracing::debug;

/// Exchanges username and password for a session ticket.
pub struct LoginService {
    default_headers: HeaderMap,
}

impl LoginService {
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self { default_headers }
    }

    /// Logs in and returns the new session.
    ///
    /// # Errors
    /// `Transport` when the server cannot be reached (retryable),
    /// `Authentication` for rejected credentials, `Api`/`MalformedResponse`
    /// for unexpected answers.
    pub async fn execute(
        &self,
        client: &Client,
        connection: &ProxmoxConnection,
    ) -> ProxmoxResult<ProxmoxAuth> {
        let url = connection.url().api_url("access/ticket");
        let request = Self::build_login_request(connection);
        debug!(
            host = connection.host().as_str(),
            user = %request.username,
            realm = %request.realm,
            "Requesting ticket"
        );
        let response = self.send_request(client, &url, &request).await?;

        match response.status() {
            StatusCode::OK => Self::handle_successful_login(response).await,
            StatusCode::UNAUTHORIZED => Err(ProxmoxError::Authentication(
                "Invalid credentials provided".to_string(),
            )),
            StatusCode::BAD_REQUEST => Err(ValidationError::Field {
                field: "request".to_string(),
                message: "Invalid request format".to_string(),
            }
            .into()),
            StatusCode::NOT_FOUND => Err(ProxmoxError::Connection(
                "Login endpoint not found".to_string(),
            )),
            status => Err(ProxmoxError::Api {
                status: status.as_u16(),
                message: "Unexpected response to login request".to_string(),
            }),
        }
    }

    fn build_login_request(connection: &ProxmoxConnection) -> LoginRequest {
        LoginRequest {
            username: connection.username().as_str().to_string(),
            password: connection.password().as_str().to_string(),
            realm: connection.realm().as_str().to_string(),
        }
    }

    async fn send_request(
        &self,
        client: &Client,
        url: &str,
        request: &LoginRequest,
    ) -> ProxmoxResult<reqwest::Response> {
        client
            .post(url)
            .headers(self.default_headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ProxmoxError::Transport(format!("Login request failed: {}", e)))
    }

    async fn handle_successful_login(response: reqwest::Response) -> ProxmoxResult<ProxmoxAuth> {
        let login_response = response.json::<LoginResponse>().await.map_err(|e| {
            ProxmoxError::MalformedResponse(format!("Failed to parse login response: {}", e))
        })?;

        let data = login_response.data.ok_or_else(|| {
            ProxmoxError::Authentication("Login response carried no ticket".to_string())
        })?;

        debug!(user = data.username.as_deref().unwrap_or("?"), "Ticket issued");
        validate_ticket(&data.ticket)?;
        validate_csrf_token(&data.csrf_token)?;

        Ok(ProxmoxAuth::new(
            ProxmoxTicket::new_unchecked(data.ticket),
            Some(ProxmoxCSRFToken::new_unchecked(data.csrf_token)),
        ))
    }
}

impl Default for LoginService {
    fn default() -> Self {
        Self::new()
    }
}
