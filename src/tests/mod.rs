pub(crate) mod fixtures;
mod resources;

use crate::{ClientConfig, ProxmoxClient, RetryPolicy};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub(crate) const TEST_HOST: &str = "pve1.example.com";

pub(crate) fn fast_config() -> ClientConfig {
    ClientConfig {
        retry: RetryPolicy::new(2, Duration::from_millis(5), Duration::from_millis(10)),
        request_timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    }
}

pub(crate) async fn mount_login(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api2/json/access/ticket"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "ticket": "PVE:monitor@pve:66300A1B::c2lnbmF0dXJl",
                "CSRFPreventionToken": "66300A1B:Y3NyZg",
                "username": "monitor@pve"
            }
        })))
        .mount(mock_server)
        .await;
}

pub(crate) fn test_client(mock_server: &MockServer) -> ProxmoxClient {
    ProxmoxClient::builder()
        .host(TEST_HOST)
        .credentials("monitor", "s3cret-pass", "pve")
        .base_url(mock_server.uri())
        .config(fast_config())
        .build()
        .unwrap()
}

pub(crate) async fn logged_in_client(mock_server: &MockServer) -> ProxmoxClient {
    mount_login(mock_server).await;
    let client = test_client(mock_server);
    client.login().await.unwrap();
    client
}
