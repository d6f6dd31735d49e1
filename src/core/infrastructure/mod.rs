pub mod api_client;
pub mod app_config;
pub mod client_config;
pub mod credentials;
pub mod logging;
pub mod retry_policy;
