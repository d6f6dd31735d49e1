use serde::Deserialize;

/// Body of `POST /access/ticket`. `data` is null for some rejected logins.
#[derive(Deserialize)]
pub struct LoginResponse {
    pub data: Option<LoginResponseData>,
}

#[derive(Deserialize)]
pub struct LoginResponseData {
    pub ticket: String,
    #[serde(rename = "CSRFPreventionToken")]
    pub csrf_token: String,
    /// The login as the server normalized it (`monitor@pve`).
    #[serde(default)]
    pub username: Option<String>,
}
