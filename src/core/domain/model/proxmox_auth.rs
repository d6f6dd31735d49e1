use crate::core::domain::value_object::{ProxmoxCSRFToken, ProxmoxTicket};
use reqwest::RequestBuilder;
use std::time::Duration;

/// Session state obtained from a successful login.
#[derive(Debug, Clone)]
pub struct ProxmoxAuth {
    ticket: ProxmoxTicket,
    csrf_token: Option<ProxmoxCSRFToken>,
}

impl ProxmoxAuth {
    pub fn new(ticket: ProxmoxTicket, csrf_token: Option<ProxmoxCSRFToken>) -> Self {
        Self { ticket, csrf_token }
    }

    pub fn ticket(&self) -> &ProxmoxTicket {
        &self.ticket
    }

    pub fn csrf_token(&self) -> Option<&ProxmoxCSRFToken> {
        self.csrf_token.as_ref()
    }

    /// True once the session is older than `lifetime` and must be renewed.
    pub fn needs_refresh(&self, lifetime: Duration) -> bool {
        self.ticket.is_expired(lifetime)
    }

    /// Adds the session cookie and CSRF header to a request.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Cookie", self.ticket.as_cookie_header());
        match &self.csrf_token {
            Some(csrf) => request.header("CSRFPreventionToken", csrf.as_str()),
            None => request,
        }
    }
}
