use crate::core::domain::error::ValidationError;

/// A Proxmox CSRF protection token, sent with every authenticated request.
#[derive(Debug, Clone)]
pub struct ProxmoxCSRFToken(String);

impl ProxmoxCSRFToken {
    /// Creates a new CSRF token without validation.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validates the format of a CSRF token string (`HEXID:VALUE`).
pub(crate) fn validate_csrf_token(token: &str) -> Result<(), ValidationError> {
    if token.is_empty() {
        return Err(ValidationError::Field {
            field: "csrf_token".to_string(),
            message: "CSRF token cannot be empty".to_string(),
        });
    }
    match token.split_once(':') {
        Some((id, value)) if !value.contains(':') => {
            if id.len() != 8 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ValidationError::Format(
                    "Token ID must be 8 hexadecimal characters".to_string(),
                ));
            }
            Ok(())
        }
        _ => Err(ValidationError::Format(
            "CSRF token must be in format TOKENID:VALUE".to_string(),
        )),
    }
}
