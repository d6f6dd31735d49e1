use crate::core::domain::error::ValidationError;

/// A validated Proxmox username (without the realm part).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxUsername(String);

impl ProxmoxUsername {
    /// Creates a new username without validation.
    pub(crate) fn new_unchecked(username: String) -> Self {
        Self(username)
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Splits a `user@realm` login into its parts.
///
/// A login without `@` gets `default_realm`.
pub fn split_login<'a>(login: &'a str, default_realm: &'a str) -> (&'a str, &'a str) {
    match login.rsplit_once('@') {
        Some((user, realm)) if !realm.is_empty() => (user, realm),
        Some((user, _)) => (user, default_realm),
        None => (login, default_realm),
    }
}

/// Validates a username according to the configuration.
pub(crate) fn validate_username(
    username: &str,
    block_reserved: bool,
) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Field {
            field: "username".to_string(),
            message: "Username cannot be empty".to_string(),
        });
    }
    if username.len() > 64 {
        return Err(ValidationError::Format(format!(
            "Username length must be at most 64 characters (got {})",
            username.len()
        )));
    }
    let allowed =
        |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '@';
    if !username.chars().all(allowed) {
        return Err(ValidationError::Format(
            "Username contains invalid characters. Allowed: alphanumeric, -, _, ., @".to_string(),
        ));
    }
    if block_reserved {
        let reserved = ["root", "admin", "administrator"];
        if reserved.contains(&username) {
            return Err(ValidationError::ConstraintViolation(format!(
                "Username '{}' is reserved",
                username
            )));
        }
    }
    Ok(())
}
