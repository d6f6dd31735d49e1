use crate::core::domain::error::ValidationError;

/// The realm used when a login carries none.
pub const DEFAULT_REALM: &str = "pam";

/// A validated Proxmox authentication realm (e.g. `pam`, `pve`, an LDAP realm id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxRealm(String);

impl ProxmoxRealm {
    /// Creates a new realm without validation.
    pub(crate) fn new_unchecked(realm: String) -> Self {
        Self(realm)
    }

    /// Returns the realm as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validates a realm identifier.
///
/// Realm ids are user-defined, so only the character set and length are checked.
pub(crate) fn validate_realm(realm: &str) -> Result<(), ValidationError> {
    if realm.is_empty() {
        return Err(ValidationError::Field {
            field: "realm".to_string(),
            message: "Realm cannot be empty".to_string(),
        });
    }
    if realm.len() > 32 {
        return Err(ValidationError::Format(
            "Realm length must be at most 32 characters".to_string(),
        ));
    }
    if !realm
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::Format(
            "Realm contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_realm() {
        assert!(validate_realm("pam").is_ok());
        assert!(validate_realm("pve").is_ok());
        assert!(validate_realm("corp-ad").is_ok());
        assert!(validate_realm("").is_err());
        assert!(validate_realm("pa m").is_err());
        assert!(validate_realm(&"r".repeat(33)).is_err());
    }
}
