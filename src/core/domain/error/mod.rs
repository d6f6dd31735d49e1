use thiserror::Error;

/// The main error type for capacity collection.
///
/// This enum represents all possible errors that can occur while talking to
/// Proxmox hosts, loading configuration and writing reports.
#[derive(Error, Debug)]
pub enum ProxmoxError {
    /// Represents errors that occur while setting up a connection
    ///
    /// # Fields
    /// * `0` - A description of what went wrong during the connection attempt
    #[error("Connection error: {0}")]
    Connection(String),

    /// Represents authentication failures
    ///
    /// # Fields
    /// * `0` - A description of the authentication failure
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Represents validation failures with detailed context
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    #[error("Validation error: {source}")]
    Validation { source: ValidationError },

    /// A network-level failure (refused connection, timeout, reset).
    ///
    /// This is the only variant the retry policy retries.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The retry budget for a host was spent on transport failures.
    #[error("Host {host} unavailable after {attempts} attempts: {reason}")]
    HostUnavailable {
        host: String,
        attempts: u32,
        reason: String,
    },

    /// The API answered with a non-success HTTP status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered, but the body did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Missing or unusable configuration (credentials file, environment).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No host produced any data.
    #[error("No data collected: {0}")]
    NoData(String),

    /// None of the nodes reported by a host matches its hostname.
    #[error("No node named '{node}' on server {server}")]
    NoMatchingNode { server: String, node: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProxmoxError {
    /// Returns true for failures the retry policy may retry.
    pub fn is_transport(&self) -> bool {
        matches!(self, ProxmoxError::Transport(_))
    }
}

impl From<ValidationError> for ProxmoxError {
    fn from(error: ValidationError) -> Self {
        ProxmoxError::Validation { source: error }
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with a ProxmoxError
pub type ProxmoxResult<T> = Result<T, ProxmoxError>;
