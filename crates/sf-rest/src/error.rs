//! Error types for sflite-rest.

/// Result type alias for sflite-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sflite-rest operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the call was refused because no session is established.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self.kind, ErrorKind::NotAuthenticated)
    }

    /// HTTP status of a mapped platform error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Salesforce { status, .. } | ErrorKind::Http { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Platform error code (e.g. `MALFORMED_ID`) of a mapped platform error.
    pub fn error_code(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Salesforce { error_code, .. } => Some(error_code),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// No session is established; nothing was sent.
    #[error("Not authenticated: log in or set a session first")]
    NotAuthenticated,

    /// The record's client handle has been dropped.
    #[error("Client is no longer available for this record")]
    ClientUnavailable,

    /// Username or password missing.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Non-2xx response carrying the platform's JSON error envelope.
    #[error("Salesforce error (HTTP {status}): {error_code} - {message}")]
    Salesforce {
        status: u16,
        error_code: String,
        message: String,
    },

    /// Non-2xx response with any other body.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Connect failure, timeout or broken stream.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A JSON response could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// An XML response could not be decoded.
    #[error("XML error: {0}")]
    Xml(String),

    /// Local file could not be read or written.
    #[error("IO error: {0}")]
    Io(String),

    /// The record lacks something the operation needs (type, id).
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The platform reported a create/upsert as unsuccessful.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// The file was uploaded but its document id could not be resolved.
    #[error("File uploaded as {content_version_id}, but its ContentDocumentId could not be retrieved: {message}")]
    DocumentLookup {
        content_version_id: String,
        message: String,
    },

    /// A URL was malformed or pointed outside the instance.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<sflite_client::Error> for Error {
    fn from(err: sflite_client::Error) -> Self {
        use sflite_client::ErrorKind as ClientKind;

        let kind = match &err.kind {
            ClientKind::NotAuthenticated => ErrorKind::NotAuthenticated,
            ClientKind::SalesforceApi {
                status,
                error_code,
                message,
                ..
            } => ErrorKind::Salesforce {
                status: *status,
                error_code: error_code.clone(),
                message: message.clone(),
            },
            ClientKind::Http { status, message } => ErrorKind::Http {
                status: *status,
                message: message.clone(),
            },
            ClientKind::Timeout | ClientKind::Connection(_) | ClientKind::Transport(_) => {
                ErrorKind::Transport(err.kind.to_string())
            }
            ClientKind::Json(msg) => ErrorKind::Json(msg.clone()),
            ClientKind::InvalidUrl(msg) => ErrorKind::InvalidUrl(msg.clone()),
            ClientKind::Config(msg) => ErrorKind::Config(msg.clone()),
            ClientKind::Other(msg) => ErrorKind::Other(msg.clone()),
        };
        Error::with_source(kind, err)
    }
}

impl From<sflite_auth::Error> for Error {
    fn from(err: sflite_auth::Error) -> Self {
        use sflite_auth::ErrorKind as AuthKind;

        let kind = match &err.kind {
            AuthKind::InvalidCredentials(msg) => ErrorKind::InvalidCredentials(msg.clone()),
            AuthKind::Salesforce {
                status,
                error_code,
                message,
            } => ErrorKind::Salesforce {
                status: *status,
                error_code: error_code.clone(),
                message: message.clone(),
            },
            AuthKind::Http { status, message } => ErrorKind::Http {
                status: *status,
                message: message.clone(),
            },
            AuthKind::Transport(msg) => ErrorKind::Transport(msg.clone()),
            AuthKind::Xml(msg) => ErrorKind::Xml(msg.clone()),
            AuthKind::InvalidUrl(msg) => ErrorKind::InvalidUrl(msg.clone()),
            AuthKind::EnvVar(msg) => ErrorKind::Config(msg.clone()),
            AuthKind::Other(msg) => ErrorKind::Other(msg.clone()),
        };
        Error::with_source(kind, err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}
