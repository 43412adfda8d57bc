//! Error types for sflite-auth.
//!
//! Error messages never include the password or the session id.

/// Result type alias for sflite-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sflite-auth operations.
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

    /// HTTP status of a rejected login, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Salesforce { status, .. } | ErrorKind::Http { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Username or password missing; nothing was sent.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The login endpoint answered with the platform's JSON error envelope.
    #[error("Salesforce error (HTTP {status}): {error_code} - {message}")]
    Salesforce {
        status: u16,
        error_code: String,
        message: String,
    },

    /// The login endpoint answered with a non-200 status and any other body
    /// (typically a SOAP fault).
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// The request never completed (connect failure, timeout, broken stream).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The login response could not be decoded.
    #[error("XML error: {0}")]
    Xml(String),

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::with_source(ErrorKind::Xml(err.to_string()), err)
    }
}

impl From<sflite_client::Error> for Error {
    fn from(err: sflite_client::Error) -> Self {
        use sflite_client::ErrorKind as ClientKind;

        let kind = match &err.kind {
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
            ClientKind::InvalidUrl(msg) => ErrorKind::InvalidUrl(msg.clone()),
            other => ErrorKind::Other(other.to_string()),
        };
        Error::with_source(kind, err)
    }
}
