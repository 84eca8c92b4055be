use thiserror::Error;

/// Every failure a patient lookup can end in.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid patient ID: {0}")]
    InvalidIdentifier(String),

    #[error("Cannot connect to {url}: {message}")]
    Connection { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid JSON response: {0}")]
    JsonDecode(#[from] serde_json::Error),

    #[error("Unexpected response format: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new InvalidIdentifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Create a new Connection error
    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a new Timeout error
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Create a new HttpStatus error
    pub fn http_status(status: u16, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    /// Create a new UnexpectedShape error
    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::UnexpectedShape(message.into())
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a new catch-all error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::JsonDecode(_) => ErrorKind::JsonDecode,
            Self::UnexpectedShape(_) => ErrorKind::UnexpectedShape,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Status code carried by an HTTP error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short one-line status, shown next to the input.
    pub fn status_line(&self) -> String {
        match self {
            Self::InvalidIdentifier(_) => "Invalid Patient ID".to_string(),
            Self::Connection { .. } => "Connection Error".to_string(),
            Self::Timeout { .. } => "Timeout Error".to_string(),
            Self::HttpStatus { status, .. } => format!("Error! Status: {status}"),
            Self::JsonDecode(_) => "Invalid JSON Response".to_string(),
            Self::UnexpectedShape(_) => "Unexpected Response Format".to_string(),
            Self::Configuration(_) => "Configuration Error".to_string(),
            Self::Other(message) => format!("Error: {}...", truncate_chars(message, 50)),
        }
    }

    /// Longer explanation with a hint on what to check.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidIdentifier(message) => message.clone(),
            Self::Connection { url, .. } => format!(
                "Cannot connect to server. Make sure:\n1. The server at {url} is running\n2. The ORDS service is active"
            ),
            Self::Timeout { .. } => "Request timed out. Check your connection.".to_string(),
            Self::HttpStatus { status, .. } => format!("Failed to fetch data. Status: {status}"),
            Self::JsonDecode(_) => {
                "Server returned invalid JSON. Check if the endpoint is correct.".to_string()
            }
            Self::UnexpectedShape(message) => {
                format!("Server response has an unexpected structure: {message}")
            }
            Self::Configuration(message) => format!("Configuration problem: {message}"),
            Self::Other(message) => format!("An error occurred: {message}"),
        }
    }
}

/// Discriminant of [`Error`], for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidIdentifier,
    Connection,
    Timeout,
    HttpStatus,
    JsonDecode,
    UnexpectedShape,
    Configuration,
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier => write!(f, "invalid_identifier"),
            Self::Connection => write!(f, "connection"),
            Self::Timeout => write!(f, "timeout"),
            Self::HttpStatus => write!(f, "http_status"),
            Self::JsonDecode => write!(f, "json_decode"),
            Self::UnexpectedShape => write!(f, "unexpected_shape"),
            Self::Configuration => write!(f, "configuration"),
            Self::Other => write!(f, "other"),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Convenience result type for lookup operations
pub type Result<T> = std::result::Result<T, Error>;
