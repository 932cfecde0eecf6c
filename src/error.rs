//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Input rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Server answered 401; the session has already been cleared
    #[error("Session expired")]
    Unauthorized,

    /// Server answered 403
    #[error("Access forbidden")]
    Forbidden,

    /// Server answered 404
    #[error("Not found")]
    NotFound,

    /// Server answered 5xx
    #[error("Server error (status {status})")]
    Server { status: u16 },

    /// Any other non-success response
    #[error("Request rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// No response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Leave request is not in a state that accepts the requested decision
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Session storage I/O failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Excel export error
    #[error("Export error: {0}")]
    Export(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => Self::from_status(status.as_u16(), None),
            None => Self::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}

impl AppError {
    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid transition error with message
    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    /// Map a non-success HTTP status to an error.
    ///
    /// `message` is the server's explanation, when the body carried one.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500..=599 => Self::Server { status },
            _ => Self::Rejected {
                status,
                message: message.unwrap_or_else(|| format!("Request failed with status {status}")),
            },
        }
    }

    /// True when no response reached the client.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            Self::Forbidden => "Your account has been deactivated. Please contact HR.".to_string(),
            Self::NotFound => {
                "No account was found for these details. Please contact HR to have your account set up.".to_string()
            }
            Self::Server { .. } => "The server ran into a problem. Please try again later.".to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::Network(_) => "Unable to reach the server. Please check your network connection.".to_string(),
            Self::Decode(_) => "The server sent an unexpected response.".to_string(),
            Self::InvalidTransition(msg) => msg.clone(),
            Self::Storage(e) => format!("Could not access local session storage: {e}"),
            Self::Config(msg) => msg.clone(),
            Self::Export(msg) => format!("Export failed: {msg}"),
        }
    }
}
