//! Error types for the agenda client.

use thiserror::Error;

/// Input rejected before any request reaches the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("End time must be later than start time")]
    EndNotAfterStart,

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("No days selected")]
    EmptySelection,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Errors that can occur in agenda operations.
#[derive(Error, Debug)]
pub enum AgendaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Session expired or missing. Log in again")]
    Unauthorized,

    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("{0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse grouping used to decide how an error is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Shown inline next to the form; nothing was sent.
    Validation,
    /// Generic form-level failure; prior state is unchanged.
    Network,
    /// Token cleared, user must log in again.
    Auth,
    /// Local configuration or storage problem.
    Local,
}

impl AgendaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AgendaError::Validation(_) => ErrorCategory::Validation,
            AgendaError::Unauthorized => ErrorCategory::Auth,
            AgendaError::Http { .. }
            | AgendaError::Connection(_)
            | AgendaError::Decode(_)
            | AgendaError::NotFound(_) => ErrorCategory::Network,
            AgendaError::Config(_) | AgendaError::Session(_) | AgendaError::Io(_) => {
                ErrorCategory::Local
            }
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Backend messages are passed through for HTTP errors; transport
    /// failures collapse into one generic line.
    pub fn user_message(&self) -> String {
        match self {
            AgendaError::Http { message, .. } if !message.is_empty() => message.clone(),
            AgendaError::Http { .. } | AgendaError::Connection(_) | AgendaError::Decode(_) => {
                "Could not complete the request. Check your connection.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for agenda operations.
pub type AgendaResult<T> = Result<T, AgendaError>;
