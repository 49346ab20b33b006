//! Result and error types for the core library

use std::sync::Arc;

use thiserror::Error;

/// Core library error type
///
/// Mirrors the failure taxonomy of a remote-API client: the request never
/// completed (`Transport`), the server answered with an error status
/// (`Unauthorized`, `Http`), the body could not be read (`Decode`), or the
/// request was refused locally before anything was sent (`Validation`).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("missing or invalid token"))]
    Unauthorized { message: Option<String> },

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request rejected"))]
    Http { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an HTTP status error
    pub fn http(status: u16, message: Option<String>) -> Self {
        if status == 401 {
            Self::Unauthorized { message }
        } else {
            Self::Http { status, message }
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the server (`{"message": "..."}`) or by local validation
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Http { message, .. } => message.as_deref(),
            Self::Validation(msg) => Some(msg),
            _ => None,
        }
    }

    /// Single user-facing string: the server message when there is one,
    /// otherwise the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    /// Take back an error shared between several waiters of one request
    ///
    /// The last holder gets the original; the others get an equivalent copy.
    pub fn from_shared(err: Arc<Error>) -> Self {
        Arc::try_unwrap(err).unwrap_or_else(|shared| match shared.as_ref() {
            Self::Transport(msg) => Self::Transport(msg.clone()),
            Self::Unauthorized { message } => Self::Unauthorized {
                message: message.clone(),
            },
            Self::Http { status, message } => Self::Http {
                status: *status,
                message: message.clone(),
            },
            Self::Decode(msg) => Self::Decode(msg.clone()),
            Self::Validation(msg) => Self::Validation(msg.clone()),
            Self::NotFound(msg) => Self::NotFound(msg.clone()),
            Self::Config(msg) => Self::Config(msg.clone()),
            Self::Storage(msg) => Self::Storage(msg.clone()),
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
            Self::Json(e) => Self::Decode(e.to_string()),
            Self::Other(msg) => Self::Other(msg.clone()),
        })
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
