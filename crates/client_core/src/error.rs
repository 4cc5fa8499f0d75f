//! Failure types shared by the controllers and their collaborators.

use thiserror::Error;

/// Fallback shown when loading the project list fails without a server message.
pub const FETCH_FALLBACK_MESSAGE: &str = "Xatolik";
/// Fallback shown when create/update fails without a server message.
pub const SAVE_FALLBACK_MESSAGE: &str = "Saqlashda xatolik";
/// Fallback shown when delete fails without a server message.
pub const DELETE_FALLBACK_MESSAGE: &str = "O'chirishda xatolik";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("projects api returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },
    #[error("projects api transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed projects api response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid projects api url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ServiceError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    /// Human-readable message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }

    /// Message to surface to the user: the server's when present, else `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store io failure at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
