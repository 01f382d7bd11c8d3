use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// ApiError
///
/// Every failure a gateway call can produce. Gateways hand these back to the
/// caller untouched; screens and forms turn them into local UI state.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, TLS, refused, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status. `message` carries the
    /// `.error` field of the body when there was one.
    #[error("backend returned {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// The body could not be parsed into the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            ApiError::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// The server-provided message, if the backend sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The server message verbatim, or `fallback` when there is none.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Builds a `Status` error from a failed response body.
    pub(crate) fn from_body(status: StatusCode, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: Option<String>,
        }

        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty());

        ApiError::Status { status, message }
    }
}

/// FormError
///
/// Why an edit form did not save. Both variants render as an inline alert.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// Local validation failed; nothing was sent.
    #[error("Veuillez remplir tous les champs obligatoires.")]
    MissingFields(Vec<&'static str>),

    /// The backend refused the submission.
    #[error("{0}")]
    Rejected(String),
}
