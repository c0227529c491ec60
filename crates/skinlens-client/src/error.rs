//! Client error types and their user-facing classification

use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error {status_code}: {}", message.as_deref().unwrap_or("Unknown error"))]
    Server {
        status_code: u16,
        message: Option<String>,
    },

    /// Rejected credentials or registration; the message is user-facing
    #[error("{0}")]
    Authentication(String),

    #[error("Token refresh failed: {source}")]
    RefreshFailed {
        #[source]
        source: Box<ClientError>,
    },

    /// Client-side validation failure; the message is user-facing
    #[error("{0}")]
    Validation(String),

    #[error("Request error: {0}")]
    RequestSetup(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Giving up after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<ClientError>,
    },

    #[error("Failed to analyze image after multiple attempts. Please try again later.")]
    AnalysisFailed {
        attempts: u32,
        #[source]
        source: Box<ClientError>,
    },

    #[error(transparent)]
    Core(skinlens_core::Error),
}

impl From<skinlens_core::Error> for ClientError {
    fn from(err: skinlens_core::Error) -> Self {
        match err {
            skinlens_core::Error::Validation(msg) => ClientError::Validation(msg),
            skinlens_core::Error::InvalidImage(msg) => ClientError::Validation(msg),
            other => ClientError::Core(other),
        }
    }
}

/// Error taxonomy surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid credentials, expired or invalid refresh token
    Authentication,
    /// No response received
    Network,
    /// Non-2xx response
    Server,
    /// Caught client-side before any request was sent
    Validation,
    /// Malformed request or unreadable response
    RequestSetup,
    /// Local storage or configuration failure
    Internal,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Http(e) => {
                if e.is_builder() {
                    ErrorKind::RequestSetup
                } else if e.status().is_some() {
                    ErrorKind::Server
                } else if e.is_decode() {
                    ErrorKind::RequestSetup
                } else {
                    ErrorKind::Network
                }
            }
            ClientError::Server { .. } => ErrorKind::Server,
            ClientError::Authentication(_) | ClientError::RefreshFailed { .. } => {
                ErrorKind::Authentication
            }
            ClientError::Validation(_) => ErrorKind::Validation,
            ClientError::RequestSetup(_) | ClientError::Parse(_) => ErrorKind::RequestSetup,
            ClientError::RetriesExhausted { source, .. }
            | ClientError::AnalysisFailed { source, .. } => source.kind(),
            ClientError::Core(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status of a server error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Server { status_code, .. } => Some(*status_code),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server {
                status_code: 403, ..
            } => "You do not have permission to perform this action.".to_string(),
            ClientError::Server {
                status_code,
                message,
            } => format!(
                "Server error: {} - {}",
                status_code,
                message.as_deref().unwrap_or("Unknown error")
            ),
            ClientError::RefreshFailed { .. } => {
                "Session expired. Please login again.".to_string()
            }
            ClientError::Authentication(msg) | ClientError::Validation(msg) => msg.clone(),
            ClientError::AnalysisFailed { .. } => self.to_string(),
            ClientError::RetriesExhausted { source, .. } => source.user_message(),
            _ => match self.kind() {
                ErrorKind::Network => {
                    "No response received from server. Please check your internet connection."
                        .to_string()
                }
                ErrorKind::Server => match self.status_code() {
                    Some(status) => format!("Server error: {} - Unknown error", status),
                    None => self.to_string(),
                },
                ErrorKind::RequestSetup => match self {
                    ClientError::RequestSetup(_) => self.to_string(),
                    _ => format!("Request error: {}", self),
                },
                _ => self.to_string(),
            },
        }
    }
}

/// Pull a human-readable message out of an error body
///
/// Looks at `message`, `detail`, `error`, `non_field_errors[0]`, then the
/// first per-field error list.
pub fn extract_server_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    let object = json.as_object()?;

    for key in ["message", "detail", "error"] {
        if let Some(Value::String(msg)) = object.get(key)
            && !msg.is_empty()
        {
            return Some(msg.clone());
        }
    }

    if let Some(msg) = first_string(object.get("non_field_errors")) {
        return Some(msg);
    }

    object.values().find_map(|value| first_string(Some(value)))
}

/// First string of a JSON array (or the string itself)
pub(crate) fn first_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }),
        _ => None,
    }
}

/// Turn a non-2xx response into `ClientError::Server`
pub(crate) async fn server_error(response: reqwest::Response) -> ClientError {
    let status_code = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    ClientError::Server {
        status_code,
        message: extract_server_message(&body),
    }
}
