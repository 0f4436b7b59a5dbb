//! Typed API failures.
//!
//! The kind is decided where the failure happens (transport, status code,
//! decoding, local storage), so callers branch on [`ApiErrorKind`] instead of
//! inspecting message text.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Categories of API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// The service could not be reached
    Connection,
    /// Connect or request timeout
    Timeout,
    /// Credentials rejected or token no longer valid (400 on auth, 401, 403)
    Auth,
    /// Server-side validation rejected one or more fields
    Validation,
    /// Record or collection not found
    NotFound,
    /// Any other non-success HTTP status
    HttpStatus,
    /// Response body could not be decoded
    Parse,
    /// Reading or writing the local session failed
    Storage,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Connection => write!(f, "connection"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Auth => write!(f, "auth"),
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::NotFound => write!(f, "not_found"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Storage => write!(f, "storage"),
        }
    }
}

/// A field rejected by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerFieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Structured error from the record service or the local session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// HTTP status, when the service answered
    pub status: Option<u16>,
    /// Per-field rejections reported by the service
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ServerFieldError>,
}

/// Error body returned by the record service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: BTreeMap<String, FieldBody>,
}

#[derive(Debug, Deserialize)]
struct FieldBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            fields: Vec::new(),
        }
    }

    /// Classifies a non-success response.
    ///
    /// `auth_endpoint` marks the password authentication call, where the
    /// service answers bad credentials with a plain 400.
    pub fn from_status(status: u16, body: &str, auth_endpoint: bool) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let fields: Vec<ServerFieldError> = parsed
            .as_ref()
            .map(|b| {
                b.data
                    .iter()
                    .map(|(field, f)| ServerFieldError {
                        field: field.clone(),
                        code: f.code.clone(),
                        message: f.message.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let kind = match status {
            400 if auth_endpoint => ApiErrorKind::Auth,
            401 | 403 => ApiErrorKind::Auth,
            404 => ApiErrorKind::NotFound,
            400 | 422 if !fields.is_empty() => ApiErrorKind::Validation,
            _ => ApiErrorKind::HttpStatus,
        };

        let message = parsed
            .map(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self {
            kind,
            message,
            status: Some(status),
            fields,
        }
    }

    /// Classifies a transport failure.
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::new(ApiErrorKind::Timeout, format!("Request timed out: {e}"))
        } else if e.is_connect() {
            Self::new(ApiErrorKind::Connection, format!("Connection failed: {e}"))
        } else if e.is_decode() {
            Self::new(ApiErrorKind::Parse, format!("Failed to decode response: {e}"))
        } else {
            Self::new(ApiErrorKind::Connection, format!("Network error: {e}"))
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    pub fn storage(err: &anyhow::Error) -> Self {
        Self::new(ApiErrorKind::Storage, format!("{err:#}"))
    }

    /// True when the service was never reached (connection or timeout).
    pub fn is_connection(&self) -> bool {
        matches!(self.kind, ApiErrorKind::Connection | ApiErrorKind::Timeout)
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ApiErrorKind::Auth
    }

    /// True when the service refused the stored token (HTTP 401).
    pub fn is_token_rejected(&self) -> bool {
        self.status == Some(401)
    }

    /// Returns the server's rejection for a field, if any.
    pub fn field(&self, name: &str) -> Option<&ServerFieldError> {
        self.fields.iter().find(|f| f.field == name)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
