//! Invocation request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The invocation input: `{ "content": "<base64 raw email>" }`.
///
/// `content` is kept as raw JSON so that a value of the wrong type becomes an
/// error response rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl RouteRequest {
    /// Request carrying an arbitrary JSON `content` value.
    pub fn with_content(content: impl Into<Value>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// Wrap a raw RFC 5322 message into a request, base64-encoding it.
    pub fn from_raw_email(raw: &[u8]) -> Self {
        use base64::Engine;
        Self {
            content: Some(Value::String(
                base64::engine::general_purpose::STANDARD.encode(raw),
            )),
        }
    }
}

/// The invocation output.
///
/// Serializes as `{"status":"success","uploaded_files":[...]}` or
/// `{"status":"error","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RouteResponse {
    Success { uploaded_files: Vec<String> },
    Error { message: String },
}

impl RouteResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Destination keys written, empty for an error response.
    pub fn uploaded_files(&self) -> &[String] {
        match self {
            Self::Success { uploaded_files } => uploaded_files,
            Self::Error { .. } => &[],
        }
    }
}

impl From<crate::error::RouteError> for RouteResponse {
    fn from(err: crate::error::RouteError) -> Self {
        Self::Error {
            message: err.response_message().to_string(),
        }
    }
}
