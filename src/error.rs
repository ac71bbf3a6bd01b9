//! Centralized error types for mailfiler.

use thiserror::Error;

/// Request-level failures. Any of these ends the invocation early with an
/// error response; no attachment is written.
#[derive(Error, Debug)]
pub enum RouteError {
    /// The request carried no `content`, or it was empty.
    #[error("request has no email content")]
    MissingContent,

    /// The `content` field held a non-string value.
    #[error("email content must be a base64 string, found {found}")]
    NotText { found: &'static str },

    /// The `content` field was not valid base64.
    #[error("email content is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The decoded bytes are not a well-formed email message.
    #[error("failed to parse email: {0}")]
    Parse(String),

    /// The message has no `Subject` header, or it is blank.
    #[error("email has no subject")]
    MissingSubject,
}

impl RouteError {
    /// The short, caller-facing message placed in an error response.
    pub fn response_message(&self) -> &'static str {
        match self {
            Self::MissingContent => "Missing email content",
            Self::NotText { .. } | Self::Decode(_) | Self::Parse(_) => "Failed to parse email",
            Self::MissingSubject => "Missing email subject",
        }
    }
}

/// Convenience alias for `Result<T, RouteError>`.
pub type Result<T> = std::result::Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_messages() {
        assert_eq!(
            RouteError::MissingContent.response_message(),
            "Missing email content"
        );
        assert_eq!(
            RouteError::MissingSubject.response_message(),
            "Missing email subject"
        );
        assert_eq!(
            RouteError::NotText { found: "number" }.response_message(),
            "Failed to parse email"
        );
        assert_eq!(
            RouteError::Parse("no headers".into()).response_message(),
            "Failed to parse email"
        );
    }

    #[test]
    fn test_decode_error_converts() {
        use base64::Engine;
        let err: RouteError = base64::engine::general_purpose::STANDARD
            .decode("not base64!")
            .unwrap_err()
            .into();
        assert!(matches!(err, RouteError::Decode(_)));
        assert_eq!(err.response_message(), "Failed to parse email");
    }
}
