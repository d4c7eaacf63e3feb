//! Error types for the portal API client.
//!
//! # Design
//! Transport failures (nothing usable came back) and application rejections
//! (an envelope came back with `code != 200`) are separate variants so a
//! caller can offer "retry" for the former without string-sniffing messages.
//! Every variant renders a non-empty message.

use thiserror::Error;

/// Shown when a rejecting envelope carries no `msg`.
pub const FALLBACK_MESSAGE: &str = "请求失败";

/// Errors returned by `PortalClient` and `ApiClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend could not be reached, or answered without an envelope.
    #[error("transport error: {cause}")]
    Transport { cause: String },

    /// The request did not complete before its deadline.
    #[error("request timed out")]
    Timeout,

    /// The caller cancelled the request before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// The backend answered with an envelope whose code is not 200.
    #[error("{msg}")]
    Application { code: i64, msg: String },

    /// A 2xx response whose body or `data` did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(String),
}

impl ApiError {
    /// Build an application rejection, applying the fallback message when
    /// the envelope's `msg` is absent or empty. Whitespace is kept as sent.
    pub fn application(code: i64, msg: Option<String>) -> Self {
        let msg = msg
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        ApiError::Application { code, msg }
    }

    pub fn transport(cause: impl Into<String>) -> Self {
        ApiError::Transport { cause: cause.into() }
    }

    /// True for failures where no envelope was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Timeout)
    }

    /// Envelope code for application rejections.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Application { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Configuration could not be loaded or is unsafe for the runtime context.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("the placeholder signing secret must not be used in production")]
    PlaceholderSecret,

    #[error("could not create the HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_uses_msg() {
        let err = ApiError::application(403, Some("forbidden".to_string()));
        assert_eq!(err.to_string(), "forbidden");
        assert_eq!(err.code(), Some(403));
    }

    #[test]
    fn application_error_falls_back_when_msg_missing_or_empty() {
        assert_eq!(ApiError::application(500, None).to_string(), FALLBACK_MESSAGE);
        assert_eq!(ApiError::application(500, Some(String::new())).to_string(), FALLBACK_MESSAGE);
    }

    #[test]
    fn whitespace_msg_is_not_replaced() {
        assert_eq!(ApiError::application(500, Some("  ".to_string())).to_string(), "  ");
    }

    #[test]
    fn transport_classification() {
        assert!(ApiError::transport("refused").is_transport());
        assert!(ApiError::Timeout.is_transport());
        assert!(!ApiError::Cancelled.is_transport());
        assert!(!ApiError::application(400, None).is_transport());
    }

    #[test]
    fn every_variant_has_a_message() {
        let errors = [
            ApiError::transport(""),
            ApiError::Timeout,
            ApiError::Cancelled,
            ApiError::application(1, None),
            ApiError::Decode(String::new()),
            ApiError::Encode(String::new()),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
