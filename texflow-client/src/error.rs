//! Client error types

use shared::ErrorBody;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, DNS, reset ...)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server did not answer within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-success status
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Request could not be built
    #[error("Invalid request: {0}")]
    Request(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local tier failure
    #[error("Cache error: {0}")]
    Cache(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a status and the raw response body
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(err) => ClientError::Api {
                status,
                code: err.code,
                message: err.message,
            },
            Err(_) => ClientError::Api {
                status,
                code: String::new(),
                message: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }

    /// 服务端明确拒绝 (4xx)，重试没有意义
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if (400..500).contains(status))
    }

    /// The error body as the server sent it, for rejections
    pub fn error_body(&self) -> Option<ErrorBody> {
        match self {
            ClientError::Api { code, message, .. } => Some(ErrorBody {
                code: code.clone(),
                message: message.clone(),
            }),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_error_body() {
        let err = ClientError::from_response(
            400,
            br#"{"code":"E0007","message":"Insufficient stock for TEX-001: requested 11, available 10"}"#,
        );
        assert!(err.is_rejection());
        let body = err.error_body().unwrap();
        assert_eq!(body.code, "E0007");
        assert!(body.message.contains("available 10"));
    }

    #[test]
    fn server_faults_are_not_rejections() {
        let err = ClientError::from_response(500, b"boom");
        assert!(!err.is_rejection());
        assert!(!ClientError::Timeout.is_rejection());
        match err {
            ClientError::Api { code, message, .. } => {
                assert!(code.is_empty());
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
