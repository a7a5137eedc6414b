//! Error codes shared by server and client
//!
//! The server maps every failure to an [`ErrorCode`] and renders an
//! [`ErrorBody`]; the client parses the same body back so it can tell a
//! server rejection apart from a transport failure.

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Standard API error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Missing or malformed input (400)
    Validation,
    /// Unknown id (404)
    NotFound,
    /// Duplicate SKU (409)
    Conflict,
    /// Sale exceeds available stock (400)
    InsufficientStock,
    /// Request body over the configured limit (413)
    PayloadTooLarge,
    /// Internal server error (500)
    Internal,
    /// Database error (500)
    Database,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InsufficientStock => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "E0002",
            Self::NotFound => "E0003",
            Self::Conflict => "E0004",
            Self::InsufficientStock => "E0007",
            Self::PayloadTooLarge => "E0008",
            Self::Internal => "E9001",
            Self::Database => "E9002",
        }
    }

    /// Parse a code string back into an [`ErrorCode`]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "E0002" => Some(Self::Validation),
            "E0003" => Some(Self::NotFound),
            "E0004" => Some(Self::Conflict),
            "E0007" => Some(Self::InsufficientStock),
            "E0008" => Some(Self::PayloadTooLarge),
            "E9001" => Some(Self::Internal),
            "E9002" => Some(Self::Database),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// JSON body returned with every non-2xx response
///
/// ```json
/// { "code": "E0007", "message": "Insufficient stock for TEX-001: requested 11, available 10" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code().to_string(),
            message: message.into(),
        }
    }

    /// The typed code, if the server sent one we know
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_code(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_is_a_bad_request() {
        assert_eq!(
            ErrorCode::InsufficientStock.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::Conflict.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn codes_parse_back() {
        for code in [
            ErrorCode::Validation,
            ErrorCode::NotFound,
            ErrorCode::Conflict,
            ErrorCode::InsufficientStock,
            ErrorCode::PayloadTooLarge,
            ErrorCode::Internal,
            ErrorCode::Database,
        ] {
            assert_eq!(ErrorCode::from_code(code.code()), Some(code));
        }
        assert_eq!(ErrorCode::from_code("E4242"), None);
    }
}
