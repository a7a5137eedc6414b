//! 统一错误处理
//!
//! 提供应用级错误类型：
//! - [`AppError`] - 应用错误枚举，实现 `IntoResponse`
//! - [`AppResult`] - 处理器返回类型
//!
//! # 错误码规范
//!
//! 错误码定义在 [`shared::ErrorCode`]，客户端解析同一份定义。
//!
//! | 错误 | 状态码 | 错误码 |
//! |------|--------|--------|
//! | Validation | 400 | E0002 |
//! | NotFound | 404 | E0003 |
//! | Conflict | 409 | E0004 |
//! | InsufficientStock | 400 | E0007 |
//! | PayloadTooLarge | 413 | E0008 |
//! | Internal | 500 | E9001 |
//! | Database | 500 | E9002 |
//!
//! # 使用示例
//!
//! ```ignore
//! Err(AppError::not_found("Product 42 not found"))
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::{ErrorBody, ErrorCode};
use tracing::error;

use crate::db::repository::RepoError;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Resource already exists: {0}")]
    /// 资源冲突 (409)
    Conflict(String),

    #[error("Insufficient stock: {0}")]
    /// 库存不足 (400)
    InsufficientStock(String),

    #[error("Payload too large: {0}")]
    /// 请求体过大 (413)
    PayloadTooLarge(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient_stock(msg: impl Into<String>) -> Self {
        Self::InsufficientStock(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 对应的共享错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation(_) => ErrorCode::Validation,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::InsufficientStock(_) => ErrorCode::InsufficientStock,
            AppError::PayloadTooLarge(_) => ErrorCode::PayloadTooLarge,
            AppError::Database(_) => ErrorCode::Database,
            AppError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let message = match &self {
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                msg.clone()
            }
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::InsufficientStock(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
        };

        (code.status_code(), Json(ErrorBody::new(code, message))).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::Validation(rejection.body_text())
        }
    }
}

/// 处理器的 Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
