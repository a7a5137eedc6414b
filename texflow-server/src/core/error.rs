use thiserror::Error;

/// 启动和运行阶段的错误
///
/// 请求级错误见 [`crate::utils::AppError`]。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("工作目录初始化失败: {0}")]
    WorkDir(#[from] std::io::Error),

    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("HTTP 服务错误: {0}")]
    Http(String),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 启动流程的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
