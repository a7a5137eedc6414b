//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`AppJson`] - 带统一错误体的 JSON 提取器
//! - 日志、输入校验

pub mod error;
pub mod extract;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult};
pub use extract::AppJson;
