//! TexFlow Server - 纺织品贸易库存与账务后端
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储 (product / ledger / supplier / customer)
//! - **服务层** (`services`): 商品目录、记账、往来单位、报表
//! - **HTTP API** (`api`): RESTful 接口，JSON 使用 camelCase
//!
//! # 模块结构
//!
//! ```text
//! texflow-server/src/
//! ├── core/          # 配置、状态、启动
//! ├── services/      # 业务逻辑
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装和中间件栈
//! ├── middleware/    # 请求日志
//! ├── utils/         # 错误、校验、日志
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use routes::{build_app, build_router};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env 并初始化日志
///
/// 日志参数来自 `LOG_LEVEL`、`LOG_JSON`、`LOG_DIR`
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 不存在不算错误
    let _ = dotenv::dotenv();

    let level = std::env::var("LOG_LEVEL").ok();
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok());
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(level.as_deref(), json, log_dir.as_deref());

    api::health::mark_started();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  _____         _____ _
 |_   _|____  _|  ___| | _____      __
   | |/ _ \ \/ / |_  | |/ _ \ \ /\ / /
   | |  __/>  <|  _| | | (_) \ V  V /
   |_|\___/_/\_\_|   |_|\___/ \_/\_/
    "#
    );
}
