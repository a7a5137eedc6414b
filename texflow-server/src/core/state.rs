use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::{Config, ServerError};
use crate::db::DbService;
use crate::services::{CatalogService, LedgerService, PartyService, ReportService, StockLocks};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是廉价克隆 (内部为 Arc)，axum 每个请求克隆一次。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | catalog | CatalogService | 商品管理 |
/// | ledger | LedgerService | 交易记账 |
/// | parties | PartyService | 供应商/客户 |
/// | reports | ReportService | 汇总报表 |
/// | stock_locks | Arc<StockLocks> | 按商品的库存锁 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    pub catalog: CatalogService,
    pub ledger: LedgerService,
    pub parties: PartyService,
    pub reports: ReportService,
    /// 商品库存锁 (Catalog 和 Ledger 共用)
    pub stock_locks: Arc<StockLocks>,
}

impl ServerState {
    /// 基于已打开的数据库构造状态
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let stock_locks = Arc::new(StockLocks::new());
        Self {
            catalog: CatalogService::new(db.clone(), stock_locks.clone()),
            ledger: LedgerService::new(db.clone(), stock_locks.clone()),
            parties: PartyService::new(db.clone()),
            reports: ReportService::new(db.clone(), config.low_stock_threshold),
            config,
            db,
            stock_locks,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (DATABASE_PATH 或 work_dir/database/texflow.db)
    /// 3. 各服务
    ///
    /// 数据库打开失败时返回错误，由调用方终止进程
    pub async fn initialize(config: &Config) -> Result<Self, ServerError> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        Ok(Self::new(config.clone(), db_service.db))
    }

    /// 内存数据库状态 (测试用)
    pub async fn in_memory(config: Config) -> Result<Self, ServerError> {
        let db_service = DbService::memory()
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        Ok(Self::new(config, db_service.db))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
