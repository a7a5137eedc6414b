//! Database Module
//!
//! Embedded SurrealDB: RocksDB on disk, in-memory engine for tests.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "texflow";
const DATABASE: &str = "texflow";

/// 表定义和索引 (幂等，每次启动执行)
const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
DEFINE TABLE IF NOT EXISTS ledger SCHEMALESS;
DEFINE TABLE IF NOT EXISTS supplier SCHEMALESS;
DEFINE TABLE IF NOT EXISTS customer SCHEMALESS;
DEFINE INDEX IF NOT EXISTS product_sku ON TABLE product FIELDS sku UNIQUE;
DEFINE INDEX IF NOT EXISTS ledger_product ON TABLE ledger FIELDS product_id;
DEFINE INDEX IF NOT EXISTS ledger_user ON TABLE ledger FIELDS user_id;
"#;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk store at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %db_path, "Database opened (RocksDB)");
        Self::setup(db).await
    }

    /// Volatile store for tests and demos
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::setup(db).await
    }

    async fn setup(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .and_then(|r| r.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }

    /// Cheap round-trip used by the health check
    pub async fn ping(db: &Surreal<Db>) -> bool {
        db.query("RETURN true").await.and_then(|r| r.check()).is_ok()
    }
}
