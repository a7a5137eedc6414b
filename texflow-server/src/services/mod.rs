//! 服务层 - 业务逻辑
//!
//! # 服务列表
//!
//! - [`CatalogService`] - 商品增删改查，SKU 唯一
//! - [`LedgerService`] - 进货/销售记账并调整库存
//! - [`PartyService`] - 供应商和客户
//! - [`ReportService`] - 仪表盘和应收应付汇总
//! - [`StockLocks`] - 按商品串行化库存变更

pub mod catalog_service;
pub mod ledger_service;
pub mod party_service;
pub mod report_service;
pub mod stock_lock;

pub use catalog_service::CatalogService;
pub use ledger_service::LedgerService;
pub use party_service::PartyService;
pub use report_service::ReportService;
pub use stock_lock::StockLocks;
