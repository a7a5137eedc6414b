//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`products`] - 商品管理接口
//! - [`transactions`] - 交易记账接口
//! - [`suppliers`] - 供应商接口
//! - [`customers`] - 客户接口
//! - [`reports`] - 汇总报表接口

pub mod health;

pub mod customers;
pub mod products;
pub mod reports;
pub mod suppliers;
pub mod transactions;

pub use crate::utils::{AppError, AppResult};
