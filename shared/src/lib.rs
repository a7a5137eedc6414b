//! Shared types for TexFlow
//!
//! Wire models, error codes and the pure business math used by both
//! `texflow-server` and `texflow-client`.

pub mod billing;
pub mod error;
pub mod models;
pub mod money;
pub mod summary;
pub mod util;

// Re-exports
pub use error::{ErrorBody, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
