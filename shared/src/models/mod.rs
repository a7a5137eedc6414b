//! Data models
//!
//! Shared between texflow-server and texflow-client (via API).
//! All ids are opaque strings on the wire; the server mints them from
//! snowflake keys, the client mints `local-*` placeholders while offline.

pub mod party;
pub mod product;
pub mod report;
pub mod serde_helpers;
pub mod transaction;

// Re-exports
pub use party::*;
pub use product::*;
pub use report::*;
pub use transaction::*;
