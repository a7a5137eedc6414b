//! TexFlow Client - server-first client with a local fallback
//!
//! Every read goes to the server with a bounded timeout and falls back to a
//! locally cached copy (then to seed data). Every write is committed to the
//! local copy first and queued until the server confirms or rejects it.
//!
//! - [`RemoteTier`]: [`NetworkRemote`] (HTTP) or `OneshotRemote` (in-process,
//!   `in-process` feature)
//! - [`LocalTier`]: [`MemoryCache`] or [`FileCache`]
//! - [`HybridStore`]: reconciliation between the two
//! - [`TexflowClient`]: typed API and checkout

mod checkout;
mod client;
pub mod config;
pub mod error;
pub mod local;
pub mod optimistic;
pub mod pending;
pub mod remote;
pub mod resource;
pub mod seed;
pub mod store;

pub use checkout::{CheckoutReport, LineOutcome};
pub use client::TexflowClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use local::{FileCache, LocalTier, MemoryCache};
pub use pending::{PendingWrite, SyncReport, WriteOp};
#[cfg(feature = "in-process")]
pub use remote::OneshotRemote;
pub use remote::{NetworkRemote, RemoteTier};
pub use resource::Resource;
pub use store::{DataOrigin, Fetched, HybridStore, WriteOutcome};

// Re-export shared types for convenience
pub use shared::billing::{Cart, CartLine, Invoice, TaxMode};
pub use shared::models;
