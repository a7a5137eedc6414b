//! Storage rows
//!
//! Wire types live in `shared::models` and carry plain string ids. The rows
//! here carry the store's `RecordId` and convert into the wire types.

pub mod ledger;
pub mod party;
pub mod product;

pub use ledger::{LedgerData, LedgerRecord};
pub use party::{CustomerData, CustomerRecord, SupplierData, SupplierRecord};
pub use product::{ProductData, ProductRecord};
