//! Typed TexFlow client

use std::sync::Arc;

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{
    Customer, CustomerCreate, HealthStatus, InventorySummary, Product, ProductCreate, Supplier,
    SupplierCreate, Transaction, TransactionCreate, TransactionFilter,
};
use shared::summary::{DEFAULT_LOW_STOCK_THRESHOLD, summarize};

use crate::config::ClientConfig;
use crate::local::{FileCache, LocalTier, MemoryCache};
use crate::optimistic::strip_nulls;
use crate::pending::{SyncReport, WriteOp};
use crate::remote::{NetworkRemote, RemoteTier};
use crate::resource::Resource;
use crate::store::{DataOrigin, Fetched, HybridStore, WriteOutcome};
use crate::ClientResult;

/// TexFlow 客户端
///
/// 读: 服务端 → 缓存 → 种子数据；写: 先乐观提交到本地，再同步到服务端。
///
/// ```ignore
/// let client = TexflowClient::connect(ClientConfig::new("http://localhost:5000")).await?;
/// let products = client.products().await?;
/// if products.origin.is_degraded() {
///     println!("offline, showing {:?} data", products.origin);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TexflowClient {
    store: Arc<HybridStore>,
}

impl TexflowClient {
    /// HTTP remote plus a memory or file cache, per `config`
    pub async fn connect(config: ClientConfig) -> ClientResult<Self> {
        let remote: Arc<dyn RemoteTier> =
            Arc::new(NetworkRemote::new(&config.base_url, config.timeout)?);
        let local: Arc<dyn LocalTier> = match &config.cache_dir {
            Some(dir) => Arc::new(FileCache::new(dir)),
            None => Arc::new(MemoryCache::new()),
        };
        Self::with_tiers(remote, local, config.timeout).await
    }

    /// Custom tiers (in-process server, test doubles)
    pub async fn with_tiers(
        remote: Arc<dyn RemoteTier>,
        local: Arc<dyn LocalTier>,
        timeout: std::time::Duration,
    ) -> ClientResult<Self> {
        let store = HybridStore::open(remote, local, timeout).await?;
        Ok(Self {
            store: Arc::new(store),
        })
    }

    pub fn store(&self) -> &HybridStore {
        &self.store
    }

    // ========== Catalog ==========

    pub async fn products(&self) -> ClientResult<Fetched<Vec<Product>>> {
        self.list(Resource::Products).await
    }

    /// Create when `id` is `None`, otherwise patch the given fields
    pub async fn save_product(
        &self,
        id: Option<&str>,
        product: &ProductCreate,
    ) -> ClientResult<WriteOutcome<Product>> {
        self.save(Resource::Products, id, product).await
    }

    /// Delete a product; its ledger entries go with it
    pub async fn delete_product(&self, id: &str) -> ClientResult<WriteOutcome<()>> {
        let outcome = self
            .store
            .write(Resource::Products, WriteOp::Delete { id: id.to_string() })
            .await?;
        Ok(match outcome {
            WriteOutcome::Confirmed(_) => WriteOutcome::Confirmed(()),
            WriteOutcome::Queued(_) => WriteOutcome::Queued(()),
            WriteOutcome::Rejected(e) => WriteOutcome::Rejected(e),
        })
    }

    // ========== Ledger ==========

    pub async fn transactions(&self) -> ClientResult<Fetched<Vec<Transaction>>> {
        self.list(Resource::Transactions).await
    }

    /// Transactions narrowed by `filter`, applied to whichever copy answered
    pub async fn transactions_where(
        &self,
        filter: &TransactionFilter,
    ) -> ClientResult<Fetched<Vec<Transaction>>> {
        let all = self.transactions().await?;
        Ok(all.map(|txs| txs.into_iter().filter(|tx| filter.matches(tx)).collect()))
    }

    pub async fn record_transaction(
        &self,
        tx: &TransactionCreate,
    ) -> ClientResult<WriteOutcome<Transaction>> {
        let body = strip_nulls(serde_json::to_value(tx)?);
        self.store
            .write(Resource::Transactions, WriteOp::Create { body })
            .await?
            .decode()
    }

    // ========== Parties ==========

    pub async fn suppliers(&self) -> ClientResult<Fetched<Vec<Supplier>>> {
        self.list(Resource::Suppliers).await
    }

    pub async fn save_supplier(
        &self,
        id: Option<&str>,
        supplier: &SupplierCreate,
    ) -> ClientResult<WriteOutcome<Supplier>> {
        self.save(Resource::Suppliers, id, supplier).await
    }

    pub async fn customers(&self) -> ClientResult<Fetched<Vec<Customer>>> {
        self.list(Resource::Customers).await
    }

    pub async fn save_customer(
        &self,
        id: Option<&str>,
        customer: &CustomerCreate,
    ) -> ClientResult<WriteOutcome<Customer>> {
        self.save(Resource::Customers, id, customer).await
    }

    // ========== Reports ==========

    /// Server health; no local fallback
    pub async fn health(&self) -> ClientResult<HealthStatus> {
        let value = self.store.request(Method::GET, "/api/health", None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Server summary, or one computed from the local copies when degraded
    pub async fn summary(&self) -> ClientResult<Fetched<InventorySummary>> {
        self.store.sync().await;
        match self
            .store
            .request(Method::GET, "/api/reports/summary", None)
            .await
        {
            Ok(value) => Ok(Fetched::new(serde_json::from_value(value)?, DataOrigin::Live)),
            Err(e) => {
                tracing::warn!(error = %e, "Summary unavailable, computing locally");
                let products: Fetched<Vec<Product>> =
                    self.store.cached(Resource::Products).await.map(decode_items);
                let transactions: Fetched<Vec<Transaction>> =
                    self.store.cached(Resource::Transactions).await.map(decode_items);
                let summary = summarize(
                    &products.data,
                    &transactions.data,
                    DEFAULT_LOW_STOCK_THRESHOLD,
                );
                Ok(Fetched::new(summary, products.origin))
            }
        }
    }

    /// Replay pending writes now
    pub async fn sync(&self) -> SyncReport {
        self.store.sync().await
    }

    async fn list<T: DeserializeOwned>(&self, resource: Resource) -> ClientResult<Fetched<Vec<T>>> {
        Ok(self.store.read(resource).await.map(decode_items))
    }

    async fn save<B, T>(
        &self,
        resource: Resource,
        id: Option<&str>,
        fields: &B,
    ) -> ClientResult<WriteOutcome<T>>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let body = strip_nulls(serde_json::to_value(fields)?);
        let op = match id {
            None => WriteOp::Create { body },
            Some(id) => WriteOp::Update {
                id: id.to_string(),
                patch: body,
            },
        };
        self.store.write(resource, op).await?.decode()
    }
}

/// Decode each cached item, skipping ones that no longer fit the model
fn decode_items<T: DeserializeOwned>(value: Value) -> Vec<T> {
    crate::optimistic::items(value)
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed cached item");
                None
            }
        })
        .collect()
}
