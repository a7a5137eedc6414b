//! HybridStore - 服务端优先，本地兜底
//!
//! # 读
//!
//! 1. 先回放待确认写入队列
//! 2. 带超时请求服务端，成功则覆盖本地缓存 ([`DataOrigin::Live`])
//! 3. 失败则返回缓存 ([`DataOrigin::Cached`])，没有缓存返回种子数据
//!    ([`DataOrigin::Seed`])
//!
//! # 写
//!
//! 1. 在提交锁内乐观地修改本地缓存并入队
//! 2. 锁外请求服务端
//! 3. 确认: 出队，用服务端返回值替换乐观条目，改写后续条目中的临时 id
//! 4. 拒绝 (4xx): 出队，撤销乐观修改，报告给调用方
//! 5. 网络失败/超时: 留在队列中，下次读或 `sync()` 时重放
//!
//! Whether the server is reachable is decided per call; there is no sticky
//! online/offline flag.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use http::Method;
use serde_json::Value;
use shared::ErrorBody;
use shared::util::now_millis;
use tokio::sync::Mutex;

use crate::local::LocalTier;
use crate::optimistic::{self, item_id};
use crate::pending::{
    ConfirmedWrite, PENDING_KEY, PendingWrite, RejectedWrite, StockAdjustment, SyncReport,
    WriteOp,
};
use crate::remote::RemoteTier;
use crate::resource::Resource;
use crate::{ClientError, ClientResult};

/// Where a read was answered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Live,
    Cached,
    Seed,
}

impl DataOrigin {
    /// The server did not answer this read
    pub fn is_degraded(&self) -> bool {
        !matches!(self, DataOrigin::Live)
    }
}

/// A read result tagged with its origin
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: DataOrigin,
}

impl<T> Fetched<T> {
    pub fn new(data: T, origin: DataOrigin) -> Self {
        Self { data, origin }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            origin: self.origin,
        }
    }
}

/// What became of a write
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome<T = Value> {
    /// The server accepted it; carries the authoritative value
    Confirmed(T),
    /// Committed locally only; carries the optimistic value
    Queued(T),
    /// The server refused it; the local change was rolled back
    Rejected(ErrorBody),
}

impl<T> WriteOutcome<T> {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, WriteOutcome::Confirmed(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, WriteOutcome::Rejected(_))
    }

    /// The confirmed or optimistic value
    pub fn value(&self) -> Option<&T> {
        match self {
            WriteOutcome::Confirmed(v) | WriteOutcome::Queued(v) => Some(v),
            WriteOutcome::Rejected(_) => None,
        }
    }
}

impl WriteOutcome<Value> {
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> ClientResult<WriteOutcome<T>> {
        Ok(match self {
            WriteOutcome::Confirmed(v) => WriteOutcome::Confirmed(serde_json::from_value(v)?),
            WriteOutcome::Queued(v) => WriteOutcome::Queued(serde_json::from_value(v)?),
            WriteOutcome::Rejected(e) => WriteOutcome::Rejected(e),
        })
    }
}

#[derive(Debug, Default)]
struct QueueState {
    queue: Vec<PendingWrite>,
    /// Entries currently being sent
    in_flight: HashSet<String>,
    /// In-flight stock adjustments left out of a server snapshot that may
    /// already contain them
    unreflected: HashSet<String>,
}

enum Settled {
    Confirmed(Value),
    Rejected(ErrorBody),
    Pending(ClientError),
    /// Already settled by someone else
    Gone,
}

/// Two-tier store with a pending-write queue
pub struct HybridStore {
    remote: Arc<dyn RemoteTier>,
    local: Arc<dyn LocalTier>,
    timeout: Duration,
    /// Commit lock: local mutations and queue edits
    state: Mutex<QueueState>,
    /// Serializes queue replays
    replay: Mutex<()>,
}

impl std::fmt::Debug for HybridStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridStore")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HybridStore {
    /// Open the store, restoring any persisted pending writes
    pub async fn open(
        remote: Arc<dyn RemoteTier>,
        local: Arc<dyn LocalTier>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let queue = match local.load(PENDING_KEY).await? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Dropping unreadable pending-write queue");
                Vec::new()
            }),
            None => Vec::new(),
        };
        if !queue.is_empty() {
            tracing::info!(count = queue.len(), "Restored pending writes");
        }
        Ok(Self {
            remote,
            local,
            timeout,
            state: Mutex::new(QueueState {
                queue,
                ..Default::default()
            }),
            replay: Mutex::new(()),
        })
    }

    /// Remote call bounded by the store timeout
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        match tokio::time::timeout(self.timeout, self.remote.call(method, path, body)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout),
        }
    }

    /// Number of writes not yet settled by the server
    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Snapshot of the pending-write queue
    pub async fn pending(&self) -> Vec<PendingWrite> {
        self.state.lock().await.queue.clone()
    }

    /// Cached collection without touching the server
    pub async fn cached(&self, resource: Resource) -> Fetched<Value> {
        match self.local.load(resource.cache_key()).await {
            Ok(Some(value)) => Fetched::new(value, DataOrigin::Cached),
            Ok(None) => Fetched::new(resource.seed(), DataOrigin::Seed),
            Err(e) => {
                tracing::warn!(%resource, error = %e, "Cache unreadable, using seed");
                Fetched::new(resource.seed(), DataOrigin::Seed)
            }
        }
    }

    /// Read a collection: server first, then cache, then seed
    pub async fn read(&self, resource: Resource) -> Fetched<Value> {
        self.sync().await;

        match self.request(Method::GET, resource.path(), None).await {
            Ok(value) => Fetched::new(self.store_snapshot(resource, value).await, DataOrigin::Live),
            Err(e) => {
                tracing::warn!(%resource, error = %e, "Server unavailable, serving local copy");
                self.cached(resource).await
            }
        }
    }

    /// Cache a server snapshot with the still-queued effects laid over it
    async fn store_snapshot(&self, resource: Resource, value: Value) -> Value {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let mut items = optimistic::items(value);
        // 服务端还没确认的写入重新叠加上去
        for entry in &state.queue {
            let with_stock = !snapshot_may_contain(state, resource, entry);
            if !with_stock {
                state.unreflected.insert(entry.id.clone());
            }
            apply_entry(resource, &mut items, entry, with_stock);
        }
        let value = Value::Array(items);
        if let Err(e) = self.local.store(resource.cache_key(), &value).await {
            tracing::warn!(%resource, error = %e, "Failed to refresh cache");
        }
        value
    }

    /// Re-read products once a sale the last snapshot was unsure about settles
    async fn refresh_products(&self) {
        match self.request(Method::GET, Resource::Products.path(), None).await {
            Ok(value) => {
                self.store_snapshot(Resource::Products, value).await;
            }
            Err(e) => tracing::debug!(error = %e, "Product refresh skipped"),
        }
    }

    /// Commit locally, queue, then try the server
    pub async fn write(&self, resource: Resource, op: WriteOp) -> ClientResult<WriteOutcome> {
        let (entry, optimistic, direct) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let (entry, optimistic) = self.commit_locally(resource, op).await?;

            // 有更早的排队条目，或依赖尚未确认的新建条目时，按顺序回放
            let blocked = state.queue.iter().any(|p| {
                !state.in_flight.contains(&p.id)
                    || p.temp_id.as_deref().is_some_and(|t| entry.references(t))
            });
            state.queue.push(entry.clone());
            if !blocked {
                state.in_flight.insert(entry.id.clone());
            }
            self.persist_queue(&state.queue).await;
            (entry, optimistic, !blocked)
        };

        if direct {
            let result = self.send(&entry).await;
            return Ok(match self.settle(&entry.id, result).await {
                Settled::Confirmed(value) => WriteOutcome::Confirmed(value),
                Settled::Rejected(error) => WriteOutcome::Rejected(error),
                Settled::Pending(e) => {
                    tracing::info!(resource = %entry.resource, error = %e, "Write queued for later sync");
                    WriteOutcome::Queued(optimistic)
                }
                Settled::Gone => WriteOutcome::Queued(optimistic),
            });
        }

        let report = self.sync().await;
        if let Some(done) = report.confirmed.into_iter().find(|c| c.entry_id == entry.id) {
            return Ok(WriteOutcome::Confirmed(done.value));
        }
        if let Some(refused) = report.rejected.into_iter().find(|r| r.entry_id == entry.id) {
            return Ok(WriteOutcome::Rejected(refused.error));
        }
        Ok(WriteOutcome::Queued(optimistic))
    }

    /// Replay the queue in order, stopping at the first network failure
    pub async fn sync(&self) -> SyncReport {
        let _replay = self.replay.lock().await;
        let mut report = SyncReport::default();

        loop {
            let entry = {
                let mut guard = self.state.lock().await;
                let state = &mut *guard;
                let Some(pos) = state
                    .queue
                    .iter()
                    .position(|p| !state.in_flight.contains(&p.id))
                else {
                    break;
                };
                let next = &state.queue[pos];
                let waits_on_create = state.queue[..pos]
                    .iter()
                    .any(|earlier| earlier.temp_id.as_deref().is_some_and(|t| next.references(t)));
                if waits_on_create {
                    break;
                }
                let entry = next.clone();
                state.in_flight.insert(entry.id.clone());
                entry
            };

            let result = self.send(&entry).await;
            match self.settle(&entry.id, result).await {
                Settled::Confirmed(value) => report.confirmed.push(ConfirmedWrite {
                    entry_id: entry.id,
                    resource: entry.resource,
                    value,
                }),
                Settled::Rejected(error) => report.rejected.push(RejectedWrite {
                    entry_id: entry.id,
                    resource: entry.resource,
                    error,
                }),
                Settled::Pending(e) => {
                    tracing::debug!(error = %e, "Sync stopped, server unreachable");
                    break;
                }
                Settled::Gone => {}
            }
        }

        report.pending = self.state.lock().await.queue.len();
        if !report.confirmed.is_empty() || !report.rejected.is_empty() {
            tracing::info!(
                confirmed = report.confirmed.len(),
                rejected = report.rejected.len(),
                pending = report.pending,
                "Pending writes replayed"
            );
        }
        report
    }

    async fn send(&self, entry: &PendingWrite) -> ClientResult<Value> {
        self.request(
            entry.op.method(),
            &entry.op.path(entry.resource),
            entry.op.body(),
        )
        .await
    }

    /// Apply the server's verdict for one entry
    async fn settle(&self, entry_id: &str, result: ClientResult<Value>) -> Settled {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.in_flight.remove(entry_id);
        let unreflected = state.unreflected.remove(entry_id);

        let Some(pos) = state.queue.iter().position(|p| p.id == entry_id) else {
            return Settled::Gone;
        };

        let settled = match result {
            Ok(value) => {
                let entry = state.queue.remove(pos);
                self.confirm(state, &entry, &value).await;
                self.persist_queue(&state.queue).await;
                Settled::Confirmed(value)
            }
            Err(e) if e.is_rejection() => {
                let entry = state.queue.remove(pos);
                tracing::warn!(resource = %entry.resource, error = %e, "Server rejected write");
                // a skipped adjustment never reached the cache
                self.roll_back(&entry, !unreflected).await;
                self.persist_queue(&state.queue).await;
                Settled::Rejected(e.error_body().unwrap_or_else(|| ErrorBody {
                    code: String::new(),
                    message: e.to_string(),
                }))
            }
            Err(e) => {
                // still queued: its adjustment belongs in the cache again
                let adjustment = state.queue[pos].stock_adjustment.clone();
                if let Some(adj) = adjustment.filter(|_| unreflected) {
                    let mut products =
                        optimistic::items(self.cached(Resource::Products).await.data);
                    optimistic::adjust_stock(&mut products, &adj.product_id, adj.delta);
                    if let Err(store_err) = self.store_items(Resource::Products, products).await {
                        tracing::warn!(error = %store_err, "Failed to restore cached stock");
                    }
                }
                Settled::Pending(e)
            }
        };
        drop(guard);

        if unreflected && matches!(settled, Settled::Confirmed(_)) {
            self.refresh_products().await;
        }
        settled
    }

    /// Local commit of a new write. Caller holds the commit lock.
    async fn commit_locally(
        &self,
        resource: Resource,
        op: WriteOp,
    ) -> ClientResult<(PendingWrite, Value)> {
        let now = now_millis();
        let mut items = optimistic::items(self.cached(resource).await.data);
        let mut entry = PendingWrite::new(resource, op, now);

        let optimistic = match &entry.op {
            WriteOp::Create { body } => {
                let temp_id = optimistic::new_temp_id();
                let draft = if resource == Resource::Transactions {
                    let products = optimistic::items(self.cached(Resource::Products).await.data);
                    let (draft, product_id, delta) =
                        optimistic::draft_transaction(body, &products, &temp_id, now)
                            .ok_or_else(|| {
                                ClientError::Request(
                                    "transaction needs a type and a productId".into(),
                                )
                            })?;
                    entry.stock_adjustment = Some(StockAdjustment { product_id, delta });
                    draft
                } else {
                    optimistic::draft_item(body, &temp_id, now)
                };
                entry.temp_id = Some(temp_id);
                entry.draft = Some(draft.clone());
                draft
            }
            WriteOp::Update { id, patch } => {
                let previous = optimistic::find(&items, id).cloned();
                let mut merged = previous
                    .clone()
                    .unwrap_or_else(|| serde_json::json!({ "id": id }));
                optimistic::merge(&mut merged, patch);
                entry.previous = previous;
                merged
            }
            WriteOp::Delete { id } => {
                entry.previous = optimistic::find(&items, id).cloned();
                Value::Null
            }
        };

        apply_entry(resource, &mut items, &entry, true);
        self.store_items(resource, items).await?;
        for other in entry.affects().into_iter().filter(|r| *r != resource) {
            let mut others = optimistic::items(self.cached(other).await.data);
            apply_entry(other, &mut others, &entry, true);
            self.store_items(other, others).await?;
        }
        Ok((entry, optimistic))
    }

    /// Replace the optimistic item with the server's and retire a temp id
    async fn confirm(&self, state: &mut QueueState, entry: &PendingWrite, value: &Value) {
        let real_id = item_id(value).map(str::to_string);
        let temp_id = entry.temp_id.as_deref();

        let renamed = match (temp_id, real_id.as_deref()) {
            (Some(temp), Some(real)) if temp != real => Some((temp, real)),
            _ => None,
        };

        if let Some((temp, real)) = renamed {
            for later in state.queue.iter_mut() {
                later.rewrite_id(temp, real);
            }
        }

        for resource in Resource::ALL {
            let touches = resource == entry.resource || renamed.is_some();
            if !touches {
                continue;
            }
            let mut items = optimistic::items(self.cached(resource).await.data);
            if let Some((temp, real)) = renamed {
                for item in items.iter_mut() {
                    optimistic::rewrite_ids(item, temp, real);
                }
            }
            if resource == entry.resource {
                match (&entry.op, real_id.as_deref()) {
                    (WriteOp::Delete { .. }, _) => {}
                    (_, Some(id)) => {
                        if !optimistic::replace(&mut items, id, value.clone()) {
                            optimistic::insert_front(&mut items, value.clone());
                        }
                        reapply_to_item(state, resource, id, &mut items);
                    }
                    (_, None) => {}
                }
            }
            if let Err(e) = self.store_items(resource, items).await {
                tracing::warn!(%resource, error = %e, "Failed to store confirmed value");
            }
        }
    }

    /// Undo the local commit of a rejected write
    async fn roll_back(&self, entry: &PendingWrite, revert_stock: bool) {
        let mut items = optimistic::items(self.cached(entry.resource).await.data);
        match &entry.op {
            WriteOp::Create { .. } => {
                if let Some(temp) = &entry.temp_id {
                    optimistic::remove(&mut items, temp);
                }
            }
            WriteOp::Update { id, .. } => {
                if let Some(previous) = &entry.previous {
                    optimistic::replace(&mut items, id, previous.clone());
                }
            }
            WriteOp::Delete { id } => {
                if let Some(previous) = &entry.previous {
                    if optimistic::find(&items, id).is_none() {
                        optimistic::insert_front(&mut items, previous.clone());
                    }
                }
            }
        }
        if let Err(e) = self.store_items(entry.resource, items).await {
            tracing::warn!(resource = %entry.resource, error = %e, "Failed to roll back cache");
        }

        if let Some(adj) = entry.stock_adjustment.as_ref().filter(|_| revert_stock) {
            let mut products = optimistic::items(self.cached(Resource::Products).await.data);
            optimistic::adjust_stock(&mut products, &adj.product_id, -adj.delta);
            if let Err(e) = self.store_items(Resource::Products, products).await {
                tracing::warn!(error = %e, "Failed to restore cached stock");
            }
        }
    }

    async fn store_items(&self, resource: Resource, items: Vec<Value>) -> ClientResult<()> {
        self.local
            .store(resource.cache_key(), &Value::Array(items))
            .await
    }

    async fn persist_queue(&self, queue: &[PendingWrite]) {
        let stored = match serde_json::to_value(queue) {
            Ok(value) => self.local.store(PENDING_KEY, &value).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = stored {
            tracing::error!(error = %e, "Failed to persist pending writes");
        }
    }
}

impl PendingWrite {
    /// Cached collections this entry changes
    fn affects(&self) -> Vec<Resource> {
        let mut affected = vec![self.resource];
        match (&self.op, self.resource) {
            (WriteOp::Create { .. }, Resource::Transactions) => affected.push(Resource::Products),
            (WriteOp::Delete { .. }, Resource::Products) => affected.push(Resource::Transactions),
            _ => {}
        }
        affected
    }
}

/// The server may already hold an in-flight sale or purchase whose reply is
/// still on its way, so a fresh product snapshot is ambiguous about its stock
fn snapshot_may_contain(state: &QueueState, resource: Resource, entry: &PendingWrite) -> bool {
    resource == Resource::Products
        && entry.stock_adjustment.is_some()
        && state.in_flight.contains(&entry.id)
}

/// Apply one entry's optimistic effect to the cached `resource` collection
fn apply_entry(resource: Resource, items: &mut Vec<Value>, entry: &PendingWrite, with_stock: bool) {
    if resource == entry.resource {
        match &entry.op {
            WriteOp::Create { .. } => {
                if let (Some(temp), Some(draft)) = (&entry.temp_id, &entry.draft) {
                    if optimistic::find(items, temp).is_none() {
                        optimistic::insert_front(items, draft.clone());
                    }
                }
            }
            WriteOp::Update { id, patch } => {
                if let Some(item) = items.iter_mut().find(|i| item_id(i) == Some(id.as_str())) {
                    optimistic::merge(item, patch);
                }
            }
            WriteOp::Delete { id } => {
                optimistic::remove(items, id);
            }
        }
    }

    match (resource, entry.resource, &entry.op) {
        (Resource::Products, Resource::Transactions, WriteOp::Create { .. }) if with_stock => {
            if let Some(adj) = &entry.stock_adjustment {
                optimistic::adjust_stock(items, &adj.product_id, adj.delta);
            }
        }
        (Resource::Transactions, Resource::Products, WriteOp::Delete { id }) => {
            items.retain(|tx| tx.get("productId").and_then(Value::as_str) != Some(id.as_str()));
        }
        _ => {}
    }
}

/// Re-apply still-queued effects on one item the server just returned
fn reapply_to_item(state: &mut QueueState, resource: Resource, id: &str, items: &mut [Value]) {
    for later in &state.queue {
        match (&later.op, later.resource) {
            (WriteOp::Update { id: target, patch }, r) if r == resource && target == id => {
                if let Some(item) = items.iter_mut().find(|i| item_id(i) == Some(id)) {
                    optimistic::merge(item, patch);
                }
            }
            (WriteOp::Create { .. }, Resource::Transactions) if resource == Resource::Products => {
                if let Some(adj) = later
                    .stock_adjustment
                    .as_ref()
                    .filter(|adj| adj.product_id == id)
                {
                    if state.in_flight.contains(&later.id) {
                        state.unreflected.insert(later.id.clone());
                    } else {
                        optimistic::adjust_stock(items, id, adj.delta);
                    }
                }
            }
            _ => {}
        }
    }
}
