//! Read fallback, optimistic writes and pending-write replay

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::FakeServer;
use serde_json::json;
use texflow_client::models::{ProductCreate, SupplierCreate, TransactionCreate};
use texflow_client::{
    DataOrigin, FileCache, LocalTier, MemoryCache, Resource, TexflowClient, WriteOutcome,
};

const TIMEOUT: Duration = Duration::from_millis(200);

async fn client_with(server: &Arc<FakeServer>, local: Arc<dyn LocalTier>) -> TexflowClient {
    TexflowClient::with_tiers(server.clone(), local, TIMEOUT)
        .await
        .unwrap()
}

async fn client(server: &Arc<FakeServer>) -> TexflowClient {
    client_with(server, Arc::new(MemoryCache::new())).await
}

fn cotton() -> ProductCreate {
    ProductCreate {
        name: Some("Cotton".into()),
        sku: Some("TEX-001".into()),
        cost_price: Some(150.0),
        selling_price: Some(200.0),
        stock: Some(10),
        ..Default::default()
    }
}

#[tokio::test]
async fn offline_without_cache_serves_seed() {
    let server = Arc::new(FakeServer::offline());
    let client = client(&server).await;

    let products = client.products().await.unwrap();
    assert_eq!(products.origin, DataOrigin::Seed);
    let skus: Vec<_> = products.data.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, ["TEX-M001", "TEX-M002"]);

    let suppliers = client.suppliers().await.unwrap();
    assert_eq!(suppliers.data[0].name, "Local Fabrics Co");
    let customers = client.customers().await.unwrap();
    assert_eq!(customers.data[0].name, "Walk-in Customer");
    let transactions = client.transactions().await.unwrap();
    assert!(transactions.data.is_empty());
    assert!(transactions.origin.is_degraded());
}

#[tokio::test]
async fn live_read_overwrites_cache_and_survives_outage() {
    let server = Arc::new(FakeServer::online().with_product("p1", "TEX-001", 10, 200.0));
    let client = client(&server).await;

    let live = client.products().await.unwrap();
    assert_eq!(live.origin, DataOrigin::Live);
    assert_eq!(live.data.len(), 1);
    assert_eq!(live.data[0].sku, "TEX-001");

    server.set_online(false);
    let cached = client.products().await.unwrap();
    assert_eq!(cached.origin, DataOrigin::Cached);
    assert_eq!(cached.data, live.data);

    // back online: the mode is decided per call
    server.set_online(true);
    assert_eq!(client.products().await.unwrap().origin, DataOrigin::Live);
}

#[tokio::test]
async fn slow_server_falls_back_after_timeout() {
    let server = Arc::new(FakeServer::online().with_product("p1", "TEX-001", 10, 200.0));
    let client = client(&server).await;
    client.products().await.unwrap();

    server.set_delay(Duration::from_secs(5));
    let started = std::time::Instant::now();
    let products = client.products().await.unwrap();
    assert_eq!(products.origin, DataOrigin::Cached);
    assert_eq!(products.data[0].id, "p1");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn file_cache_outlives_the_client() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(FakeServer::online().with_product("p1", "TEX-001", 10, 200.0));
    {
        let client = client_with(&server, Arc::new(FileCache::new(dir.path()))).await;
        client.products().await.unwrap();
    }

    server.set_online(false);
    let client = client_with(&server, Arc::new(FileCache::new(dir.path()))).await;
    let products = client.products().await.unwrap();
    assert_eq!(products.origin, DataOrigin::Cached);
    assert_eq!(products.data[0].sku, "TEX-001");
}

#[tokio::test]
async fn offline_writes_replay_in_order_with_real_ids() {
    let server = Arc::new(FakeServer::offline());
    let client = client(&server).await;

    let created = client.save_product(None, &cotton()).await.unwrap();
    let temp_id = match created {
        WriteOutcome::Queued(p) => p.id,
        other => panic!("expected queued, got {other:?}"),
    };
    assert!(temp_id.starts_with("local-"));

    let sale = client
        .record_transaction(&TransactionCreate::sale(temp_id.clone(), 3))
        .await
        .unwrap();
    let tx = sale.value().cloned().unwrap();
    assert!(!sale.is_confirmed());
    assert_eq!(tx.total_amount, 600.0);
    assert_eq!(tx.product_name, "Cotton");

    // optimistic stock
    let cached = client.products().await.unwrap();
    let local = cached.data.iter().find(|p| p.id == temp_id).unwrap();
    assert_eq!(local.stock, 7);
    assert_eq!(client.store().pending_count().await, 2);

    server.set_online(true);
    let report = client.sync().await;
    assert_eq!(report.confirmed.len(), 2);
    assert!(report.rejected.is_empty());
    assert_eq!(report.pending, 0);

    let sent = server.transactions.lock().unwrap()[0].clone();
    assert_eq!(sent["productId"], json!("srv-1"));
    assert_eq!(server.stock_of("srv-1"), Some(7));

    let live = client.products().await.unwrap();
    assert_eq!(live.origin, DataOrigin::Live);
    assert_eq!(live.data[0].id, "srv-1");
    assert_eq!(live.data[0].stock, 7);
    let txs = client.transactions().await.unwrap();
    assert_eq!(txs.data[0].product_id, "srv-1");
}

#[tokio::test]
async fn rejected_sale_is_discarded_and_rolled_back() {
    let server = Arc::new(FakeServer::online().with_product("p1", "TEX-001", 2, 200.0));
    let client = client(&server).await;
    client.products().await.unwrap();

    let outcome = client
        .record_transaction(&TransactionCreate::sale("p1", 5))
        .await
        .unwrap();
    match outcome {
        WriteOutcome::Rejected(err) => {
            assert_eq!(err.code, "E0007");
            assert!(err.message.contains("available 2"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    assert_eq!(client.store().pending_count().await, 0);
    let cached = client.store().cached(Resource::Products).await;
    assert_eq!(cached.data[0]["stock"], json!(2));
    let txs = client.store().cached(Resource::Transactions).await;
    assert_eq!(txs.data, json!([]));
    assert_eq!(server.stock_of("p1"), Some(2));
}

#[tokio::test]
async fn queued_write_is_sent_before_the_next_read() {
    let server = Arc::new(FakeServer::offline());
    let client = client(&server).await;

    let supplier = SupplierCreate {
        name: Some("Weavers Guild".into()),
        ..Default::default()
    };
    // FakeServer has no POST /api/suppliers, so the replay is rejected
    client.save_supplier(None, &supplier).await.unwrap();
    assert_eq!(client.store().pending_count().await, 1);

    server.set_online(true);
    let suppliers = client.suppliers().await.unwrap();
    assert_eq!(suppliers.origin, DataOrigin::Live);
    assert_eq!(client.store().pending_count().await, 0);
    assert_eq!(
        server.calls(),
        ["POST /api/suppliers", "GET /api/suppliers"]
    );
}

#[tokio::test]
async fn degraded_summary_is_computed_from_cache() {
    let server = Arc::new(FakeServer::offline());
    let client = client(&server).await;

    let summary = client.summary().await.unwrap();
    assert_eq!(summary.origin, DataOrigin::Seed);
    assert_eq!(summary.data.product_count, 2);
    // 45 × 500 + 12 × 200
    assert_eq!(summary.data.inventory_value, 24_900.0);
    assert_eq!(summary.data.transaction_count, 0);

    assert!(client.health().await.is_err());
}

#[tokio::test]
async fn persisted_queue_is_restored_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let server = Arc::new(FakeServer::offline().with_product("p1", "TEX-001", 10, 200.0));
    {
        let client = client_with(&server, Arc::new(FileCache::new(dir.path()))).await;
        client
            .record_transaction(&TransactionCreate::purchase("p1", 4))
            .await
            .unwrap();
    }

    let client = client_with(&server, Arc::new(FileCache::new(dir.path()))).await;
    assert_eq!(client.store().pending_count().await, 1);

    server.set_online(true);
    let report = client.sync().await;
    assert_eq!(report.confirmed.len(), 1);
    assert!(report.is_clean());
    assert_eq!(server.stock_of("p1"), Some(14));
}

#[tokio::test]
async fn read_during_an_unanswered_sale_does_not_count_it_twice() {
    let server = Arc::new(FakeServer::online().with_product("p1", "TEX-001", 10, 200.0));
    let client = TexflowClient::with_tiers(
        server.clone(),
        Arc::new(MemoryCache::new()),
        Duration::from_secs(2),
    )
    .await
    .unwrap();
    client.products().await.unwrap();

    // the server applies the sale at once but answers late
    server.set_reply_delay(Duration::from_millis(300));
    let sale = TransactionCreate::sale("p1", 3);
    let (recorded, during) = tokio::join!(client.record_transaction(&sale), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        client.products().await.unwrap()
    });

    assert_eq!(server.stock_of("p1"), Some(7));
    assert_eq!(during.origin, DataOrigin::Live);
    assert_eq!(during.data[0].stock, 7);

    assert!(recorded.unwrap().is_confirmed());
    let cached = client.store().cached(Resource::Products).await;
    assert_eq!(cached.data[0]["stock"], json!(7));
    assert_eq!(client.store().pending_count().await, 0);
}

#[tokio::test]
async fn refused_sale_seen_mid_flight_leaves_stock_alone() {
    let server = Arc::new(FakeServer::online().with_product("p1", "TEX-001", 2, 200.0));
    let client = TexflowClient::with_tiers(
        server.clone(),
        Arc::new(MemoryCache::new()),
        Duration::from_secs(2),
    )
    .await
    .unwrap();
    client.products().await.unwrap();

    server.set_reply_delay(Duration::from_millis(300));
    let sale = TransactionCreate::sale("p1", 5);
    let (recorded, during) = tokio::join!(client.record_transaction(&sale), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        client.products().await.unwrap()
    });

    assert_eq!(during.data[0].stock, 2);
    assert!(recorded.unwrap().is_rejected());
    let cached = client.store().cached(Resource::Products).await;
    assert_eq!(cached.data[0]["stock"], json!(2));
}
