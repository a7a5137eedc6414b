//! Inventory summary computation
//!
//! Pure function over products and transactions. The server serves it from
//! the store; the client recomputes it from its cache when offline.

use std::collections::HashMap;

use crate::models::{
    CategoryStock, InventorySummary, LedgerDrift, LowStockItem, PaymentStatus, Product,
    ProductSales, Transaction, TransactionType,
};
use crate::money;

/// Products with stock below this are flagged
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

pub fn summarize(
    products: &[Product],
    transactions: &[Transaction],
    low_stock_threshold: i64,
) -> InventorySummary {
    let inventory_value = money::sum(
        products
            .iter()
            .map(|p| p.stock as f64 * p.cost_price),
    );

    let low_stock = products
        .iter()
        .filter(|p| p.stock < low_stock_threshold)
        .map(|p| LowStockItem {
            product_id: p.id.clone(),
            name: p.name.clone(),
            sku: p.sku.clone(),
            stock: p.stock,
        })
        .collect();

    let amounts = |tx_type: TransactionType, pending_only: bool| {
        money::sum(
            transactions
                .iter()
                .filter(|t| t.tx_type == tx_type)
                .filter(|t| !pending_only || t.status == PaymentStatus::Pending)
                .map(|t| t.total_amount),
        )
    };

    let mut sales_per_product: HashMap<&str, Vec<f64>> = HashMap::new();
    let mut net_per_product: HashMap<&str, i64> = HashMap::new();
    for tx in transactions {
        if tx.tx_type == TransactionType::Sale {
            sales_per_product
                .entry(tx.product_id.as_str())
                .or_default()
                .push(tx.total_amount);
        }
        let net = net_per_product.entry(tx.product_id.as_str()).or_default();
        *net = net.saturating_add(tx.tx_type.stock_delta(tx.quantity));
    }

    let sales_by_product = products
        .iter()
        .filter_map(|p| {
            let sales = money::sum(sales_per_product.remove(p.id.as_str())?);
            (sales > 0.0).then(|| ProductSales {
                product_id: p.id.clone(),
                name: p.name.clone(),
                sales,
            })
        })
        .collect();

    let stock_by_category = crate::models::Category::ALL
        .iter()
        .map(|c| CategoryStock {
            category: *c,
            stock: products
                .iter()
                .filter(|p| p.category == *c)
                .fold(0_i64, |acc, p| acc.saturating_add(p.stock)),
        })
        .collect();

    let ledger_drift = products
        .iter()
        .filter_map(|p| {
            let net = net_per_product.get(p.id.as_str()).copied().unwrap_or(0);
            (net != p.stock).then(|| LedgerDrift {
                product_id: p.id.clone(),
                name: p.name.clone(),
                stock: p.stock,
                ledger_net: net,
            })
        })
        .collect();

    InventorySummary {
        product_count: products.len(),
        transaction_count: transactions.len(),
        inventory_value,
        low_stock_threshold,
        low_stock,
        total_sales: amounts(TransactionType::Sale, false),
        total_purchases: amounts(TransactionType::Purchase, false),
        pending_receivable: amounts(TransactionType::Sale, true),
        pending_payable: amounts(TransactionType::Purchase, true),
        sales_by_product,
        stock_by_category,
        ledger_drift,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn product(id: &str, category: Category, stock: i64, cost: f64) -> Product {
        Product {
            id: id.into(),
            name: format!("P{id}"),
            category,
            sku: format!("SKU-{id}"),
            variant: String::new(),
            cost_price: cost,
            selling_price: cost * 2.0,
            stock,
            description: String::new(),
            image: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn tx(product_id: &str, tx_type: TransactionType, qty: i64, total: f64, status: PaymentStatus) -> Transaction {
        Transaction {
            id: format!("{product_id}-{qty}"),
            tx_type,
            product_id: product_id.into(),
            product_name: String::new(),
            quantity: qty,
            unit_price: 0.0,
            tax_amount: 0.0,
            total_amount: total,
            date: 0,
            status,
            entity_name: String::new(),
            user_id: None,
            shipping: None,
            created_at: 0,
        }
    }

    #[test]
    fn totals_and_pending_split_by_type() {
        let products = vec![product("a", Category::Fabric, 7, 100.0)];
        let txs = vec![
            tx("a", TransactionType::Purchase, 10, 1000.0, PaymentStatus::Pending),
            tx("a", TransactionType::Sale, 3, 600.0, PaymentStatus::Paid),
            tx("a", TransactionType::Sale, 0, 50.5, PaymentStatus::Pending),
        ];
        let s = summarize(&products, &txs, DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(s.total_sales, 650.5);
        assert_eq!(s.total_purchases, 1000.0);
        assert_eq!(s.pending_receivable, 50.5);
        assert_eq!(s.pending_payable, 1000.0);
        assert_eq!(s.inventory_value, 700.0);
        assert_eq!(s.sales_by_product.len(), 1);
        assert_eq!(s.sales_by_product[0].sales, 650.5);
    }

    #[test]
    fn low_stock_and_categories() {
        let products = vec![
            product("a", Category::Fabric, 45, 500.0),
            product("b", Category::Towel, 9, 200.0),
            product("c", Category::Towel, 3, 1.0),
        ];
        let s = summarize(&products, &[], 10);
        let low: Vec<_> = s.low_stock.iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(low, vec!["b", "c"]);
        let towels = s
            .stock_by_category
            .iter()
            .find(|c| c.category == Category::Towel)
            .unwrap();
        assert_eq!(towels.stock, 12);
        assert_eq!(s.stock_by_category.len(), 4);
        assert!(s.sales_by_product.is_empty());
    }

    #[test]
    fn drift_reports_stock_not_explained_by_ledger() {
        let products = vec![
            product("a", Category::Fabric, 7, 1.0),
            product("b", Category::Fabric, 5, 1.0),
        ];
        let txs = vec![
            tx("a", TransactionType::Purchase, 10, 0.0, PaymentStatus::Paid),
            tx("a", TransactionType::Sale, 3, 0.0, PaymentStatus::Paid),
        ];
        let s = summarize(&products, &txs, 10);
        assert_eq!(s.ledger_drift.len(), 1);
        assert_eq!(s.ledger_drift[0].product_id, "b");
        assert_eq!(s.ledger_drift[0].ledger_net, 0);
    }

    #[test]
    fn huge_values_saturate_instead_of_overflowing() {
        let products = vec![
            product("a", Category::Fabric, i64::MAX, 1e12),
            product("b", Category::Fabric, i64::MAX, 1e12),
        ];
        let txs = vec![
            tx("a", TransactionType::Purchase, i64::MAX, 5e28, PaymentStatus::Paid),
            tx("a", TransactionType::Purchase, i64::MAX, 5e28, PaymentStatus::Paid),
            tx("b", TransactionType::Sale, i64::MAX, 5e28, PaymentStatus::Paid),
            tx("b", TransactionType::Sale, i64::MAX, 5e28, PaymentStatus::Paid),
        ];
        let s = summarize(&products, &txs, 10);
        let fabric = s
            .stock_by_category
            .iter()
            .find(|c| c.category == Category::Fabric)
            .unwrap();
        assert_eq!(fabric.stock, i64::MAX);
        assert!(s.total_purchases >= 5e28);
        assert!(s.total_sales >= 5e28);
        // a: net saturates at i64::MAX, which equals its stock
        assert_eq!(s.ledger_drift.len(), 1);
        assert_eq!(s.ledger_drift[0].product_id, "b");
        assert_eq!(s.ledger_drift[0].ledger_net, i64::MIN);
    }
}
