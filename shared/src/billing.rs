//! Point-of-sale billing math
//!
//! The counter flow charges 18% GST per line and rounds each line total to
//! whole currency units. The storefront flow charges no tax. Each invoice line
//! becomes one Sale transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PaymentStatus, Product, ShippingInfo, TransactionCreate, TransactionType};
use crate::money::{round_whole, to_decimal, to_f64};

/// GST rate applied at the counter (18%)
pub const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";
pub const ONLINE_CUSTOMER: &str = "Online Customer";

/// How tax is charged on an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxMode {
    /// Counter billing: 18% GST, line totals rounded to whole units
    Gst,
    /// Storefront orders: no tax, exact totals
    None,
}

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

/// Priced invoice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
}

/// A cart being built at the counter or in the storefront
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`.
    ///
    /// Adding a product already in the cart merges the lines; the merged
    /// quantity never exceeds the stock known for that product. Returns the
    /// resulting line quantity.
    pub fn add(&mut self, product: &Product, quantity: i64) -> i64 {
        let quantity = quantity.max(1);
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity).min(product.stock.max(1));
            return line.quantity;
        }
        self.lines.push(CartLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price: product.selling_price,
            quantity,
        });
        quantity
    }

    /// Change a line's quantity by `delta`, never going below one unit
    pub fn adjust(&mut self, product_id: &str, delta: i64) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(delta).max(1);
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn units(&self) -> i64 {
        self.lines
            .iter()
            .fold(0_i64, |acc, l| acc.saturating_add(l.quantity))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Priced cart, ready to be turned into Sale transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub customer: String,
    pub tax_mode: TaxMode,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub tax: f64,
    /// Grand total; rounded to whole units under GST
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingInfo>,
}

impl Invoice {
    pub fn build(lines: &[CartLine], customer: impl Into<String>, tax_mode: TaxMode) -> Self {
        let mut subtotal = Decimal::ZERO;
        let mut tax = Decimal::ZERO;
        let lines = lines
            .iter()
            .map(|line| {
                let line_subtotal =
                    Decimal::from(line.quantity).saturating_mul(to_decimal(line.unit_price));
                let (line_tax, line_total) = match tax_mode {
                    TaxMode::Gst => {
                        let t = line_subtotal.saturating_mul(GST_RATE);
                        (t, to_decimal(round_whole(line_subtotal.saturating_add(t))))
                    }
                    TaxMode::None => (Decimal::ZERO, line_subtotal),
                };
                subtotal = subtotal.saturating_add(line_subtotal);
                tax = tax.saturating_add(line_tax);
                InvoiceLine {
                    product_id: line.product_id.clone(),
                    product_name: line.product_name.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    subtotal: to_f64(line_subtotal),
                    tax_amount: to_f64(line_tax),
                    total_amount: to_f64(line_total),
                }
            })
            .collect();

        let total = match tax_mode {
            TaxMode::Gst => round_whole(subtotal.saturating_add(tax)),
            TaxMode::None => to_f64(subtotal),
        };

        Self {
            customer: customer.into(),
            tax_mode,
            lines,
            subtotal: to_f64(subtotal),
            tax: to_f64(tax),
            total,
            user_id: None,
            shipping: None,
        }
    }

    /// Counter invoice (18% GST)
    pub fn counter(lines: &[CartLine], customer: Option<&str>) -> Self {
        Self::build(lines, customer.unwrap_or(WALK_IN_CUSTOMER), TaxMode::Gst)
    }

    /// Storefront order (no tax)
    pub fn storefront(lines: &[CartLine]) -> Self {
        Self::build(lines, ONLINE_CUSTOMER, TaxMode::None)
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_shipping(mut self, shipping: ShippingInfo) -> Self {
        self.shipping = Some(shipping);
        self
    }

    /// One Sale payload per line
    pub fn to_transactions(&self) -> Vec<TransactionCreate> {
        self.lines
            .iter()
            .map(|line| TransactionCreate {
                tx_type: Some(TransactionType::Sale),
                product_id: Some(line.product_id.clone()),
                quantity: Some(line.quantity),
                unit_price: Some(line.unit_price),
                tax_amount: Some(line.tax_amount),
                total_amount: Some(line.total_amount),
                date: None,
                status: Some(PaymentStatus::Paid),
                entity_name: Some(self.customer.clone()),
                user_id: self.user_id.clone(),
                shipping: self.shipping.clone(),
            })
            .collect()
    }
}
