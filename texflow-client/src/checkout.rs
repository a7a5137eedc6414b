//! POS / storefront checkout
//!
//! One Sale per invoice line, issued concurrently. Lines are independent:
//! a line refused for insufficient stock does not undo the others.

use futures::future::join_all;
use shared::ErrorBody;
use shared::billing::{CartLine, Invoice, InvoiceLine};
use shared::models::{ShippingInfo, Transaction};

use crate::client::TexflowClient;
use crate::store::WriteOutcome;

/// What happened to one invoice line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Recorded(Transaction),
    /// Committed locally, waiting for the server
    Queued(Transaction),
    Refused(ErrorBody),
    /// The write never reached the queue (local tier failure)
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReport {
    pub invoice: Invoice,
    /// Same order as `invoice.lines`
    pub lines: Vec<LineOutcome>,
}

impl CheckoutReport {
    pub fn all_recorded(&self) -> bool {
        self.lines
            .iter()
            .all(|l| matches!(l, LineOutcome::Recorded(_)))
    }

    /// Lines the server refused, with the reason
    pub fn refused(&self) -> impl Iterator<Item = (&InvoiceLine, &ErrorBody)> + '_ {
        self.invoice
            .lines
            .iter()
            .zip(&self.lines)
            .filter_map(|(line, outcome)| match outcome {
                LineOutcome::Refused(e) => Some((line, e)),
                _ => None,
            })
    }
}

impl TexflowClient {
    /// Record every line of `invoice` as a Sale
    pub async fn checkout(&self, invoice: Invoice) -> CheckoutReport {
        let sales = invoice.to_transactions();
        let outcomes = join_all(sales.iter().map(|tx| self.record_transaction(tx))).await;

        let lines = outcomes
            .into_iter()
            .map(|outcome| match outcome {
                Ok(WriteOutcome::Confirmed(tx)) => LineOutcome::Recorded(tx),
                Ok(WriteOutcome::Queued(tx)) => LineOutcome::Queued(tx),
                Ok(WriteOutcome::Rejected(e)) => LineOutcome::Refused(e),
                Err(e) => LineOutcome::Failed(e.to_string()),
            })
            .collect();

        let report = CheckoutReport { invoice, lines };
        tracing::info!(
            customer = %report.invoice.customer,
            total = report.invoice.total,
            lines = report.lines.len(),
            recorded = report.all_recorded(),
            "Checkout finished"
        );
        report
    }

    /// Counter sale with 18% GST
    pub async fn checkout_counter(
        &self,
        lines: &[CartLine],
        customer: Option<&str>,
    ) -> CheckoutReport {
        self.checkout(Invoice::counter(lines, customer)).await
    }

    /// Storefront order: no tax, "Online Customer", shipping attached
    pub async fn checkout_storefront(
        &self,
        lines: &[CartLine],
        user_id: Option<&str>,
        shipping: ShippingInfo,
    ) -> CheckoutReport {
        let mut invoice = Invoice::storefront(lines).with_shipping(shipping);
        if let Some(user) = user_id {
            invoice = invoice.with_user(user);
        }
        self.checkout(invoice).await
    }
}
