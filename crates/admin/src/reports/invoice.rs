//! Invoice report: invoiced orders within a date range.

use bazaar_core::{DateRange, OrderId, OrderStatus};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::NOT_AVAILABLE;
use crate::api::Order;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRow {
    pub serial: usize,
    pub order_id: OrderId,
    pub invoice_number: Option<String>,
    /// Invoice time in the report offset.
    pub invoice_date: DateTime<FixedOffset>,
    /// Billing contact name, or `N/A`.
    pub customer: String,
    pub total: f64,
    pub status: OrderStatus,
}

/// List the orders invoiced inside `range`.
///
/// Filters on the invoice date rather than the creation date; orders that
/// were never invoiced are skipped. Without a range nothing is listed.
/// The end day is inclusive: invoices up to 23:59:59.999 on it are listed.
#[must_use]
pub fn invoice_report(
    orders: &[Order],
    range: Option<&DateRange>,
    offset: FixedOffset,
) -> Vec<InvoiceRow> {
    let Some(range) = range else {
        return Vec::new();
    };

    orders
        .iter()
        .filter_map(|order| {
            order
                .invoice_date
                .filter(|at| range.contains(*at))
                .map(|at| (order, at))
        })
        .enumerate()
        .map(|(i, (order, invoiced_at))| InvoiceRow {
            serial: i + 1,
            order_id: order.id.clone(),
            invoice_number: order.invoice_number.clone(),
            invoice_date: invoiced_at.with_timezone(&offset),
            customer: order
                .billing_info
                .as_ref()
                .and_then(|c| c.display_name())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            total: order.total_price,
            status: order.order_status.clone(),
        })
        .collect()
}
