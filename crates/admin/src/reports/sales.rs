//! Per-product sales totals.

use std::collections::HashMap;

use bazaar_core::ProductId;
use serde::Serialize;

use crate::api::{Order, Product};

/// Units sold and revenue of one product across all orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRow {
    /// 1-based position in first-seen order.
    pub serial: usize,
    pub product_id: ProductId,
    /// Name on the first line item seen for this product.
    pub name: String,
    pub total_quantity: i64,
    pub total_revenue: f64,
    /// Current stock, `None` when the product is no longer listed.
    pub stock: Option<i64>,
}

/// Group every line item by product id.
///
/// Rows come out in the order their product was first seen while walking
/// `orders` and their line items in sequence. The product name is taken
/// from that first line item so renamed products keep their historical name.
#[must_use]
pub fn sales_report(orders: &[Order], products: &[Product]) -> Vec<SalesRow> {
    let catalog: HashMap<&ProductId, &Product> = products.iter().map(|p| (&p.id, p)).collect();

    let mut rows: Vec<SalesRow> = Vec::new();
    let mut index: HashMap<&ProductId, usize> = HashMap::new();

    for item in orders.iter().flat_map(|order| &order.order_items) {
        #[allow(clippy::cast_precision_loss)]
        let line_revenue = item.quantity as f64 * item.price;

        if let Some(&position) = index.get(&item.product) {
            if let Some(row) = rows.get_mut(position) {
                row.total_quantity = row.total_quantity.saturating_add(item.quantity);
                row.total_revenue += line_revenue;
            }
            continue;
        }

        index.insert(&item.product, rows.len());
        rows.push(SalesRow {
            serial: rows.len() + 1,
            product_id: item.product.clone(),
            name: item.name.clone(),
            total_quantity: item.quantity,
            total_revenue: line_revenue,
            stock: catalog.get(&item.product).and_then(|p| p.stock),
        });
    }

    rows
}
