//! Report aggregation over fetched orders and products.
//!
//! Every report is a pure, single-pass function of its inputs: nothing is
//! cached and nothing is persisted. Callers recompute a report whenever the
//! underlying slices or the date bounds change.
//!
//! Amounts are summed as plain `f64` with no intermediate rounding; rounding
//! to two decimals happens only when a value is displayed or exported.

mod invoice;
mod order_status;
mod revenue;
mod sales;

pub use invoice::{InvoiceRow, invoice_report};
pub use order_status::{OrderStatusRow, order_status_report};
pub use revenue::{RevenueReport, RevenueRow, RevenueTotals, revenue_report};
pub use sales::{SalesRow, sales_report};

/// Customer column placeholder in the revenue report.
pub const NO_CUSTOMER: &str = "—";

/// Customer column placeholder in the invoice report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format an amount the way reports display it: two decimals.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use bazaar_core::{OrderId, OrderStatus, ProductId};
    use chrono::{DateTime, Utc};

    use crate::api::{ContactInfo, LineItem, Order, Product};

    pub fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    pub fn item(product: &str, name: &str, quantity: i64, price: f64) -> LineItem {
        LineItem {
            product: ProductId::new(product),
            name: name.to_string(),
            quantity,
            price,
            image: None,
        }
    }

    pub fn order(id: &str, items: Vec<LineItem>) -> Order {
        Order {
            id: OrderId::new(id),
            order_items: items,
            total_price: 0.0,
            discount: 0.0,
            sgst: 0.0,
            cgst: 0.0,
            created_at: at("2024-01-15T10:00:00Z"),
            invoice_number: None,
            invoice_date: None,
            order_status: OrderStatus::Processing,
            shipping_info: None,
            billing_info: None,
        }
    }

    /// Order with amounts `[total, discount, sgst, cgst]` created at `created_at`.
    pub fn priced(id: &str, created_at: &str, amounts: [f64; 4]) -> Order {
        let [total_price, discount, sgst, cgst] = amounts;
        Order {
            total_price,
            discount,
            sgst,
            cgst,
            created_at: at(created_at),
            ..order(id, Vec::new())
        }
    }

    pub fn contact(name: &str) -> ContactInfo {
        ContactInfo {
            name: Some(name.to_string()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            mobile_no: Some("9876543210".to_string()),
            ..ContactInfo::default()
        }
    }

    pub fn product(id: &str, stock: Option<i64>) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("current {id}"),
            stock,
            price: 0.0,
            cutted_price: 0.0,
            category: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(82.0), "82.00");
        assert_eq!(format_amount(0.125), "0.13");
        assert_eq!(format_amount(-3.5), "-3.50");
    }
}
