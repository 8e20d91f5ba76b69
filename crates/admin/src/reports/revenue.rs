//! Revenue report: one row per order plus scalar totals.

use bazaar_core::{DateRange, OrderId, OrderStatus};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::NO_CUSTOMER;
use crate::api::Order;

/// One order in the revenue report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueRow {
    pub serial: usize,
    pub order_id: OrderId,
    pub invoice_number: Option<String>,
    /// Creation time in the report offset.
    pub created_at: DateTime<FixedOffset>,
    /// Shipping contact name, or `—`.
    pub customer: String,
    pub total: f64,
    pub discount: f64,
    pub sgst: f64,
    pub cgst: f64,
    pub status: OrderStatus,
}

/// Sums over every row of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RevenueTotals {
    pub total_revenue: f64,
    pub total_discount: f64,
    pub total_sgst: f64,
    pub total_cgst: f64,
    /// `total_revenue - total_sgst - total_cgst`. Discount is not subtracted.
    pub net_revenue: f64,
}

impl RevenueTotals {
    /// SGST and CGST combined.
    #[must_use]
    pub fn total_tax(&self) -> f64 {
        self.total_sgst + self.total_cgst
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    pub rows: Vec<RevenueRow>,
    pub totals: RevenueTotals,
}

impl RevenueReport {
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.rows.len()
    }
}

/// Build the revenue report.
///
/// With a range, only orders created inside it (both days inclusive) are
/// kept; without one every order is. Timestamps on the rows are shown in
/// `offset`.
#[must_use]
pub fn revenue_report(
    orders: &[Order],
    range: Option<&DateRange>,
    offset: FixedOffset,
) -> RevenueReport {
    let mut totals = RevenueTotals::default();

    let rows: Vec<RevenueRow> = orders
        .iter()
        .filter(|order| range.is_none_or(|r| r.contains(order.created_at)))
        .enumerate()
        .map(|(i, order)| {
            totals.total_revenue += order.total_price;
            totals.total_discount += order.discount;
            totals.total_sgst += order.sgst;
            totals.total_cgst += order.cgst;

            RevenueRow {
                serial: i + 1,
                order_id: order.id.clone(),
                invoice_number: order.invoice_number.clone(),
                created_at: order.created_at.with_timezone(&offset),
                customer: order
                    .shipping_info
                    .as_ref()
                    .and_then(|c| c.display_name())
                    .unwrap_or(NO_CUSTOMER)
                    .to_string(),
                total: order.total_price,
                discount: order.discount,
                sgst: order.sgst,
                cgst: order.cgst,
                status: order.order_status.clone(),
            }
        })
        .collect();

    totals.net_revenue = totals.total_revenue - totals.total_sgst - totals.total_cgst;

    RevenueReport { rows, totals }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reports::fixtures::{contact, priced};
    use chrono::{NaiveDate, Offset as _, Utc};

    fn utc() -> FixedOffset {
        Utc.fix()
    }

    fn january() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_order_totals() {
        let orders = vec![priced("o1", "2024-01-10T12:00:00Z", [100.0, 10.0, 9.0, 9.0])];
        let report = revenue_report(&orders, Some(&january()), utc());

        let t = report.totals;
        assert!(close(t.total_revenue, 100.0));
        assert!(close(t.total_discount, 10.0));
        assert!(close(t.total_sgst, 9.0));
        assert!(close(t.total_cgst, 9.0));
        assert!(close(t.net_revenue, 82.0));
        assert!(close(t.total_tax(), 18.0));
        assert_eq!(report.order_count(), 1);
    }

    #[test]
    fn test_range_filters_on_created_at() {
        let orders = vec![
            priced("before", "2023-12-31T23:59:59.999Z", [1.0, 0.0, 0.0, 0.0]),
            priced("first", "2024-01-01T00:00:00Z", [2.0, 0.0, 0.0, 0.0]),
            priced("last", "2024-01-31T23:59:59.999Z", [4.0, 0.0, 0.0, 0.0]),
            priced("after", "2024-02-01T00:00:00Z", [8.0, 0.0, 0.0, 0.0]),
        ];

        let report = revenue_report(&orders, Some(&january()), utc());
        let ids: Vec<&str> = report.rows.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, ["first", "last"]);
        assert!(close(report.totals.total_revenue, 6.0));
        assert_eq!(report.rows.last().unwrap().serial, 2);
    }

    #[test]
    fn test_no_range_sums_everything() {
        let orders = vec![
            priced("a", "2020-05-01T00:00:00Z", [10.5, 0.0, 0.0, 0.0]),
            priced("b", "2030-05-01T00:00:00Z", [20.25, 0.0, 0.0, 0.0]),
        ];
        let report = revenue_report(&orders, None, utc());
        let expected: f64 = orders.iter().map(|o| o.total_price).sum();
        assert!(close(report.totals.total_revenue, expected));
    }

    #[test]
    fn test_customer_falls_back_to_dash() {
        let mut named = priced("a", "2024-01-02T00:00:00Z", [1.0, 0.0, 0.0, 0.0]);
        named.shipping_info = Some(contact("Asha"));
        let anonymous = priced("b", "2024-01-02T00:00:00Z", [1.0, 0.0, 0.0, 0.0]);

        let report = revenue_report(&[named, anonymous], None, utc());
        let customers: Vec<&str> = report.rows.iter().map(|r| r.customer.as_str()).collect();
        assert_eq!(customers, ["Asha", "—"]);
    }

    #[test]
    fn test_rows_are_shown_in_report_offset() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let orders = vec![priced("o1", "2024-01-31T20:00:00Z", [1.0, 0.0, 0.0, 0.0])];
        let report = revenue_report(&orders, None, ist);
        assert_eq!(
            report.rows.first().unwrap().created_at.date_naive(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }
}
