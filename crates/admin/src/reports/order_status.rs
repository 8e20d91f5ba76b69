//! Order status report.

use bazaar_core::{OrderId, OrderStatus, StatusTone};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::NOT_AVAILABLE;
use crate::api::Order;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStatusRow {
    pub order_id: OrderId,
    pub customer: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub amount: f64,
    pub status: OrderStatus,
    pub ordered_on: DateTime<FixedOffset>,
    pub tone: StatusTone,
}

/// One row per order, in input order. Contact details come from the
/// shipping info.
#[must_use]
pub fn order_status_report(orders: &[Order], offset: FixedOffset) -> Vec<OrderStatusRow> {
    orders
        .iter()
        .map(|order| {
            let contact = order.shipping_info.as_ref();
            OrderStatusRow {
                order_id: order.id.clone(),
                customer: contact
                    .and_then(|c| c.display_name())
                    .unwrap_or(NOT_AVAILABLE)
                    .to_string(),
                email: contact.and_then(|c| c.email.clone()),
                phone: contact.and_then(|c| c.mobile_no.clone()),
                amount: order.total_price,
                status: order.order_status.clone(),
                ordered_on: order.created_at.with_timezone(&offset),
                tone: order.order_status.tone(),
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::reports::fixtures::{contact, priced};
    use chrono::{Offset as _, Utc};

    #[test]
    fn test_status_rows_carry_tone() {
        let mut delivered = priced("a", "2024-01-01T00:00:00Z", [10.0, 0.0, 0.0, 0.0]);
        delivered.order_status = OrderStatus::Delivered;
        delivered.shipping_info = Some(contact("Asha"));
        let mut returned = priced("b", "2024-01-02T00:00:00Z", [20.0, 0.0, 0.0, 0.0]);
        returned.order_status = OrderStatus::Other("Returned".to_string());

        let rows = order_status_report(&[delivered, returned], Utc.fix());
        let first = rows.first().unwrap();
        assert_eq!(first.customer, "Asha");
        assert_eq!(first.email.as_deref(), Some("asha@example.com"));
        assert_eq!(first.tone, StatusTone::Complete);

        let second = rows.last().unwrap();
        assert_eq!(second.customer, "N/A");
        assert_eq!(second.status.as_str(), "Returned");
        assert_eq!(second.tone, StatusTone::Pending);
    }
}
