//! Order domain types.

use bazaar_core::{OrderId, OrderStatus, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::ContactInfo;
use crate::coerce::{lenient_amount, lenient_count, optional_text};

/// A customer order. Read-only from the admin console's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub order_items: Vec<LineItem>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_price: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub discount: f64,
    #[serde(rename = "SGST", default, deserialize_with = "lenient_amount")]
    pub sgst: f64,
    #[serde(rename = "CGST", default, deserialize_with = "lenient_amount")]
    pub cgst: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "optional_text")]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub shipping_info: Option<ContactInfo>,
    #[serde(default)]
    pub billing_info: Option<ContactInfo>,
}

/// One product line of an order, priced at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

/// `GET /api/v1/admin/orders`
///
/// The server's `totalAmount` is ignored; reports compute their own totals.
#[derive(Debug, Deserialize)]
pub struct OrderListResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserialization_with_missing_taxes() {
        let json = r#"{
            "_id": "o1",
            "orderItems": [{"product": "p1", "name": "Phone", "quantity": 2, "price": 150.5}],
            "totalPrice": 301,
            "SGST": "9",
            "createdAt": "2024-01-15T10:00:00.000Z",
            "invoiceNumber": 1001,
            "orderStatus": "Shipped",
            "shippingInfo": {"name": "Asha", "mobileNo": 9876543210}
        }"#;

        let order: Order = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.id.as_str(), "o1");
        assert!((order.total_price - 301.0).abs() < f64::EPSILON);
        assert!((order.sgst - 9.0).abs() < f64::EPSILON);
        assert!(order.cgst.abs() < f64::EPSILON);
        assert!(order.discount.abs() < f64::EPSILON);
        assert_eq!(order.invoice_number.as_deref(), Some("1001"));
        assert!(order.invoice_date.is_none());
        assert_eq!(order.order_status, OrderStatus::Shipped);

        let shipping = order.shipping_info.expect("shipping info");
        assert_eq!(shipping.mobile_no.as_deref(), Some("9876543210"));

        let item = order.order_items.first().expect("line item");
        assert_eq!(item.quantity, 2);
        assert!((item.price - 150.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_order_list_keeps_only_orders() {
        let json = r#"{
            "success": true,
            "orders": [{"_id": "o1", "totalPrice": 10, "createdAt": "2024-01-15T10:00:00Z"}],
            "totalAmount": {"unexpected": "shape"}
        }"#;
        let list: OrderListResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(list.orders.len(), 1);

        let empty: OrderListResponse = serde_json::from_str("{}").expect("deserialize");
        assert!(empty.orders.is_empty());
    }

    #[test]
    fn test_null_amounts_are_zero() {
        let json = r#"{"_id": "o2", "totalPrice": null, "discount": null, "createdAt": "2024-01-15T10:00:00Z"}"#;
        let order: Order = serde_json::from_str(json).expect("deserialize");
        assert!(order.total_price.abs() < f64::EPSILON);
        assert!(order.discount.abs() < f64::EPSILON);
        assert!(order.order_items.is_empty());
        assert_eq!(order.order_status, OrderStatus::Processing);
    }
}
