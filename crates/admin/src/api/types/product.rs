//! Product domain types.

use bazaar_core::ProductId;
use serde::{Deserialize, Serialize};

use crate::coerce::{lenient_amount, optional_count};

/// A catalog product as listed by the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    /// Units on hand; `None` when the server did not report stock.
    #[serde(default, deserialize_with = "optional_count")]
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub cutted_price: f64,
    #[serde(default)]
    pub category: Option<String>,
}

/// `GET /api/v1/admin/products`
#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Server acknowledgement of a bulk product upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Anything else the server chose to report (counts, skipped rows).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_stock_is_optional() {
        let json = r#"{"products": [
            {"_id": "p1", "name": "Phone", "stock": 12, "price": "19999"},
            {"_id": "p2", "name": "Cable"}
        ]}"#;

        let response: ProductListResponse = serde_json::from_str(json).expect("deserialize");
        let phone = response.products.first().expect("phone");
        assert_eq!(phone.stock, Some(12));
        assert!((phone.price - 19_999.0).abs() < f64::EPSILON);

        let cable = response.products.last().expect("cable");
        assert_eq!(cable.stock, None);
        assert!(cable.price.abs() < f64::EPSILON);
    }

    #[test]
    fn test_upload_receipt_keeps_extra_fields() {
        let json = r#"{"success": true, "message": "3 products created", "inserted": 3}"#;
        let receipt: UploadReceipt = serde_json::from_str(json).expect("deserialize");
        assert!(receipt.success);
        assert_eq!(receipt.message.as_deref(), Some("3 products created"));
        assert_eq!(receipt.extra.get("inserted"), Some(&serde_json::json!(3)));
    }
}
