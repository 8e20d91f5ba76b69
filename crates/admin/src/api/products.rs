//! Product endpoints.

use reqwest::multipart::Form;
use tracing::{info, instrument};

use super::types::{Product, ProductListResponse, UploadReceipt};
use super::{ApiClient, ApiError};
use crate::forms::UploadBatch;

const ADMIN_PRODUCTS: &str = "/api/v1/admin/products";
const UPLOAD_PRODUCTS: &str = "/api/v1/admin/product/upload-products";

/// Multipart field holding the JSON-encoded rows.
const UPLOAD_FIELD: &str = "products";

impl ApiClient {
    /// List every product (admin view).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn admin_products(&self) -> Result<Vec<Product>, ApiError> {
        let response: ProductListResponse = self.get(ADMIN_PRODUCTS).await?;
        Ok(response.products)
    }

    /// Upload a batch of spreadsheet rows.
    ///
    /// The rows travel as a single multipart text field containing a JSON
    /// array, each row carrying its computed `totalVariantStock`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the rows cannot be encoded or the request fails.
    #[instrument(skip(self, batch), fields(rows = batch.len()))]
    pub async fn upload_products(&self, batch: &UploadBatch) -> Result<UploadReceipt, ApiError> {
        let payload = serde_json::to_string(batch.rows())?;
        let form = Form::new().text(UPLOAD_FIELD, payload);

        let receipt: UploadReceipt = self.post_multipart(UPLOAD_PRODUCTS, form).await?;
        info!(success = receipt.success, "Product upload acknowledged");
        Ok(receipt)
    }
}
