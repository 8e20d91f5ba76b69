//! Order endpoints.

use tracing::{debug, instrument};

use super::types::{Order, OrderListResponse};
use super::{ApiClient, ApiError};

const ADMIN_ORDERS: &str = "/api/v1/admin/orders";

impl ApiClient {
    /// List every order (admin view).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn admin_orders(&self) -> Result<Vec<Order>, ApiError> {
        let response: OrderListResponse = self.get(ADMIN_ORDERS).await?;
        debug!(count = response.orders.len(), "Fetched orders");
        Ok(response.orders)
    }
}
