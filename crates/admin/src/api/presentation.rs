//! Presentation deck generation.
//!
//! The deck itself is rendered by a remote service; this endpoint only
//! sends the product copy and hands back the returned file.

use tracing::{info, instrument};

use super::types::{Deck, DeckRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Request a slide deck for `request` and return the generated file.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, request), fields(products = request.products.len()))]
    pub async fn generate_deck(&self, request: &DeckRequest) -> Result<Deck, ApiError> {
        let bytes = self
            .post_json_for_bytes(self.deck_url().clone(), request)
            .await?;

        let deck = Deck {
            filename: request.filename(),
            bytes,
        };
        info!(filename = %deck.filename, size = deck.bytes.len(), "Presentation generated");
        Ok(deck)
    }
}
