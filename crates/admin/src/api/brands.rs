//! Brand endpoints.

use bazaar_core::BrandId;
use reqwest::multipart::Form;
use tracing::{info, instrument};

use super::types::{Acknowledgement, Brand, BrandListResponse, BrandResponse, CreateBrandResponse};
use super::{ApiClient, ApiError};
use crate::forms::{BrandPatch, NewBrand};

const ADMIN_BRANDS: &str = "/api/v1/admin/brands";
const NEW_BRAND: &str = "/api/v1/admin/brand/new";

fn admin_brand_path(id: &BrandId) -> String {
    format!("/api/v1/admin/brand/{}", urlencoding::encode(id.as_str()))
}

fn public_brand_path(id: &BrandId) -> String {
    format!("/api/v1/brand/{}", urlencoding::encode(id.as_str()))
}

impl ApiClient {
    /// List every brand (admin view).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn admin_brands(&self) -> Result<Vec<Brand>, ApiError> {
        let response: BrandListResponse = self.get(ADMIN_BRANDS).await?;
        Ok(response.brands)
    }

    /// Fetch one brand.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self), fields(brand_id = %id))]
    pub async fn brand(&self, id: &BrandId) -> Result<Brand, ApiError> {
        let response: BrandResponse = self.get(&public_brand_path(id)).await?;
        Ok(response.brand)
    }

    /// Create a brand from a validated form.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, brand), fields(name = %brand.name()))]
    pub async fn create_brand(&self, brand: &NewBrand) -> Result<CreateBrandResponse, ApiError> {
        let form = Form::new()
            .text("name", brand.name().to_string())
            .text("logo", brand.logo().as_data_url().to_string());

        let response: CreateBrandResponse = self.post_multipart(NEW_BRAND, form).await?;
        info!(brand_id = %response.brand.id, success = response.success, "Brand created");
        Ok(response)
    }

    /// Update a brand. Only the fields present in `patch` are sent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, patch), fields(brand_id = %id))]
    pub async fn update_brand(
        &self,
        id: &BrandId,
        patch: &BrandPatch,
    ) -> Result<Acknowledgement, ApiError> {
        let mut form = Form::new();
        if let Some(name) = patch.name() {
            form = form.text("name", name.to_string());
        }
        if let Some(logo) = patch.logo() {
            form = form.text("logo", logo.as_data_url().to_string());
        }

        self.put_multipart(&admin_brand_path(id), form).await
    }

    /// Delete a brand.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self), fields(brand_id = %id))]
    pub async fn delete_brand(&self, id: &BrandId) -> Result<Acknowledgement, ApiError> {
        self.delete(&admin_brand_path(id)).await
    }
}
