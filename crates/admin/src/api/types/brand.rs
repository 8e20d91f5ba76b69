//! Brand domain types.

use bazaar_core::BrandId;
use serde::{Deserialize, Serialize};

use super::common::ImageRef;

/// A product brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "_id")]
    pub id: BrandId,
    pub name: String,
    #[serde(default)]
    pub logo: Option<ImageRef>,
}

/// `GET /api/v1/admin/brands`
#[derive(Debug, Deserialize)]
pub struct BrandListResponse {
    #[serde(default)]
    pub brands: Vec<Brand>,
}

/// `GET /api/v1/brand/{id}`
#[derive(Debug, Deserialize)]
pub struct BrandResponse {
    pub brand: Brand,
}

/// `POST /api/v1/admin/brand/new`
#[derive(Debug, Deserialize)]
pub struct CreateBrandResponse {
    #[serde(default)]
    pub success: bool,
    pub brand: Brand,
}
