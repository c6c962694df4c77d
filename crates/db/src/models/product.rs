//! Catalog record models.

use catalog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `products` table.
///
/// `images` is kept as the raw stored text; decode it with
/// [`catalog_core::images::parse_image_list`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub images: String,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Lightweight projection used by listings and search results.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductSummary {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub price: f64,
}

/// Projection streamed by the images audit.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductImages {
    pub id: DbId,
    pub title: String,
    pub images: String,
}

/// Number of products per stored category string.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for inserting a catalog record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub title: String,
    pub category: String,
    pub price: f64,
    /// Raw JSON text; defaults to `[]`.
    pub images: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// One drifted spelling and the canonical name it should become.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRewrite {
    pub from: String,
    pub to: String,
}
