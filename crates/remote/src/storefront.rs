//! Client for the storefront's product listing API.
//!
//! Used to spot-check what shoppers see: fetch product previews and verify
//! that the category filter on `GET /api/products` returns only matching
//! products.

use std::time::Duration;

use catalog_core::category::Category;
use catalog_core::images::{parse_image_list, parse_image_value, ImageListIssue};
use serde::{Deserialize, Serialize};

/// Errors from the storefront API layer.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Storefront API error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

/// Product identifier as the API renders it (numeric or string keys).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A product as returned by the listing endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductPreview {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    /// Either a real JSON array or the stored JSON text, depending on
    /// whether the API decodes the column.
    #[serde(default)]
    pub images: serde_json::Value,
}

impl ProductPreview {
    /// Decode `images` regardless of which shape the API used.
    pub fn image_urls(&self) -> Result<Vec<String>, ImageListIssue> {
        match &self.images {
            serde_json::Value::Null => Ok(Vec::new()),
            serde_json::Value::String(raw) => parse_image_list(raw),
            other => parse_image_value(other),
        }
    }
}

/// The endpoint returns either a bare array or `{ "products": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingBody {
    Bare(Vec<ProductPreview>),
    Wrapped { products: Vec<ProductPreview> },
}

impl ListingBody {
    fn into_products(self) -> Vec<ProductPreview> {
        match self {
            Self::Bare(products) | Self::Wrapped { products } => products,
        }
    }
}

/// Query parameters for `GET /api/products`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// HTTP client for the storefront API.
pub struct StorefrontClient {
    client: reqwest::Client,
    base_url: String,
}

impl StorefrontClient {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, StorefrontError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Fetch products from `GET /api/products`.
    pub async fn list_products(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<ProductPreview>, StorefrontError> {
        let url = format!("{}/api/products", self.base_url.trim_end_matches('/'));
        tracing::debug!(%url, category = ?query.category, limit = ?query.limit, "Fetching products");

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorefrontError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body: ListingBody = response.json().await?;
        Ok(body.into_products())
    }
}

// ---------------------------------------------------------------------------
// Filter verification
// ---------------------------------------------------------------------------

/// Result of checking a filtered listing against the requested category.
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    pub requested: String,
    pub total: usize,
    pub matching: usize,
    pub mismatched: Vec<ProductPreview>,
}

impl FilterReport {
    pub fn passed(&self) -> bool {
        self.mismatched.is_empty()
    }
}

/// Whether a returned category satisfies the requested one.
///
/// Values that both resolve to the vocabulary are compared as categories,
/// so a drifted spelling still counts as a match. Anything else must match
/// exactly.
pub fn category_matches(requested: &str, returned: Option<&str>) -> bool {
    let Some(returned) = returned else {
        return false;
    };
    match (Category::resolve(requested), Category::resolve(returned)) {
        (Some(a), Some(b)) => a == b,
        _ => requested == returned,
    }
}

/// Check every product in a filtered listing.
pub fn verify_category_filter(requested: &str, products: Vec<ProductPreview>) -> FilterReport {
    let total = products.len();
    let mismatched: Vec<ProductPreview> = products
        .into_iter()
        .filter(|p| !category_matches(requested, p.category.as_deref()))
        .collect();

    FilterReport {
        requested: requested.to_string(),
        total,
        matching: total - mismatched.len(),
        mismatched,
    }
}
