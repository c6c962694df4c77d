//! Repository for the `products` table.
//!
//! Reads return `sqlx::Error`; bulk writes go through
//! [`crate::maintenance::begin_maintenance`] and return [`DbError`].

use catalog_core::maintenance::MaintenanceOperation;
use catalog_core::types::DbId;
use futures::stream::BoxStream;
use sqlx::PgPool;

use crate::error::DbError;
use crate::maintenance::{begin_maintenance, finish_maintenance};
use crate::models::product::{
    CategoryCount, CategoryRewrite, CreateProduct, Product, ProductImages, ProductSummary,
};

/// Column list for full `products` rows.
const COLUMNS: &str = "id, title, category, price, images, tags, created_at, updated_at";

/// Column list for [`ProductSummary`].
const SUMMARY_COLUMNS: &str = "id, title, category, price";

/// Provides queries and bulk writes for catalog records.
pub struct ProductRepo;

impl ProductRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Insert a new catalog record, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (title, category, price, images, tags) \
             VALUES ($1, $2, $3, COALESCE($4, '[]'), COALESCE($5, '{{}}'::text[])) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.title)
            .bind(&input.category)
            .bind(input.price)
            .bind(&input.images)
            .bind(&input.tags)
            .fetch_one(pool)
            .await
    }

    /// Find a catalog record by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive title search.
    ///
    /// `pattern` must already be an escaped `ILIKE` pattern, see
    /// [`catalog_core::search::contains_pattern`].
    pub async fn search_by_title(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<ProductSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM products \
             WHERE title ILIKE $1 ESCAPE '\\' \
             ORDER BY id \
             LIMIT $2"
        );
        sqlx::query_as::<_, ProductSummary>(&query)
            .bind(pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count products per distinct stored category string.
    pub async fn category_counts(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM products \
             GROUP BY category \
             ORDER BY count DESC, category",
        )
        .fetch_all(pool)
        .await
    }

    /// Count products, optionally restricted to one exact category string.
    pub async fn count(pool: &PgPool, category: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE ($1::text IS NULL OR category = $1)",
        )
        .bind(category)
        .fetch_one(pool)
        .await
    }

    /// Stream the `images` column of every product, ordered by ID.
    pub fn stream_images(pool: &PgPool) -> BoxStream<'_, Result<ProductImages, sqlx::Error>> {
        sqlx::query_as::<_, ProductImages>("SELECT id, title, images FROM products ORDER BY id")
            .fetch(pool)
    }

    // -----------------------------------------------------------------------
    // Bulk writes
    // -----------------------------------------------------------------------

    /// Rewrite every product whose category is exactly `from` to `to`.
    ///
    /// Returns the number of rows changed.
    pub async fn rename_category(pool: &PgPool, from: &str, to: &str) -> Result<u64, DbError> {
        let mut tx = begin_maintenance(pool).await?;

        let result = sqlx::query(
            "UPDATE products SET category = $2, updated_at = NOW() WHERE category = $1",
        )
        .bind(from)
        .bind(to)
        .execute(&mut *tx)
        .await?;
        let affected = result.rows_affected();

        finish_maintenance(
            tx,
            MaintenanceOperation::RenameCategory,
            serde_json::json!({ "from": from, "to": to }),
            affected,
        )
        .await?;
        Ok(affected)
    }

    /// Apply a batch of category rewrites in one transaction.
    ///
    /// Returns the total number of rows changed.
    pub async fn normalize_categories(
        pool: &PgPool,
        rewrites: &[CategoryRewrite],
    ) -> Result<u64, DbError> {
        let mut tx = begin_maintenance(pool).await?;

        let mut affected: u64 = 0;
        for rewrite in rewrites {
            let result = sqlx::query(
                "UPDATE products SET category = $2, updated_at = NOW() WHERE category = $1",
            )
            .bind(&rewrite.from)
            .bind(&rewrite.to)
            .execute(&mut *tx)
            .await?;
            tracing::debug!(
                from = %rewrite.from,
                to = %rewrite.to,
                rows = result.rows_affected(),
                "Category rewritten"
            );
            affected += result.rows_affected();
        }

        finish_maintenance(
            tx,
            MaintenanceOperation::NormalizeCategories,
            serde_json::json!({ "rewrites": rewrites }),
            affected,
        )
        .await?;
        Ok(affected)
    }

    /// Overwrite the price of every product, or of one exact category.
    ///
    /// `price` must already be validated and rounded. Returns the number of
    /// rows changed.
    pub async fn set_price(
        pool: &PgPool,
        price: f64,
        category: Option<&str>,
    ) -> Result<u64, DbError> {
        let mut tx = begin_maintenance(pool).await?;

        let result = sqlx::query(
            "UPDATE products SET price = $1, updated_at = NOW() \
             WHERE ($2::text IS NULL OR category = $2)",
        )
        .bind(price)
        .bind(category)
        .execute(&mut *tx)
        .await?;
        let affected = result.rows_affected();

        finish_maintenance(
            tx,
            MaintenanceOperation::SetPrice,
            serde_json::json!({ "price": price, "category": category }),
            affected,
        )
        .await?;
        Ok(affected)
    }
}
