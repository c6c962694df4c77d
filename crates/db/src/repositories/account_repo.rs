//! Repository for shopper data (`users`, `carts`, `cart_items`, `orders`,
//! `order_items`).
//!
//! Only the purge lives here: the toolkit never edits individual accounts.

use catalog_core::maintenance::{MaintenanceOperation, PURGE_ORDER};
use sqlx::PgPool;

use crate::error::DbError;
use crate::maintenance::{begin_maintenance, finish_maintenance};
use crate::models::account::PurgeSummary;

/// Provides the shopper-data purge.
pub struct AccountRepo;

impl AccountRepo {
    /// Count the rows a purge would remove, per table, in deletion order.
    pub async fn purge_preview(pool: &PgPool) -> Result<PurgeSummary, sqlx::Error> {
        let mut summary = PurgeSummary::default();
        for table in PURGE_ORDER {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
            summary.push(table, count);
        }
        Ok(summary)
    }

    /// Delete every row from the shopper tables in one transaction.
    ///
    /// Deletes leaf tables first to respect foreign-key constraints.
    /// Products are never touched.
    pub async fn purge_all(pool: &PgPool) -> Result<PurgeSummary, DbError> {
        let mut tx = begin_maintenance(pool).await?;

        let mut summary = PurgeSummary::default();
        for table in PURGE_ORDER {
            let sql = format!("DELETE FROM {table}");
            let result = sqlx::query(&sql).execute(&mut *tx).await?;
            tracing::debug!(table, rows = result.rows_affected(), "Purged table");
            summary.push(table, result.rows_affected() as i64);
        }

        finish_maintenance(
            tx,
            MaintenanceOperation::PurgeAccounts,
            serde_json::json!({ "tables": PURGE_ORDER }),
            summary.total_count as u64,
        )
        .await?;
        Ok(summary)
    }
}
