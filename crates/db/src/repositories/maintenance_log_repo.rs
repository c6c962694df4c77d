//! Repository for the `maintenance_log` table.

use catalog_core::maintenance::MaintenanceOperation;
use sqlx::{PgExecutor, PgPool};

use crate::models::maintenance_log::MaintenanceLogEntry;

/// Column list shared across queries.
const COLUMNS: &str = "id, operation, parameters, affected_count, executed_at";

/// Default number of history entries.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum number of history entries.
const MAX_LIMIT: i64 = 500;

/// Provides access to the maintenance log.
pub struct MaintenanceLogRepo;

impl MaintenanceLogRepo {
    /// Append an entry. Takes any executor so bulk writes can log inside
    /// their own transaction.
    pub async fn record<'e, E>(
        executor: E,
        operation: MaintenanceOperation,
        parameters: &serde_json::Value,
        affected_count: i64,
    ) -> Result<MaintenanceLogEntry, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO maintenance_log (operation, parameters, affected_count) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceLogEntry>(&query)
            .bind(operation.as_str())
            .bind(parameters)
            .bind(affected_count)
            .fetch_one(executor)
            .await
    }

    /// List the most recent entries, newest first, optionally for one
    /// operation only.
    pub async fn list_recent(
        pool: &PgPool,
        operation: Option<MaintenanceOperation>,
        limit: Option<i64>,
    ) -> Result<Vec<MaintenanceLogEntry>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_log \
             WHERE ($1::text IS NULL OR operation = $1) \
             ORDER BY executed_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, MaintenanceLogEntry>(&query)
            .bind(operation.map(|op| op.as_str()))
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
