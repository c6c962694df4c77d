//! Transaction guard shared by every bulk maintenance write.

use catalog_core::maintenance::{MaintenanceOperation, MAINTENANCE_LOCK_ID};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::DbError;
use crate::models::maintenance_log::MaintenanceLogEntry;
use crate::repositories::MaintenanceLogRepo;

/// Open a transaction and take the maintenance advisory lock inside it.
///
/// The lock is transaction-scoped, so it is released on commit or on
/// rollback when the transaction is dropped. Fails with
/// [`DbError::LockHeld`] instead of waiting when another session holds it.
pub async fn begin_maintenance(pool: &PgPool) -> Result<Transaction<'static, Postgres>, DbError> {
    let mut tx = pool.begin().await?;

    let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_xact_lock($1)")
        .bind(MAINTENANCE_LOCK_ID)
        .fetch_one(&mut *tx)
        .await?;

    if !acquired {
        tracing::warn!(lock_id = MAINTENANCE_LOCK_ID, "Maintenance lock is held elsewhere");
        return Err(DbError::LockHeld {
            lock_id: MAINTENANCE_LOCK_ID,
        });
    }

    Ok(tx)
}

/// Record the operation in the maintenance log and commit.
pub async fn finish_maintenance(
    mut tx: Transaction<'static, Postgres>,
    operation: MaintenanceOperation,
    parameters: serde_json::Value,
    affected_count: u64,
) -> Result<MaintenanceLogEntry, DbError> {
    let entry =
        MaintenanceLogRepo::record(&mut *tx, operation, &parameters, affected_count as i64).await?;
    tx.commit().await?;

    tracing::info!(
        operation = operation.as_str(),
        affected = affected_count,
        log_id = entry.id,
        "Maintenance operation committed"
    );
    Ok(entry)
}
