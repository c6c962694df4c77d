//! Maintenance log model.

use catalog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `maintenance_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceLogEntry {
    pub id: DbId,
    pub operation: String,
    pub parameters: serde_json::Value,
    pub affected_count: i64,
    pub executed_at: Timestamp,
}
