use catalog_core::maintenance::MaintenanceOperation;
use catalog_db::models::maintenance_log::MaintenanceLogEntry;
use catalog_db::repositories::MaintenanceLogRepo;
use catalog_db::DbPool;

use crate::error::CliResult;
use crate::output::{render_table, Output};

/// `history`: executed bulk writes, newest first.
pub async fn list(
    pool: &DbPool,
    out: Output,
    operation: Option<MaintenanceOperation>,
    limit: Option<i64>,
) -> CliResult<()> {
    let entries = MaintenanceLogRepo::list_recent(pool, operation, limit).await?;
    out.emit(&entries, |entries| render_entries(entries))
}

fn render_entries(entries: &[MaintenanceLogEntry]) -> String {
    if entries.is_empty() {
        return "No maintenance operations recorded".to_string();
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.executed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                e.operation.clone(),
                e.affected_count.to_string(),
                e.parameters.to_string(),
            ]
        })
        .collect();
    render_table(&["ID", "EXECUTED (UTC)", "OPERATION", "ROWS", "PARAMETERS"], &rows)
}
