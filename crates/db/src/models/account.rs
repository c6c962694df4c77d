//! Shopper data models used by the account purge.

use serde::Serialize;

/// Row count for one shopper table.
#[derive(Debug, Clone, Serialize)]
pub struct TableCount {
    pub table: String,
    pub count: i64,
}

/// What an account purge removes (preview) or removed (execution).
#[derive(Debug, Clone, Default, Serialize)]
pub struct PurgeSummary {
    pub counts_by_table: Vec<TableCount>,
    pub total_count: i64,
}

impl PurgeSummary {
    pub fn push(&mut self, table: &str, count: i64) {
        self.counts_by_table.push(TableCount {
            table: table.to_string(),
            count,
        });
        self.total_count += count;
    }
}
