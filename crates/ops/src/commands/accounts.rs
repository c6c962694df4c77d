use catalog_core::maintenance::{purge_decision, MaintenanceOperation, PurgeDecision};
use catalog_db::models::account::PurgeSummary;
use catalog_db::repositories::AccountRepo;
use catalog_db::DbPool;
use serde::Serialize;

use crate::error::CliResult;
use crate::output::{render_table, Output};

#[derive(Debug, Serialize)]
struct PurgeReport {
    executed: bool,
    #[serde(flatten)]
    summary: PurgeSummary,
}

impl PurgeReport {
    fn render(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .summary
            .counts_by_table
            .iter()
            .map(|t| vec![t.table.clone(), t.count.to_string()])
            .collect();
        let mut text = render_table(&["TABLE", "ROWS"], &rows);
        if self.executed {
            text.push_str(&format!("Deleted {} row(s)", self.summary.total_count));
        } else {
            text.push_str(&format!("{} row(s) would be deleted", self.summary.total_count));
        }
        text
    }
}

/// `purge-accounts`: delete all shopper data, keeping products.
///
/// Always shows the preview first. Without `--yes` the command stops there
/// and fails with "confirmation required".
pub async fn purge(pool: &DbPool, out: Output, dry_run: bool, yes: bool) -> CliResult<()> {
    let preview = AccountRepo::purge_preview(pool).await?;
    let decision = purge_decision(dry_run, yes);

    let report = match decision {
        Ok(PurgeDecision::Execute) => {
            let summary = AccountRepo::purge_all(pool).await?;
            tracing::info!(
                operation = MaintenanceOperation::PurgeAccounts.as_str(),
                affected = summary.total_count,
                "Accounts purged"
            );
            PurgeReport {
                executed: true,
                summary,
            }
        }
        Ok(PurgeDecision::Preview) | Err(_) => PurgeReport {
            executed: false,
            summary: preview,
        },
    };

    out.emit(&report, PurgeReport::render)?;
    decision?;
    Ok(())
}
