//! Subcommand handlers.
//!
//! Each handler runs one read or one bulk write, renders the result, and
//! returns. Handlers that touch the database get a pool from [`connect`].

pub mod accounts;
pub mod categories;
pub mod history;
pub mod image_host;
pub mod images;
pub mod pricing;
pub mod products;
pub mod storefront;

use catalog_db::DbPool;
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::config::OpsConfig;
use crate::error::CliResult;
use crate::output::Output;

/// Result of a bulk write, or of its dry run.
#[derive(Debug, Clone, Serialize)]
pub struct WriteOutcome {
    pub operation: &'static str,
    pub dry_run: bool,
    /// Rows changed, or rows that would change on a dry run.
    pub affected: u64,
}

impl WriteOutcome {
    pub fn render(&self) -> String {
        if self.dry_run {
            format!("[dry run] {}: {} row(s) would change", self.operation, self.affected)
        } else {
            format!("{}: {} row(s) changed", self.operation, self.affected)
        }
    }
}

/// Load configuration and dispatch the parsed command.
pub async fn run(cli: Cli) -> CliResult<()> {
    let config = OpsConfig::from_env()?;
    let out = Output { json: cli.json };

    match cli.command {
        Command::Search { term, limit } => {
            let pool = connect(&config).await?;
            products::search(&pool, out, &term, limit).await
        }
        Command::Show { id } => {
            let pool = connect(&config).await?;
            products::show(&pool, out, id).await
        }
        Command::Categories => {
            let pool = connect(&config).await?;
            categories::report(&pool, out).await
        }
        Command::NormalizeCategories { dry_run } => {
            let pool = connect(&config).await?;
            categories::normalize(&pool, out, dry_run).await
        }
        Command::RenameCategory { from, to, dry_run } => {
            let pool = connect(&config).await?;
            categories::rename(&pool, out, &from, &to, dry_run).await
        }
        Command::SetPrice {
            price,
            category,
            dry_run,
        } => {
            let pool = connect(&config).await?;
            pricing::set_price(&pool, out, price, category.as_deref(), dry_run).await
        }
        Command::AuditImages { show_valid } => {
            let pool = connect(&config).await?;
            images::audit(&pool, out, show_valid).await
        }
        Command::PurgeAccounts { dry_run, yes } => {
            let pool = connect(&config).await?;
            accounts::purge(&pool, out, dry_run, yes).await
        }
        Command::History { operation, limit } => {
            let pool = connect(&config).await?;
            history::list(&pool, out, operation, limit).await
        }
        Command::Migrate => {
            let pool = connect(&config).await?;
            catalog_db::run_migrations(&pool).await?;
            tracing::info!("Migrations applied");
            out.emit(&serde_json::json!({ "migrated": true }), |_| {
                "Migrations applied".to_string()
            })
        }
        Command::ImageHost(command) => image_host::run(&config, out, command).await,
        Command::Storefront(command) => storefront::run(&config, out, command).await,
    }
}

/// Open the pool and make sure the database answers.
async fn connect(config: &OpsConfig) -> CliResult<DbPool> {
    let pool = catalog_db::create_pool(config.database_url()?, config.db_max_connections).await?;
    catalog_db::health_check(&pool).await?;
    tracing::debug!(max_connections = config.db_max_connections, "Database connected");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_outcome_text() {
        let outcome = WriteOutcome {
            operation: "set_price",
            dry_run: true,
            affected: 4,
        };
        assert_eq!(outcome.render(), "[dry run] set_price: 4 row(s) would change");

        let outcome = WriteOutcome {
            dry_run: false,
            ..outcome
        };
        assert_eq!(outcome.render(), "set_price: 4 row(s) changed");
    }
}
