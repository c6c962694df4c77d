use catalog_core::category::Category;
use catalog_core::maintenance::MaintenanceOperation;
use catalog_core::pricing::{format_price, normalize_price};
use catalog_db::repositories::ProductRepo;
use catalog_db::DbPool;
use serde::Serialize;

use crate::commands::WriteOutcome;
use crate::error::CliResult;
use crate::output::Output;

#[derive(Debug, Serialize)]
struct PriceResult {
    #[serde(flatten)]
    outcome: WriteOutcome,
    price: f64,
    category: Option<Category>,
}

/// `set-price`: overwrite the price of every product, or of one category.
///
/// The category argument is resolved to its canonical name first, so only
/// rows spelled canonically are matched. Run `normalize-categories` before
/// pricing a drifted category.
pub async fn set_price(
    pool: &DbPool,
    out: Output,
    price: f64,
    category: Option<&str>,
    dry_run: bool,
) -> CliResult<()> {
    let price = normalize_price(price)?;
    let category = category.map(Category::parse).transpose()?;
    let filter = category.map(|c| c.as_str());

    let affected = if dry_run {
        ProductRepo::count(pool, filter).await? as u64
    } else {
        let affected = ProductRepo::set_price(pool, price, filter).await?;
        tracing::info!(
            operation = MaintenanceOperation::SetPrice.as_str(),
            affected,
            price,
            category = filter.unwrap_or("*"),
            "Prices updated"
        );
        affected
    };

    let result = PriceResult {
        outcome: WriteOutcome {
            operation: MaintenanceOperation::SetPrice.as_str(),
            dry_run,
            affected,
        },
        price,
        category,
    };
    out.emit(&result, |r| {
        let scope = r
            .category
            .map(|c| format!("category \"{c}\""))
            .unwrap_or_else(|| "all products".to_string());
        format!(
            "price {} for {scope}\n{}",
            format_price(r.price),
            r.outcome.render()
        )
    })
}
