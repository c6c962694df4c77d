use catalog_remote::storefront::{
    verify_category_filter, FilterReport, ListingQuery, ProductPreview, StorefrontClient,
};

use crate::cli::StorefrontCommand;
use crate::config::OpsConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_table, Output};

pub async fn run(config: &OpsConfig, out: Output, command: StorefrontCommand) -> CliResult<()> {
    let client = StorefrontClient::new(config.storefront_api_url.clone(), config.http_timeout)?;
    match command {
        StorefrontCommand::Preview { limit } => preview(&client, out, limit).await,
        StorefrontCommand::Filter { category, limit } => {
            filter(&client, out, category, limit).await
        }
    }
}

/// `storefront preview`: what the listing endpoint currently returns.
async fn preview(client: &StorefrontClient, out: Output, limit: u32) -> CliResult<()> {
    let query = ListingQuery {
        category: None,
        limit: Some(limit),
    };
    let products = client.list_products(&query).await?;
    tracing::info!(count = products.len(), "Fetched storefront products");
    out.emit(&products, |products| render_previews(products))
}

/// `storefront filter`: request one category and check every result is in it.
async fn filter(
    client: &StorefrontClient,
    out: Output,
    category: String,
    limit: Option<u32>,
) -> CliResult<()> {
    let query = ListingQuery {
        category: Some(category.clone()),
        limit,
    };
    let products = client.list_products(&query).await?;
    let report = verify_category_filter(&category, products);

    if report.passed() {
        tracing::info!(category = %category, total = report.total, "Category filter check passed");
    } else {
        tracing::warn!(
            category = %category,
            total = report.total,
            mismatched = report.mismatched.len(),
            "Category filter returned other categories"
        );
    }

    out.emit(&report, render_filter_report)?;
    if report.passed() {
        Ok(())
    } else {
        Err(CliError::CheckFailed {
            mismatched: report.mismatched.len(),
        })
    }
}

fn render_previews(products: &[ProductPreview]) -> String {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            let images = match p.image_urls() {
                Ok(urls) => urls.first().cloned().unwrap_or_else(|| "-".to_string()),
                Err(issue) => format!("invalid: {issue}"),
            };
            vec![
                p.id.to_string(),
                p.title.clone(),
                p.category.clone().unwrap_or_default(),
                p.price.map(|v| format!("{v:.2}")).unwrap_or_default(),
                images,
            ]
        })
        .collect();
    let mut text = render_table(&["ID", "TITLE", "CATEGORY", "PRICE", "FIRST IMAGE"], &rows);
    text.push_str(&format!("{} product(s)", products.len()));
    text
}

fn render_filter_report(report: &FilterReport) -> String {
    let mut text = format!(
        "{} of {} product(s) match {:?}\n",
        report.matching, report.total, report.requested
    );
    if !report.mismatched.is_empty() {
        text.push_str(&render_previews(&report.mismatched));
    }
    text
}

#[cfg(test)]
mod tests {
    use catalog_remote::storefront::ProductId;

    use super::*;

    fn preview(id: i64, category: &str) -> ProductPreview {
        ProductPreview {
            id: ProductId::Number(id),
            title: format!("Poster {id}"),
            category: Some(category.to_string()),
            price: Some(12.5),
            images: serde_json::json!(["https://img.example.com/p.jpg"]),
        }
    }

    #[test]
    fn preview_table_shows_first_image() {
        let text = render_previews(&[preview(1, "Movies")]);
        assert!(text.contains("12.50"));
        assert!(text.contains("https://img.example.com/p.jpg"));
        assert!(text.ends_with("1 product(s)"));
    }

    #[test]
    fn filter_report_lists_only_mismatches() {
        let report = verify_category_filter("Movies", vec![preview(1, "Movies"), preview(2, "Art")]);
        let text = render_filter_report(&report);
        assert!(text.starts_with("1 of 2 product(s) match \"Movies\""));
        assert!(text.contains("Poster 2"));
        assert!(!text.contains("Poster 1"));
    }
}
