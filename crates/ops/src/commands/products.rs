use catalog_core::error::CoreError;
use catalog_core::images::{audit_image_list, parse_image_list, ImageAudit};
use catalog_core::pricing::format_price;
use catalog_core::search::{clamp_limit, contains_pattern, validate_search_term};
use catalog_core::types::DbId;
use catalog_db::models::product::{Product, ProductSummary};
use catalog_db::repositories::ProductRepo;
use catalog_db::DbPool;
use serde::Serialize;

use crate::error::CliResult;
use crate::output::{render_table, Output};

/// `search`: case-insensitive title substring match.
pub async fn search(pool: &DbPool, out: Output, term: &str, limit: Option<i64>) -> CliResult<()> {
    validate_search_term(term)?;
    let pattern = contains_pattern(term);
    let limit = clamp_limit(limit);

    let products = ProductRepo::search_by_title(pool, &pattern, limit).await?;
    tracing::debug!(term, limit, found = products.len(), "Title search");

    out.emit(&products, |products| render_summaries(products))
}

/// `show`: one record with its decoded images.
pub async fn show(pool: &DbPool, out: Output, id: DbId) -> CliResult<()> {
    let product = ProductRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;

    let detail = ProductDetail::new(product);
    out.emit(&detail, ProductDetail::render)
}

fn render_summaries(products: &[ProductSummary]) -> String {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.title.clone(),
                p.category.clone(),
                format_price(p.price),
            ]
        })
        .collect();
    let mut text = render_table(&["ID", "TITLE", "CATEGORY", "PRICE"], &rows);
    text.push_str(&format!("{} match(es)", products.len()));
    text
}

/// A product with its `images` text decoded.
#[derive(Debug, Serialize)]
struct ProductDetail {
    #[serde(flatten)]
    product: Product,
    image_urls: Vec<String>,
    image_audit: ImageAudit,
}

impl ProductDetail {
    fn new(product: Product) -> Self {
        let image_urls = parse_image_list(&product.images).unwrap_or_default();
        let image_audit = audit_image_list(&product.images);
        Self {
            product,
            image_urls,
            image_audit,
        }
    }

    fn render(&self) -> String {
        let p = &self.product;
        let mut lines = vec![
            format!("id:         {}", p.id),
            format!("title:      {}", p.title),
            format!("category:   {}", p.category),
            format!("price:      {}", format_price(p.price)),
            format!("tags:       {}", p.tags.join(", ")),
            format!("created_at: {}", p.created_at.to_rfc3339()),
            format!("updated_at: {}", p.updated_at.to_rfc3339()),
        ];
        match &self.image_audit {
            ImageAudit::Invalid { issue } => {
                lines.push(format!("images:     invalid ({issue})"));
                lines.push(format!("raw images: {}", p.images));
            }
            ImageAudit::NoImages => lines.push("images:     none".to_string()),
            ImageAudit::Valid { count } => {
                lines.push(format!("images:     {count}"));
                lines.extend(self.image_urls.iter().map(|url| format!("  {url}")));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn product(images: &str) -> Product {
        Product {
            id: 7,
            title: "Breaking Bad Poster".to_string(),
            category: "TV Shows".to_string(),
            price: 19.9,
            images: images.to_string(),
            tags: vec!["drama".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn detail_lists_decoded_urls() {
        let detail = ProductDetail::new(product(r#"["https://img.example.com/bb.jpg"]"#));
        assert_eq!(detail.image_urls, vec!["https://img.example.com/bb.jpg"]);
        let text = detail.render();
        assert!(text.contains("price:      19.90"));
        assert!(text.contains("  https://img.example.com/bb.jpg"));
    }

    #[test]
    fn detail_reports_bad_images_with_raw_text() {
        let detail = ProductDetail::new(product("not json"));
        assert!(detail.image_urls.is_empty());
        let text = detail.render();
        assert!(text.contains("images:     invalid"));
        assert!(text.contains("raw images: not json"));
    }

    #[test]
    fn detail_json_is_flat() {
        let detail = ProductDetail::new(product("[]"));
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["image_audit"]["outcome"], "no_images");
    }

    #[test]
    fn summary_table_counts_matches() {
        let text = render_summaries(&[ProductSummary {
            id: 1,
            title: "Dune".to_string(),
            category: "Movies".to_string(),
            price: 20.0,
        }]);
        assert!(text.contains("20.00"));
        assert!(text.ends_with("1 match(es)"));
    }
}
