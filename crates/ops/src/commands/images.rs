use std::collections::BTreeMap;

use catalog_core::images::{audit_image_list, ImageAudit};
use catalog_core::types::DbId;
use catalog_db::models::product::ProductImages;
use catalog_db::repositories::ProductRepo;
use catalog_db::DbPool;
use futures::TryStreamExt;
use serde::Serialize;

use crate::error::CliResult;
use crate::output::{render_table, Output};

/// One audited product that made it into the report.
#[derive(Debug, Serialize)]
pub struct ImageFinding {
    pub id: DbId,
    pub title: String,
    #[serde(flatten)]
    pub audit: ImageAudit,
}

/// Accumulated result of `audit-images`.
#[derive(Debug, Default, Serialize)]
pub struct ImageAuditReport {
    pub total: usize,
    /// Products per outcome label, see [`ImageAudit::kind`].
    pub totals: BTreeMap<&'static str, usize>,
    pub findings: Vec<ImageFinding>,
}

impl ImageAuditReport {
    /// Audit one row. Valid rows are only listed when `show_valid` is set.
    pub fn record(&mut self, row: ProductImages, show_valid: bool) {
        let audit = audit_image_list(&row.images);
        self.total += 1;
        *self.totals.entry(audit.kind()).or_default() += 1;

        if !audit.is_valid() || show_valid {
            self.findings.push(ImageFinding {
                id: row.id,
                title: row.title,
                audit,
            });
        }
    }

    /// Rows that are neither valid nor merely empty.
    pub fn invalid_count(&self) -> usize {
        self.total
            - self.totals.get("valid").copied().unwrap_or(0)
            - self.totals.get("no_images").copied().unwrap_or(0)
    }

    fn render(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .findings
            .iter()
            .map(|f| {
                let detail = match &f.audit {
                    ImageAudit::Valid { count } => format!("{count} image(s)"),
                    ImageAudit::NoImages => "no images".to_string(),
                    ImageAudit::Invalid { issue } => issue.to_string(),
                };
                vec![
                    f.id.to_string(),
                    f.title.clone(),
                    f.audit.kind().to_string(),
                    detail,
                ]
            })
            .collect();

        let mut text = render_table(&["ID", "TITLE", "OUTCOME", "DETAIL"], &rows);
        let totals: Vec<String> = self
            .totals
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect();
        text.push_str(&format!("{} product(s) audited", self.total));
        if !totals.is_empty() {
            text.push_str(&format!(" ({})", totals.join(", ")));
        }
        text
    }
}

/// `audit-images`: decode every product's `images` field.
pub async fn audit(pool: &DbPool, out: Output, show_valid: bool) -> CliResult<()> {
    let mut report = ImageAuditReport::default();

    let mut rows = ProductRepo::stream_images(pool);
    while let Some(row) = rows.try_next().await? {
        report.record(row, show_valid);
    }

    let invalid = report.invalid_count();
    if invalid > 0 {
        tracing::warn!(invalid, total = report.total, "Products with malformed images");
    } else {
        tracing::info!(total = report.total, "All images fields are well-formed");
    }

    out.emit(&report, ImageAuditReport::render)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: DbId, images: &str) -> ProductImages {
        ProductImages {
            id,
            title: format!("Poster {id}"),
            images: images.to_string(),
        }
    }

    fn sample(show_valid: bool) -> ImageAuditReport {
        let mut report = ImageAuditReport::default();
        report.record(row(1, r#"["https://img.example.com/1.jpg"]"#), show_valid);
        report.record(row(2, "[]"), show_valid);
        report.record(row(3, "{broken"), show_valid);
        report.record(row(4, r#"["ftp://img.example.com/4.jpg"]"#), show_valid);
        report.record(row(5, ""), show_valid);
        report
    }

    #[test]
    fn totals_per_outcome() {
        let report = sample(false);
        assert_eq!(report.total, 5);
        assert_eq!(report.totals["valid"], 1);
        assert_eq!(report.totals["no_images"], 1);
        assert_eq!(report.totals["invalid_json"], 1);
        assert_eq!(report.totals["invalid_url"], 1);
        assert_eq!(report.totals["blank"], 1);
        assert_eq!(report.invalid_count(), 3);
    }

    #[test]
    fn valid_rows_hidden_unless_requested() {
        let ids: Vec<DbId> = sample(false).findings.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5]);

        let ids: Vec<DbId> = sample(true).findings.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn text_report_ends_with_totals() {
        let text = sample(false).render();
        assert!(text.ends_with(
            "5 product(s) audited (blank: 1, invalid_json: 1, invalid_url: 1, no_images: 1, valid: 1)"
        ));
    }
}
