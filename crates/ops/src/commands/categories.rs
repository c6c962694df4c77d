use catalog_core::category::{classify_category, validate_rename, CategoryStatus};
use catalog_core::maintenance::MaintenanceOperation;
use catalog_db::models::product::{CategoryCount, CategoryRewrite};
use catalog_db::repositories::ProductRepo;
use catalog_db::DbPool;
use serde::Serialize;

use crate::commands::WriteOutcome;
use crate::error::CliResult;
use crate::output::{render_table, Output};

// ---------------------------------------------------------------------------
// Distribution report
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub count: i64,
    #[serde(flatten)]
    pub status: CategoryStatus,
}

#[derive(Debug, Serialize)]
pub struct CategoryReport {
    pub rows: Vec<CategoryRow>,
    pub total_products: i64,
    pub drifted_products: i64,
    pub unknown_products: i64,
}

/// Classify every stored category value.
pub fn build_category_report(counts: Vec<CategoryCount>) -> CategoryReport {
    let mut report = CategoryReport {
        rows: Vec::with_capacity(counts.len()),
        total_products: 0,
        drifted_products: 0,
        unknown_products: 0,
    };
    for CategoryCount { category, count } in counts {
        let status = classify_category(&category);
        report.total_products += count;
        match status {
            CategoryStatus::Drifted(_) => report.drifted_products += count,
            CategoryStatus::Unknown => report.unknown_products += count,
            CategoryStatus::Canonical(_) => {}
        }
        report.rows.push(CategoryRow {
            category,
            count,
            status,
        });
    }
    report
}

fn render_report(report: &CategoryReport) -> String {
    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            let status = match row.status {
                CategoryStatus::Canonical(_) => "ok".to_string(),
                CategoryStatus::Drifted(target) => format!("drifted -> {target}"),
                CategoryStatus::Unknown => "unknown".to_string(),
            };
            vec![format!("{:?}", row.category), row.count.to_string(), status]
        })
        .collect();
    let mut text = render_table(&["CATEGORY", "PRODUCTS", "STATUS"], &rows);
    text.push_str(&format!(
        "{} product(s), {} drifted, {} unknown",
        report.total_products, report.drifted_products, report.unknown_products
    ));
    text
}

/// `categories`: product count per stored value, with drift flags.
pub async fn report(pool: &DbPool, out: Output) -> CliResult<()> {
    let counts = ProductRepo::category_counts(pool).await?;
    let report = build_category_report(counts);
    out.emit(&report, render_report)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Rewrites to apply, and the values left alone because they resolve to
/// nothing.
#[derive(Debug, Serialize)]
pub struct NormalizePlan {
    pub rewrites: Vec<CategoryRewrite>,
    /// Rows the rewrites are expected to touch.
    pub expected_rows: i64,
    pub unknown: Vec<String>,
}

/// Plan rewrites for every drifted value.
pub fn plan_rewrites(counts: &[CategoryCount]) -> NormalizePlan {
    let mut plan = NormalizePlan {
        rewrites: Vec::new(),
        expected_rows: 0,
        unknown: Vec::new(),
    };
    for row in counts {
        match classify_category(&row.category) {
            CategoryStatus::Drifted(target) => {
                plan.rewrites.push(CategoryRewrite {
                    from: row.category.clone(),
                    to: target.as_str().to_string(),
                });
                plan.expected_rows += row.count;
            }
            CategoryStatus::Unknown => plan.unknown.push(row.category.clone()),
            CategoryStatus::Canonical(_) => {}
        }
    }
    plan
}

#[derive(Debug, Serialize)]
struct NormalizeResult {
    #[serde(flatten)]
    outcome: WriteOutcome,
    #[serde(flatten)]
    plan: NormalizePlan,
}

fn render_normalize(result: &NormalizeResult) -> String {
    let mut lines: Vec<String> = result
        .plan
        .rewrites
        .iter()
        .map(|r| format!("{:?} -> {:?}", r.from, r.to))
        .collect();
    if result.plan.rewrites.is_empty() {
        lines.push("No drifted categories".to_string());
    }
    for value in &result.plan.unknown {
        lines.push(format!("unknown, left unchanged: {value:?}"));
    }
    lines.push(result.outcome.render());
    lines.join("\n")
}

/// `normalize-categories`: rewrite drifted spellings to canonical names.
pub async fn normalize(pool: &DbPool, out: Output, dry_run: bool) -> CliResult<()> {
    let counts = ProductRepo::category_counts(pool).await?;
    let plan = plan_rewrites(&counts);

    for value in &plan.unknown {
        tracing::warn!(category = %value, "Unknown category left unchanged");
    }

    let affected = if dry_run || plan.rewrites.is_empty() {
        plan.expected_rows as u64
    } else {
        let affected = ProductRepo::normalize_categories(pool, &plan.rewrites).await?;
        tracing::info!(
            operation = MaintenanceOperation::NormalizeCategories.as_str(),
            affected,
            rewrites = plan.rewrites.len(),
            "Categories normalized"
        );
        affected
    };

    let result = NormalizeResult {
        outcome: WriteOutcome {
            operation: MaintenanceOperation::NormalizeCategories.as_str(),
            dry_run,
            affected,
        },
        plan,
    };
    out.emit(&result, render_normalize)
}

// ---------------------------------------------------------------------------
// Literal rename
// ---------------------------------------------------------------------------

/// `rename-category`: rewrite one exact stored value to another.
pub async fn rename(
    pool: &DbPool,
    out: Output,
    from: &str,
    to: &str,
    dry_run: bool,
) -> CliResult<()> {
    validate_rename(from, to)?;
    if !matches!(classify_category(to), CategoryStatus::Canonical(_)) {
        tracing::warn!(category = %to, "Rename target is not a canonical category");
    }

    let affected = if dry_run {
        ProductRepo::count(pool, Some(from)).await? as u64
    } else {
        let affected = ProductRepo::rename_category(pool, from, to).await?;
        tracing::info!(
            operation = MaintenanceOperation::RenameCategory.as_str(),
            affected,
            from,
            to,
            "Category renamed"
        );
        affected
    };

    let outcome = WriteOutcome {
        operation: MaintenanceOperation::RenameCategory.as_str(),
        dry_run,
        affected,
    };
    out.emit(&outcome, WriteOutcome::render)
}

#[cfg(test)]
mod tests {
    use catalog_core::category::Category;

    use super::*;

    fn counts(rows: &[(&str, i64)]) -> Vec<CategoryCount> {
        rows.iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count: *count,
            })
            .collect()
    }

    #[test]
    fn report_totals_by_status() {
        let report = build_category_report(counts(&[
            ("TV Shows", 10),
            ("Tv Shows", 4),
            ("Movies", 3),
            ("Apparel", 2),
        ]));
        assert_eq!(report.total_products, 19);
        assert_eq!(report.drifted_products, 4);
        assert_eq!(report.unknown_products, 2);
        assert_eq!(report.rows[1].status, CategoryStatus::Drifted(Category::TvShows));
    }

    #[test]
    fn plan_rewrites_only_drifted_values() {
        let plan = plan_rewrites(&counts(&[
            ("TV Shows", 10),
            ("Tv Shows", 4),
            ("tv-shows", 1),
            ("film", 2),
            ("Apparel", 2),
        ]));
        let pairs: Vec<(&str, &str)> = plan
            .rewrites
            .iter()
            .map(|r| (r.from.as_str(), r.to.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Tv Shows", "TV Shows"),
                ("tv-shows", "TV Shows"),
                ("film", "Movies"),
            ]
        );
        assert_eq!(plan.expected_rows, 7);
        assert_eq!(plan.unknown, vec!["Apparel"]);
    }

    #[test]
    fn clean_catalog_needs_no_rewrites() {
        let plan = plan_rewrites(&counts(&[("Movies", 3), ("Art", 1)]));
        assert!(plan.rewrites.is_empty());
        assert_eq!(plan.expected_rows, 0);
    }

    #[test]
    fn report_rows_serialize_with_status() {
        let report = build_category_report(counts(&[("Tv Shows", 4)]));
        let json = serde_json::to_value(&report.rows[0]).unwrap();
        assert_eq!(json["status"], "drifted");
        assert_eq!(json["canonical"], "TV Shows");
    }
}
