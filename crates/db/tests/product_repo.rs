//! Integration tests for the catalog record repository.
//!
//! Exercises the repository layer against a real database:
//! - Create and find
//! - Title search with literal wildcard handling
//! - Category counts
//! - Bulk category rewrites and price overwrites
//! - Images streaming

use catalog_core::maintenance::MaintenanceOperation;
use catalog_core::search::contains_pattern;
use catalog_db::models::product::{CategoryRewrite, CreateProduct};
use catalog_db::repositories::{MaintenanceLogRepo, ProductRepo};
use futures::TryStreamExt;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_product(title: &str, category: &str, price: f64) -> CreateProduct {
    CreateProduct {
        title: title.to_string(),
        category: category.to_string(),
        price,
        images: None,
        tags: None,
    }
}

async fn seed(pool: &PgPool) {
    for (title, category, price) in [
        ("Breaking Bad Heisenberg", "Tv Shows", 19.99),
        ("Breaking Bad Logo", "TV Shows", 14.99),
        ("Stranger Things", "tv shows", 12.0),
        ("Dune Part Two", "Movies", 24.5),
        ("100% Cotton Tee", "Apparel", 9.0),
    ] {
        ProductRepo::create(pool, &new_product(title, category, price))
            .await
            .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults(pool: PgPool) {
    let product = ProductRepo::create(&pool, &new_product("Alien", "Movies", 15.0))
        .await
        .unwrap();

    assert_eq!(product.images, "[]");
    assert!(product.tags.is_empty());

    let found = ProductRepo::find_by_id(&pool, product.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Alien");
    assert_eq!(found.price, 15.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_missing_returns_none(pool: PgPool) {
    assert!(ProductRepo::find_by_id(&pool, 9_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_is_case_insensitive(pool: PgPool) {
    seed(&pool).await;

    let hits = ProductRepo::search_by_title(&pool, &contains_pattern("breaking bad"), 50)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits[0].id < hits[1].id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_treats_percent_literally(pool: PgPool) {
    seed(&pool).await;

    let hits = ProductRepo::search_by_title(&pool, &contains_pattern("100%"), 50)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "100% Cotton Tee");

    let percent_only = ProductRepo::search_by_title(&pool, &contains_pattern("%"), 50)
        .await
        .unwrap();
    assert_eq!(percent_only.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_respects_limit(pool: PgPool) {
    seed(&pool).await;

    let hits = ProductRepo::search_by_title(&pool, &contains_pattern("a"), 2)
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_counts_group_exact_strings(pool: PgPool) {
    seed(&pool).await;

    let counts = ProductRepo::category_counts(&pool).await.unwrap();
    assert_eq!(counts.len(), 5);
    assert!(counts.iter().all(|c| c.count == 1));

    assert_eq!(ProductRepo::count(&pool, None).await.unwrap(), 5);
    assert_eq!(ProductRepo::count(&pool, Some("TV Shows")).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stream_images_yields_every_row(pool: PgPool) {
    seed(&pool).await;
    let mut broken = new_product("Broken", "Art", 5.0);
    broken.images = Some("not json".to_string());
    ProductRepo::create(&pool, &broken).await.unwrap();

    let rows: Vec<_> = ProductRepo::stream_images(&pool)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows.last().unwrap().images, "not json");
}

// ---------------------------------------------------------------------------
// Bulk writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rename_category_rewrites_exact_matches_only(pool: PgPool) {
    seed(&pool).await;

    let affected = ProductRepo::rename_category(&pool, "Tv Shows", "TV Shows")
        .await
        .unwrap();
    assert_eq!(affected, 1);

    assert_eq!(ProductRepo::count(&pool, Some("TV Shows")).await.unwrap(), 2);
    assert_eq!(ProductRepo::count(&pool, Some("tv shows")).await.unwrap(), 1);

    let log = MaintenanceLogRepo::list_recent(&pool, None, None).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].operation, "rename_category");
    assert_eq!(log[0].affected_count, 1);
    assert_eq!(log[0].parameters["from"], "Tv Shows");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn normalize_applies_all_rewrites_in_one_entry(pool: PgPool) {
    seed(&pool).await;

    let rewrites = vec![
        CategoryRewrite {
            from: "Tv Shows".to_string(),
            to: "TV Shows".to_string(),
        },
        CategoryRewrite {
            from: "tv shows".to_string(),
            to: "TV Shows".to_string(),
        },
    ];
    let affected = ProductRepo::normalize_categories(&pool, &rewrites)
        .await
        .unwrap();
    assert_eq!(affected, 2);
    assert_eq!(ProductRepo::count(&pool, Some("TV Shows")).await.unwrap(), 3);

    let log = MaintenanceLogRepo::list_recent(&pool, None, Some(10)).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].operation, "normalize_categories");
    assert_eq!(log[0].parameters["rewrites"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_price_for_one_category(pool: PgPool) {
    seed(&pool).await;

    let affected = ProductRepo::set_price(&pool, 29.99, Some("Movies"))
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let hits = ProductRepo::search_by_title(&pool, &contains_pattern("Dune"), 10)
        .await
        .unwrap();
    assert_eq!(hits[0].price, 29.99);

    let others = ProductRepo::search_by_title(&pool, &contains_pattern("Logo"), 10)
        .await
        .unwrap();
    assert_eq!(others[0].price, 14.99);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_price_for_everything(pool: PgPool) {
    seed(&pool).await;

    let affected = ProductRepo::set_price(&pool, 10.0, None).await.unwrap();
    assert_eq!(affected, 5);

    let distinct: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT price) FROM products")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(distinct, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_write_bumps_updated_at(pool: PgPool) {
    let product = ProductRepo::create(&pool, &new_product("Heat", "Movies", 10.0))
        .await
        .unwrap();

    ProductRepo::set_price(&pool, 11.0, None).await.unwrap();

    let after = ProductRepo::find_by_id(&pool, product.id).await.unwrap().unwrap();
    assert!(after.updated_at >= product.updated_at);
    assert_eq!(after.price, 11.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_filters_by_operation(pool: PgPool) {
    seed(&pool).await;

    ProductRepo::set_price(&pool, 10.0, None).await.unwrap();
    ProductRepo::rename_category(&pool, "Apparel", "Art").await.unwrap();
    ProductRepo::set_price(&pool, 11.0, Some("Movies")).await.unwrap();

    let all = MaintenanceLogRepo::list_recent(&pool, None, None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].operation, "set_price");
    assert_eq!(all[0].parameters["category"], "Movies");

    let renames =
        MaintenanceLogRepo::list_recent(&pool, Some(MaintenanceOperation::RenameCategory), None)
            .await
            .unwrap();
    assert_eq!(renames.len(), 1);
    assert_eq!(renames[0].affected_count, 1);
}
