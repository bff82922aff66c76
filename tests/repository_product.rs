mod common;

use sqlx::PgPool;
use std::sync::Arc;
use storefront::domain::entities::{CartLine, NewProduct, ProductFilter, ProductSort, StockStatus};
use storefront::domain::repositories::{ProductRepository, Reader, Writer};
use storefront::error::AppError;
use storefront::infrastructure::persistence::PgProductRepository;

/// Kitchen > Mugs > Travel, Garden; products in each plus one hidden mug.
async fn seed(pool: &PgPool) {
    let kitchen = common::insert_category(pool, None, "Kitchen", 0).await;
    let mugs = common::insert_category(pool, Some(kitchen), "Mugs", 0).await;
    let travel = common::insert_category(pool, Some(mugs), "Travel", 0).await;
    let garden = common::insert_category(pool, None, "Garden", 1).await;

    common::insert_product(pool, Some(mugs), "Blue Mug", 1299, 5, true).await;
    common::insert_product(pool, Some(mugs), "Red Mug", 1099, 0, true).await;
    common::insert_product(pool, Some(travel), "Travel Mug", 1899, 2, true).await;
    common::insert_product(pool, Some(garden), "Garden Hose", 3999, 3, true).await;
    common::insert_product(pool, Some(mugs), "Secret Mug", 999, 10, false).await;
}

fn repo(pool: PgPool) -> PgProductRepository {
    PgProductRepository::new(Arc::new(pool))
}

fn slugs(products: &[storefront::domain::entities::Product]) -> Vec<&str> {
    products.iter().map(|p| p.slug.as_str()).collect()
}

#[sqlx::test]
async fn test_public_products_excludes_hidden(pool: PgPool) {
    seed(&pool).await;
    let repo = repo(pool);

    let page = repo
        .public_products(ProductFilter::new(0, 20).sorted_by(ProductSort::Name))
        .await
        .unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(
        slugs(&page.items),
        vec!["blue-mug", "garden-hose", "red-mug", "travel-mug"]
    );
    assert_eq!(page.items[0].category_slug.as_deref(), Some("mugs"));
}

#[sqlx::test]
async fn test_public_products_category_subtree(pool: PgPool) {
    seed(&pool).await;
    let repo = repo(pool);

    let page = repo
        .public_products(
            ProductFilter::new(0, 20)
                .with_category(Some("kitchen".to_string()))
                .sorted_by(ProductSort::PriceAsc),
        )
        .await
        .unwrap();

    assert_eq!(slugs(&page.items), vec!["red-mug", "blue-mug", "travel-mug"]);
}

#[sqlx::test]
async fn test_public_products_search_and_filters(pool: PgPool) {
    seed(&pool).await;
    let repo = repo(pool);

    let page = repo
        .public_products(
            ProductFilter::new(0, 20)
                .with_search(Some("MUG".to_string()))
                .with_price_range(Some(1100), None)
                .only_in_stock(true)
                .sorted_by(ProductSort::PriceDesc),
        )
        .await
        .unwrap();

    assert_eq!(slugs(&page.items), vec!["travel-mug", "blue-mug"]);
}

#[sqlx::test]
async fn test_search_wildcards_are_literal(pool: PgPool) {
    seed(&pool).await;
    let repo = repo(pool);

    let page = repo
        .public_products(ProductFilter::new(0, 20).with_search(Some("%".to_string())))
        .await
        .unwrap();

    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[sqlx::test]
async fn test_public_products_pagination(pool: PgPool) {
    seed(&pool).await;
    let repo = repo(pool);

    let page = repo
        .public_products(ProductFilter::new(2, 2).sorted_by(ProductSort::Name))
        .await
        .unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(slugs(&page.items), vec!["red-mug", "travel-mug"]);
}

#[sqlx::test]
async fn test_public_product_by_slug(pool: PgPool) {
    seed(&pool).await;
    let repo = repo(pool);

    let product = repo.public_product_by_slug("blue-mug").await.unwrap();
    assert_eq!(product.unwrap().price_cents, 1299);

    assert!(repo.public_product_by_slug("secret-mug").await.unwrap().is_none());
    assert!(repo.public_product_by_slug("missing").await.unwrap().is_none());

    let hidden = repo.find_by_slug_any("secret-mug").await.unwrap();
    assert!(hidden.is_some_and(|p| !p.is_public));
}

#[sqlx::test]
async fn test_categories_for_select(pool: PgPool) {
    seed(&pool).await;
    let repo = repo(pool);

    let groups = repo.categories_for_select().await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "Kitchen");
    let labels: Vec<&str> = groups[0].options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Mugs", "Mugs / Travel"]);
    assert_eq!(groups[1].options[0].label, "Garden");
}

#[sqlx::test]
async fn test_validate_cart_stock(pool: PgPool) {
    seed(&pool).await;
    let green = common::insert_product(&pool, None, "Green Mug", 500, 4, true).await;
    let repo = repo(pool);

    let report = repo
        .validate_cart_stock(&[CartLine::new(green, 2), CartLine::new(green, 2)])
        .await
        .unwrap();
    assert!(report.valid);
    assert_eq!(report.lines[0].requested, 4);

    let report = repo
        .validate_cart_stock(&[CartLine::new(green, 5), CartLine::new(999_999, 1)])
        .await
        .unwrap();
    assert!(!report.valid);
    assert_eq!(report.lines[0].status, StockStatus::InsufficientStock);
    assert_eq!(report.lines[1].status, StockStatus::Unavailable);
}

#[sqlx::test]
async fn test_create_set_stock_and_delete(pool: PgPool) {
    let repo = repo(pool);

    let product = repo
        .create(NewProduct {
            category_id: None,
            name: "Lamp".to_string(),
            slug: "lamp".to_string(),
            description: None,
            price_cents: 4500,
            stock: 1,
            is_public: true,
        })
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 1);
    assert_eq!(repo.count_public().await.unwrap(), 1);

    let updated = repo.set_stock(product.id, 9).await.unwrap().unwrap();
    assert_eq!(updated.stock, 9);

    assert!(repo.delete(product.id).await.unwrap());
    assert!(!repo.delete(product.id).await.unwrap());
    assert!(repo.find_by_id(product.id).await.unwrap().is_none());
}

#[sqlx::test]
async fn test_duplicate_slug_is_conflict(pool: PgPool) {
    seed(&pool).await;
    let repo = repo(pool);

    let result = repo
        .create(NewProduct {
            category_id: None,
            name: "Another Blue Mug".to_string(),
            slug: "blue-mug".to_string(),
            description: None,
            price_cents: 100,
            stock: 1,
            is_public: true,
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}
