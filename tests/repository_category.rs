mod common;

use sqlx::PgPool;
use std::sync::Arc;
use storefront::domain::entities::NewCategory;
use storefront::domain::repositories::{Reader, Writer};
use storefront::infrastructure::persistence::PgCategoryRepository;

fn new_category(parent_id: Option<i64>, name: &str, slug: &str, sort_order: i32) -> NewCategory {
    NewCategory {
        parent_id,
        name: name.to_string(),
        slug: slug.to_string(),
        sort_order,
    }
}

#[sqlx::test]
async fn test_create_and_find(pool: PgPool) {
    let repo = PgCategoryRepository::new(Arc::new(pool));

    let root = repo.create(new_category(None, "Kitchen", "kitchen", 0)).await.unwrap();
    let child = repo
        .create(new_category(Some(root.id), "Mugs", "mugs", 0))
        .await
        .unwrap();

    assert!(root.is_root());
    assert_eq!(child.parent_id, Some(root.id));

    let found = repo.find_by_slug("mugs").await.unwrap().unwrap();
    assert_eq!(found.id, child.id);
    assert!(repo.find_by_slug("missing").await.unwrap().is_none());

    assert_eq!(repo.find_by_id(root.id).await.unwrap().unwrap().name, "Kitchen");
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[sqlx::test]
async fn test_all_sorted_by_sort_order_then_name(pool: PgPool) {
    let repo = PgCategoryRepository::new(Arc::new(pool));

    repo.create(new_category(None, "Garden", "garden", 1)).await.unwrap();
    repo.create(new_category(None, "Books", "books", 1)).await.unwrap();
    repo.create(new_category(None, "Kitchen", "kitchen", 0)).await.unwrap();

    let names: Vec<String> = repo.all().await.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Kitchen", "Books", "Garden"]);

    let page = repo.list(1, 1).await.unwrap();
    assert_eq!(page[0].name, "Books");
}

#[sqlx::test]
async fn test_delete_detaches_children(pool: PgPool) {
    let repo = PgCategoryRepository::new(Arc::new(pool));

    let root = repo.create(new_category(None, "Kitchen", "kitchen", 0)).await.unwrap();
    let child = repo
        .create(new_category(Some(root.id), "Mugs", "mugs", 0))
        .await
        .unwrap();

    assert!(repo.delete(root.id).await.unwrap());

    let child = repo.find_by_id(child.id).await.unwrap().unwrap();
    assert!(child.parent_id.is_none());
}

#[sqlx::test]
async fn test_duplicate_slug_rejected(pool: PgPool) {
    let repo = PgCategoryRepository::new(Arc::new(pool));

    repo.create(new_category(None, "Kitchen", "kitchen", 0)).await.unwrap();
    let result = repo.create(new_category(None, "Kitchen 2", "kitchen", 0)).await;

    assert!(result.is_err());
}
