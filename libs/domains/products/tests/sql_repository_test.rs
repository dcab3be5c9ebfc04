//! Repository properties against a real (in-memory SQLite) database
//!
//! Run with `--features test-utils/postgres` and swap `TestDatabase::new` for
//! `TestDatabase::postgres` to repeat them on PostgreSQL.

use domain_products::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use test_utils::{TestDataBuilder, TestDatabase, assertions::assert_some};

async fn repo() -> (TestDatabase, SqlProductRepository) {
    let db = TestDatabase::new().await;
    let repo = SqlProductRepository::new(db.connection());
    (db, repo)
}

fn fedora() -> Product {
    Product::new("Fedora", Decimal::from_str("12.50").unwrap())
        .with_description("A red hat")
        .with_category(Category::Cloths)
}

#[tokio::test]
async fn test_create_and_read_back() {
    let (_db, repo) = repo().await;
    assert!(Product::all(&repo).await.unwrap().is_empty());

    let mut product = fedora();
    product.create(&repo).await.unwrap();
    let id = assert_some(product.id, "id after create");

    let found = assert_some(Product::find(&repo, id).await.unwrap(), "stored product");
    assert_eq!(found, product);
    assert_eq!(found.price.to_string(), "12.50");
    assert_eq!(Product::all(&repo).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_price_round_trip_is_exact() {
    let (_db, repo) = repo().await;

    for raw in ["0.00", "0.01", "19.99", "1234567.89"] {
        let mut product = Product::new("Ford", Decimal::from_str(raw).unwrap());
        product.create(&repo).await.unwrap();

        let found = Product::find(&repo, product.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found.price.to_string(), raw);
    }
}

#[tokio::test]
async fn test_update_overwrites_fields() {
    let (_db, repo) = repo().await;
    let mut product = fedora();
    product.create(&repo).await.unwrap();

    product.description = Some("Updated".into());
    product.available = false;
    product.update(&repo).await.unwrap();

    let found = Product::find(&repo, product.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(found, product);
    assert_eq!(Product::all(&repo).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_errors() {
    let (_db, repo) = repo().await;

    let err = fedora().update(&repo).await.unwrap_err();
    assert_eq!(err.to_string(), "called update on empty id field");

    let ghost = Product {
        id: Some(404),
        ..fedora()
    };
    assert!(matches!(
        ghost.update(&repo).await,
        Err(ProductError::NotFound(404))
    ));
}

#[tokio::test]
async fn test_delete() {
    let (_db, repo) = repo().await;
    let mut product = fedora();
    product.create(&repo).await.unwrap();

    product.delete(&repo).await.unwrap();

    assert_eq!(Product::find(&repo, product.id.unwrap()).await.unwrap(), None);
    assert!(Product::all(&repo).await.unwrap().is_empty());
    assert!(product.delete(&repo).await.is_err());
}

#[tokio::test]
async fn test_find_by_queries_match_in_memory_reference() {
    let (_db, repo) = repo().await;
    let reference = InMemoryProductRepository::new();
    let builder = TestDataBuilder::from_test_name("find_by_queries");

    for payload in builder.product_payloads(20) {
        Product::from_json(&payload).unwrap().create(&repo).await.unwrap();
        Product::from_json(&payload).unwrap().create(&reference).await.unwrap();
    }

    let first = Product::all(&repo).await.unwrap().remove(0);
    let queries = [
        Product::find_by_name(first.name.clone()),
        Product::find_by_category(first.category),
        Product::find_by_availability(first.available),
        Product::find_by_availability(!first.available),
        Product::find_by_category(first.category).and_available(first.available),
    ];

    for query in queries {
        let stored = query.fetch(&repo).await.unwrap();
        assert!(!stored.is_empty() || query.count(&reference).await.unwrap() == 0);
        assert!(stored.iter().all(|p| query.matches(p)), "{:?}", query);
        assert_eq!(stored, query.fetch(&reference).await.unwrap(), "{:?}", query);
        assert_eq!(query.count(&repo).await.unwrap(), stored.len() as u64);
    }
}
