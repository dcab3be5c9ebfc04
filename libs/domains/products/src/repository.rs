use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;
use crate::query::ProductQuery;

/// Storage seam for products.
///
/// Implementations assign ids on create and never reuse them. Listing is
/// ordered by ascending id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product and return it with its new id. The input id is ignored.
    async fn create(&self, product: &Product) -> ProductResult<Product>;

    async fn find(&self, id: i32) -> ProductResult<Option<Product>>;

    /// Overwrite every field of the row with `product.id`.
    async fn update(&self, product: &Product) -> ProductResult<Product>;

    /// `false` when nothing had that id.
    async fn delete(&self, id: i32) -> ProductResult<bool>;

    async fn fetch(&self, query: &ProductQuery) -> ProductResult<Vec<Product>>;

    async fn count(&self, query: &ProductQuery) -> ProductResult<u64>;
}

#[derive(Debug)]
struct Store {
    next_id: i32,
    products: BTreeMap<i32, Product>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            products: BTreeMap::new(),
        }
    }
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: &Product) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        let id = store.next_id;
        store.next_id = id
            .checked_add(1)
            .ok_or_else(|| ProductError::Database("product id space exhausted".into()))?;

        let stored = Product {
            id: Some(id),
            ..product.clone()
        };
        store.products.insert(id, stored.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(stored)
    }

    async fn find(&self, id: i32) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn update(&self, product: &Product) -> ProductResult<Product> {
        let id = product.id.ok_or_else(|| {
            ProductError::Validation("called update on empty id field".into())
        })?;

        let mut store = self.store.write().await;
        let slot = store
            .products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;
        *slot = product.clone();

        tracing::info!(product_id = id, "Updated product");
        Ok(product.clone())
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let mut store = self.store.write().await;
        let removed = store.products.remove(&id).is_some();

        if removed {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(removed)
    }

    async fn fetch(&self, query: &ProductQuery) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(store
            .products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }

    async fn count(&self, query: &ProductQuery) -> ProductResult<u64> {
        let store = self.store.read().await;
        Ok(store.products.values().filter(|p| query.matches(p)).count() as u64)
    }
}
