//! Product Service - request-level operations over a repository

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;
use crate::query::ProductFilter;
use crate::repository::ProductRepository;

/// What the HTTP layer calls: JSON in, products out.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Build a product from `data` and store it. An `id` in `data` is ignored.
    #[instrument(skip(self, data))]
    pub async fn create_product(&self, data: &Value) -> ProductResult<Product> {
        let mut product = Product::from_json(data)?;
        product.create(self.repository()).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        Product::find(self.repository(), id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Replace every field of product `id` with the ones in `data`.
    #[instrument(skip(self, data))]
    pub async fn update_product(&self, id: i32, data: &Value) -> ProductResult<Product> {
        let mut product = self.get_product(id).await?;
        product.deserialize(data)?;
        product.id = Some(id);
        product.update(self.repository()).await?;
        Ok(product)
    }

    /// Succeeds whether or not the product existed.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<()> {
        let Some(product) = Product::find(self.repository(), id).await? else {
            return Ok(());
        };

        match product.delete(self.repository()).await {
            Ok(()) | Err(ProductError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        filter.into_query()?.fetch(self.repository()).await
    }
}
