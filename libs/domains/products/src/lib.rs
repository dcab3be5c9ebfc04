//! Products Domain
//!
//! The product catalog: the `Product` resource model, its lazy queries,
//! storage and HTTP endpoints.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, OpenAPI
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← JSON in, products out; 404 and 204 policy
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, Category, ProductQuery, active-record operations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Storage trait + SeaORM and in-memory implementations
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::sql::DatabaseConfig;
//! use domain_products::{ProductService, SqlProductRepository, handlers, init_db};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = init_db(&DatabaseConfig::new("postgres://localhost/catalog")).await?;
//!
//! let service = ProductService::new(SqlProductRepository::new(db));
//! let router = axum::Router::new().nest("/products", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;
pub mod service;
pub mod sql;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{Category, Product};
pub use query::{ProductFilter, ProductPredicate, ProductQuery};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
pub use sql::{SqlProductRepository, init_db};
