//! Connection management for the catalog's relational store.
//!
//! # Features
//!
//! - `sql` (default) - SeaORM connections for PostgreSQL and SQLite
//! - `config` - `core_config::FromEnv` support for [`sql::DatabaseConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::sql::{self, DatabaseConfig};
//! use migration::Migrator;
//!
//! let db = sql::connect_from_config_with_retry(DatabaseConfig::new(url), None).await?;
//! sql::run_migrations::<Migrator>(&db, "products_api").await?;
//! ```

pub mod common;

#[cfg(feature = "sql")]
pub mod sql;
