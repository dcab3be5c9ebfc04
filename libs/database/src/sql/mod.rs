//! Relational store connector (PostgreSQL or SQLite through SeaORM)
//!
//! Provides pool configuration, connection with retry, migrations and a liveness probe.

mod config;
mod connector;
mod health;

pub use config::{DatabaseConfig, IN_MEMORY_URL};
pub use connector::{
    connect, connect_from_config, connect_from_config_with_retry, connect_with_options,
    connect_with_retry, run_migrations,
};
pub use health::check_health;

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
