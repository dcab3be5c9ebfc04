//! Product routes backed by the SQL store

use axum::Router;
use domain_products::{ProductService, SqlProductRepository, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = SqlProductRepository::new(state.db.clone());
    handlers::router(ProductService::new(repository))
}
