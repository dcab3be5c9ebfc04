//! API routes module

pub mod health;
pub mod index;
pub mod products;

use axum::Router;
use axum_helpers::server::{create_router, health_router};
use std::io;

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(index::router())
        .nest("/products", products::router(state))
        .merge(health::router(state.clone()))
}

/// Full application: routes, docs, middleware and `/health`.
pub async fn app(state: &AppState) -> io::Result<Router> {
    let router = create_router::<ApiDoc>(routes(state)).await?;
    Ok(router.merge(health_router(state.config.app)))
}
