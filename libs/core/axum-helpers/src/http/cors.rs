use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// CORS layer for the catalog API.
///
/// Allows the listed origins, the CRUD methods and JSON content headers,
/// with a one hour preflight cache.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Build a CORS layer from `CORS_ALLOWED_ORIGIN` (comma-separated).
///
/// Returns `Ok(None)` when the variable is unset or blank; the bundled admin
/// page is served same-origin and needs no CORS.
pub fn cors_layer_from_env() -> io::Result<Option<CorsLayer>> {
    let Ok(origins) = std::env::var("CORS_ALLOWED_ORIGIN") else {
        return Ok(None);
    };

    let allowed_origins = parse_origins(&origins)?;
    if allowed_origins.is_empty() {
        return Ok(None);
    }

    info!(origins = %origins, "CORS enabled");
    Ok(Some(create_cors_layer(allowed_origins)))
}

fn parse_origins(origins: &str) -> io::Result<Vec<HeaderValue>> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid CORS_ALLOWED_ORIGIN value '{}': {}", s, e),
                )
            })
        })
        .collect()
}
