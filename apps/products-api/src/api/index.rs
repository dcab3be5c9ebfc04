//! Static administration page

use axum::{Router, response::Html, routing::get};

const INDEX_HTML: &str = include_str!("../../static/index.html");

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn router() -> Router {
    Router::new().route("/", get(index))
}
