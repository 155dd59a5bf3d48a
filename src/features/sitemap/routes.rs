use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::sitemap::handler;
use crate::features::sitemap::service::SitemapService;

pub fn routes(service: Arc<SitemapService>) -> Router {
    Router::new()
        .route("/sitemap.xml", get(handler::get_sitemap))
        .with_state(service)
}
