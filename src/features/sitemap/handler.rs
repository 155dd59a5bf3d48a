use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse};

use crate::core::error::Result;
use crate::features::sitemap::service::SitemapService;

/// Sitemap of the public site
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    responses(
        (status = 200, description = "Sitemap XML", content_type = "application/xml", body = String),
        (status = 500, description = "Sitemap could not be rendered")
    ),
    tag = "sitemap"
)]
pub async fn get_sitemap(
    State(service): State<Arc<SitemapService>>,
) -> Result<impl IntoResponse> {
    let xml = service.generate().await?;
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}
