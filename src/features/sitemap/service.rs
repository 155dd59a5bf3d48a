use std::sync::{Arc, OnceLock};

use chrono::{NaiveDate, Utc};
use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::categories::CategoryService;
use crate::shared::constants::{
    SITEMAP_CATEGORY_PRIORITY, SITEMAP_CHANGEFREQ, SITEMAP_HOME_PRIORITY,
};

const SITEMAP_TEMPLATE_NAME: &str = "sitemap.xml";

const SITEMAP_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{%- for url in urls %}
  <url>
    <loc>{{ url.loc }}</loc>
    <lastmod>{{ url.lastmod }}</lastmod>
    <changefreq>{{ changefreq }}</changefreq>
    <priority>{{ url.priority }}</priority>
  </url>
{%- endfor %}
</urlset>"#;

static SITEMAP_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Template environment with XML escaping for every interpolated value
fn environment() -> &'static Environment<'static> {
    SITEMAP_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        if let Err(e) = env.add_template(SITEMAP_TEMPLATE_NAME, SITEMAP_TEMPLATE) {
            tracing::error!("Failed to load sitemap template: {}", e);
        }
        env
    })
}

#[derive(Serialize)]
struct SitemapUrl {
    loc: String,
    lastmod: String,
    priority: &'static str,
}

/// Builds `sitemap.xml` from the current category snapshot
pub struct SitemapService {
    categories: Arc<CategoryService>,
    base_url: String,
}

impl SitemapService {
    pub fn new(categories: Arc<CategoryService>, base_url: &str) -> Self {
        Self {
            categories,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn generate(&self) -> Result<String> {
        let categories = self.categories.active_categories().await;
        render(&self.base_url, &categories, Utc::now().date_naive())
    }
}

/// Homepage first, then one entry per category in the given order.
/// Categories without `updated_at` are stamped with `today`.
fn render(base_url: &str, categories: &[Category], today: NaiveDate) -> Result<String> {
    let home = SitemapUrl {
        loc: base_url.to_string(),
        lastmod: today.format("%Y-%m-%d").to_string(),
        priority: SITEMAP_HOME_PRIORITY,
    };
    let urls: Vec<SitemapUrl> = std::iter::once(home)
        .chain(categories.iter().map(|c| SitemapUrl {
            loc: format!("{}/category/{}", base_url, c.slug),
            lastmod: c
                .updated_at
                .map(|t| t.date_naive())
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string(),
            priority: SITEMAP_CATEGORY_PRIORITY,
        }))
        .collect();

    let template = environment()
        .get_template(SITEMAP_TEMPLATE_NAME)
        .map_err(|e| AppError::Internal(format!("Sitemap template missing: {}", e)))?;

    template
        .render(context! { urls => urls, changefreq => SITEMAP_CHANGEFREQ })
        .map_err(|e| AppError::Internal(format!("Failed to render sitemap: {}", e)))
}
