//! `sitemap.xml` for the public site, built from active categories

pub mod handler;
pub mod routes;
mod service;

pub use service::SitemapService;
