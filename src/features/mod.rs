pub mod categories;
pub mod sitemap;
