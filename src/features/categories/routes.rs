use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Read-only routes used by the public site
pub fn public_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/navigation", get(handlers::get_navigation))
        .route("/api/categories/{slug}", get(handlers::get_category))
        .with_state(service)
}

/// Category management routes of the admin console
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/admin/categories",
            get(handlers::list_category_tree).post(handlers::create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route(
            "/api/admin/categories/reorder",
            post(handlers::reorder_categories),
        )
        .route(
            "/api/admin/categories/refresh",
            post(handlers::refresh_categories),
        )
        .with_state(service)
}
