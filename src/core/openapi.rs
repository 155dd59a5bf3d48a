use utoipa::{Modify, OpenApi};

use crate::features::categories::{
    dtos as categories_dtos, handlers as categories_handlers, models as categories_models,
    ordering,
};
use crate::features::sitemap::handler as sitemap_handler;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Public site
        categories_handlers::get_navigation,
        categories_handlers::get_category,
        sitemap_handler::get_sitemap,
        // Admin console
        categories_handlers::list_category_tree,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        categories_handlers::reorder_categories,
        categories_handlers::refresh_categories,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_models::CategoryType,
            categories_dtos::CategoryFormDto,
            categories_dtos::ReorderRequestDto,
            ordering::SiblingGroup,
            ordering::MoveOp,
            ordering::OrderUpdate,
            ApiResponse<Vec<categories_dtos::NavigationItemDto>>,
            ApiResponse<Vec<categories_dtos::CategoryTreeDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_dtos::ReorderResultDto>,
            ApiResponse<categories_dtos::RefreshResultDto>,
        )
    ),
    tags(
        (name = "navigation", description = "Public navigation menu"),
        (name = "categories", description = "Public category lookup"),
        (name = "sitemap", description = "Sitemap of the public site"),
        (name = "admin-categories", description = "Category management for the admin console"),
    ),
    info(
        title = "Atelier Admin API",
        version = "0.1.0",
        description = "Category tree gateway between the admin console and the content API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
