use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::categories::dtos::{
    CategoryFormDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryQuery, NavigationItemDto,
    RefreshResultDto, ReorderRequestDto, ReorderResultDto,
};
use crate::features::categories::services::{CategoryService, RefreshOutcome};
use crate::shared::types::{ApiResponse, Meta};

/// Public navigation menu
///
/// Active main categories with their active subcategories, in display order.
#[utoipa::path(
    get,
    path = "/api/navigation",
    responses(
        (status = 200, description = "Navigation menu", body = ApiResponse<Vec<NavigationItemDto>>),
    ),
    tag = "navigation"
)]
pub async fn get_navigation(
    State(service): State<Arc<CategoryService>>,
) -> Json<ApiResponse<Vec<NavigationItemDto>>> {
    let items = service.navigation().await;
    let meta = Meta::total(items.len());
    Json(ApiResponse::success(Some(items), None, Some(meta)))
}

/// Get active category by slug
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Full category tree for the admin console, inactive categories included
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "Category tree", body = ApiResponse<Vec<CategoryTreeDto>>),
    ),
    tag = "admin-categories"
)]
pub async fn list_category_tree(
    State(service): State<Arc<CategoryService>>,
) -> Json<ApiResponse<Vec<CategoryTreeDto>>> {
    let (generation, total, tree) = service.admin_tree().await;
    let meta = Meta::total(total).with_generation(generation);
    Json(ApiResponse::success(Some(tree), None, Some(meta)))
}

/// Create a category
///
/// With `is_subcategory` the new category needs a parent, taken from the
/// `parent_id` query param first and the form second. Leaf-only (`regular`)
/// categories are always created at the top level.
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    params(CreateCategoryQuery),
    request_body = CategoryFormDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 502, description = "Content API error")
    ),
    tag = "admin-categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<CreateCategoryQuery>,
    AppJson(form): AppJson<CategoryFormDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    let category = service
        .create(form, query.is_subcategory, query.parent_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(category),
            Some("Category created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = CategoryFormDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 502, description = "Content API error")
    ),
    tag = "admin-categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
    AppJson(form): AppJson<CategoryFormDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.update(id, form).await?;
    Ok(Json(ApiResponse::success(
        Some(category),
        Some("Category updated successfully".to_string()),
        None,
    )))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 502, description = "Content API error")
    ),
    tag = "admin-categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted successfully".to_string()),
        None,
    )))
}

/// Move a category within its sibling group
///
/// Moves that change nothing (up on the first row, down on the last) return
/// `applied: false` and send nothing to the content API.
#[utoipa::path(
    post,
    path = "/api/admin/categories/reorder",
    request_body = ReorderRequestDto,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<ReorderResultDto>),
        (status = 400, description = "Index out of range"),
        (status = 404, description = "Sibling group not found"),
        (status = 502, description = "Content API error")
    ),
    tag = "admin-categories"
)]
pub async fn reorder_categories(
    State(service): State<Arc<CategoryService>>,
    AppJson(request): AppJson<ReorderRequestDto>,
) -> Result<Json<ApiResponse<ReorderResultDto>>> {
    let result = service.reorder(request.group, request.op).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Refetch the category list from the content API
#[utoipa::path(
    post,
    path = "/api/admin/categories/refresh",
    responses(
        (status = 200, description = "Refresh finished", body = ApiResponse<RefreshResultDto>),
    ),
    tag = "admin-categories"
)]
pub async fn refresh_categories(
    State(service): State<Arc<CategoryService>>,
) -> Json<ApiResponse<RefreshResultDto>> {
    let outcome = service.refresh().await;
    let total = service.snapshot().await.records.len();
    let result = RefreshResultDto {
        generation: outcome.generation(),
        applied: matches!(outcome, RefreshOutcome::Applied { .. }),
        total,
    };
    Json(ApiResponse::success(Some(result), None, None))
}
