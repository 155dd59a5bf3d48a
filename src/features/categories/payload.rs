//! Turns an editor form into the body sent to the content API, applying the
//! nesting rules before anything leaves the gateway.

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryFormDto;
use crate::features::categories::models::{CategoryKind, CategoryType, SeoMeta};
use crate::features::categories::tree::{CategoryForest, Placement};
use crate::shared::validation::slugify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: i64 },
}

/// How the editor was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormContext {
    pub mode: FormMode,
    /// Opened as "add subcategory" (or editing an existing subcategory)
    pub is_subcategory: bool,
    /// Parent fixed by the caller, e.g. the inline "add child" action of one row
    pub fixed_parent_id: Option<i64>,
}

impl FormContext {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            is_subcategory: false,
            fixed_parent_id: None,
        }
    }

    pub fn create_child_of(parent_id: i64) -> Self {
        Self {
            mode: FormMode::Create,
            is_subcategory: true,
            fixed_parent_id: Some(parent_id),
        }
    }

    pub fn edit(id: i64, is_subcategory: bool) -> Self {
        Self {
            mode: FormMode::Edit { id },
            is_subcategory,
            fixed_parent_id: None,
        }
    }
}

/// Create/update body, ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPayload {
    pub name: String,
    /// `None` on edit keeps the stored slug
    pub slug: Option<String>,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub kind: CategoryKind,
    pub is_active: bool,
    pub seo: SeoMeta,
}

impl CategoryPayload {
    pub fn parent_id(&self) -> Option<i64> {
        self.kind.parent_id()
    }
}

/// Prepare the outgoing payload.
///
/// Leaf-only categories never carry a parent. A parent-capable subcategory
/// takes its parent from the calling context first and the picker second.
/// `forest` is the latest rendered tree; it is only used to refuse parents
/// that are known to be subcategories or leaf-only.
pub fn prepare_payload(
    form: CategoryFormDto,
    ctx: &FormContext,
    forest: &CategoryForest,
) -> Result<CategoryPayload> {
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let name = form.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Category name is required".to_string()));
    }

    let category_type = form.category_type.unwrap_or_default();
    let parent_id = match category_type {
        CategoryType::Regular => None,
        CategoryType::Parent if ctx.is_subcategory || form.parent_id.is_some() => {
            let parent = ctx.fixed_parent_id.or(form.parent_id);
            if parent.is_none() {
                return Err(AppError::Validation(
                    "A parent category must be selected for a subcategory".to_string(),
                ));
            }
            parent
        }
        CategoryType::Parent => None,
    };

    if let Some(parent_id) = parent_id {
        check_parent(parent_id, ctx, forest)?;
    }

    if let FormMode::Edit { id } = ctx.mode {
        let has_children = forest
            .find_root(id)
            .map(|root| root.has_children())
            .unwrap_or(false);
        if has_children && (parent_id.is_some() || category_type == CategoryType::Regular) {
            return Err(AppError::Validation(
                "A category with subcategories must stay a main parent category".to_string(),
            ));
        }
    }

    let slug = match (ctx.mode, form.slug) {
        (_, Some(slug)) => Some(slug),
        (FormMode::Create, None) => {
            let derived = slugify(&name);
            if derived.is_empty() {
                return Err(AppError::Validation(format!(
                    "Cannot derive a slug from '{}'; please enter one",
                    name
                )));
            }
            Some(derived)
        }
        (FormMode::Edit { .. }, None) => None,
    };

    Ok(CategoryPayload {
        name,
        slug,
        description: form.description.unwrap_or_default(),
        thumbnail_url: form.thumbnail_url,
        kind: CategoryKind::from_parts(category_type, parent_id),
        is_active: form.is_active.unwrap_or(true),
        seo: SeoMeta {
            meta_title: form.meta_title.unwrap_or_default(),
            meta_description: form.meta_description.unwrap_or_default(),
            meta_keywords: form.meta_keywords.unwrap_or_default(),
            og_image_url: form.og_image_url.unwrap_or_default(),
        },
    })
}

/// Two-level rule: only a parent-capable main category may hold subcategories.
/// Parents missing from the forest are left for the content API to judge.
fn check_parent(parent_id: i64, ctx: &FormContext, forest: &CategoryForest) -> Result<()> {
    if ctx.mode == (FormMode::Edit { id: parent_id }) {
        return Err(AppError::Validation(
            "A category cannot be its own parent".to_string(),
        ));
    }

    match forest.locate(parent_id) {
        Some(Placement::Child { .. }) => Err(AppError::Validation(format!(
            "Category {} is a subcategory and cannot hold subcategories",
            parent_id
        ))),
        Some(Placement::Root) => {
            let leaf_only = forest
                .find_root(parent_id)
                .is_some_and(|root| root.category.kind.is_leaf_only());
            if leaf_only {
                Err(AppError::Validation(format!(
                    "Category {} is a regular category and cannot hold subcategories",
                    parent_id
                )))
            } else {
                Ok(())
            }
        }
        None => Ok(()),
    }
}
