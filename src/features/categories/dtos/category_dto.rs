use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::categories::models::{Category, CategoryType};
use crate::features::categories::ordering::{MoveOp, OrderUpdate, SiblingGroup};
use crate::features::categories::tree::{ChildNode, RootNode};
use crate::shared::constants::category_icon;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub thumbnail_url: String,
    pub category_type: CategoryType,
    pub level: i32,
    pub display_order: i32,
    pub is_active: bool,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub og_image_url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Category> for CategoryResponseDto {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id(),
            name: c.name.clone(),
            slug: c.slug.clone(),
            description: c.description.clone(),
            thumbnail_url: c.thumbnail_url.clone(),
            category_type: c.kind.category_type(),
            level: c.level,
            display_order: c.display_order,
            is_active: c.is_active,
            meta_title: c.seo.meta_title.clone(),
            meta_description: c.seo.meta_description.clone(),
            meta_keywords: c.seo.meta_keywords.clone(),
            og_image_url: c.seo.og_image_url.clone(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self::from(&c)
    }
}

/// Node of the admin tree view. Subcategory nodes always have empty `children`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub category: CategoryResponseDto,
    pub has_children: bool,
    pub expanded: bool,
    pub children: Vec<CategoryTreeDto>,
}

impl From<&RootNode> for CategoryTreeDto {
    fn from(root: &RootNode) -> Self {
        Self {
            category: (&root.category).into(),
            has_children: root.has_children(),
            expanded: root.expanded,
            children: root.children.iter().map(Into::into).collect(),
        }
    }
}

impl From<&ChildNode> for CategoryTreeDto {
    fn from(child: &ChildNode) -> Self {
        Self {
            category: (&child.category).into(),
            has_children: false,
            expanded: child.expanded,
            children: Vec::new(),
        }
    }
}

/// Entry of the public navigation menu
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct NavigationItemDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub children: Vec<NavigationItemDto>,
}

impl NavigationItemDto {
    fn leaf(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            icon: category_icon(&category.slug).to_string(),
            thumbnail_url: Some(category.thumbnail_url.clone()).filter(|u| !u.is_empty()),
            children: Vec::new(),
        }
    }
}

impl From<&RootNode> for NavigationItemDto {
    fn from(root: &RootNode) -> Self {
        Self {
            children: root
                .children
                .iter()
                .map(|c| Self::leaf(&c.category))
                .collect(),
            ..Self::leaf(&root.category)
        }
    }
}

/// Treat `""` like an absent value
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Category editor form, used for both create and update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryFormDto {
    #[validate(length(min = 1, max = 255, message = "Category name must be 1-255 characters"))]
    pub name: String,

    /// Leave empty on create to derive it from the name
    #[validate(regex(
        path = "*crate::shared::validation::SLUG_REGEX",
        message = "Slug must be lowercase letters, digits and single hyphens"
    ))]
    #[serde(default, deserialize_with = "empty_as_none")]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub thumbnail_url: Option<String>,

    /// Defaults to `parent`
    #[serde(default)]
    pub category_type: Option<CategoryType>,

    /// Parent picked in the editor
    #[serde(default)]
    pub parent_id: Option<i64>,

    /// Defaults to `true`
    #[serde(default)]
    pub is_active: Option<bool>,

    #[validate(length(max = 255, message = "Meta title must not exceed 255 characters"))]
    #[serde(default)]
    pub meta_title: Option<String>,

    #[serde(default)]
    pub meta_description: Option<String>,

    #[serde(default)]
    pub meta_keywords: Option<String>,

    #[serde(default)]
    pub og_image_url: Option<String>,
}

/// Query params for creating a category
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateCategoryQuery {
    /// Creating a subcategory; a parent must come from `parent_id` or the form
    #[serde(default)]
    pub is_subcategory: bool,

    /// Parent fixed by the calling context (inline "add child")
    pub parent_id: Option<i64>,
}

/// Move one category within its sibling group
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReorderRequestDto {
    pub group: SiblingGroup,
    pub op: MoveOp,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReorderResultDto {
    /// False when the move was a no-op and nothing was sent
    pub applied: bool,
    pub updates: Vec<OrderUpdate>,
}

/// Outcome of an explicit refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshResultDto {
    pub generation: u64,
    /// False when a newer refresh had already been installed
    pub applied: bool,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::tree::build_tree;
    use crate::shared::test_helpers::category;

    #[test]
    fn test_form_treats_empty_slug_as_missing() {
        let form: CategoryFormDto =
            serde_json::from_str(r#"{"name":"Biệt thự","slug":"","category_type":"regular"}"#)
                .unwrap();
        assert_eq!(form.slug, None);
        assert_eq!(form.category_type, Some(CategoryType::Regular));
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_form_rejects_bad_slug_and_empty_name() {
        let form = CategoryFormDto {
            name: String::new(),
            slug: Some("Bad Slug".to_string()),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("slug"));
    }

    #[test]
    fn test_tree_dto_children_flags() {
        let forest = build_tree(&[
            category(1, "Dự án", None, 1),
            category(2, "Biệt thự", Some(1), 1),
        ]);

        let dto = CategoryTreeDto::from(&forest.roots()[0]);

        assert!(dto.has_children);
        assert_eq!(dto.children.len(), 1);
        assert!(!dto.children[0].has_children);
        assert!(dto.children[0].children.is_empty());
        assert_eq!(dto.children[0].category.parent_id, Some(1));
    }

    #[test]
    fn test_navigation_item_icon_and_thumbnail() {
        let mut tin_tuc = category(3, "Tin tức", None, 1);
        tin_tuc.slug = "tin-tuc".to_string();
        let forest = build_tree(&[tin_tuc]);

        let item = NavigationItemDto::from(&forest.roots()[0]);

        assert_eq!(item.icon, "newspaper");
        assert_eq!(item.thumbnail_url, None);
    }
}
