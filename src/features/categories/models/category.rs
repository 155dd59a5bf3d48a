use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{CATEGORY_TYPE_LEAF, CATEGORY_TYPE_PARENT};

/// The category type the admin picks in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    /// May hold subcategories (and posts)
    #[default]
    Parent,
    /// Holds posts only; never nested, never a parent
    Regular,
}

impl CategoryType {
    /// Parse the `category_type` wire value. Anything but `"regular"` is
    /// parent-capable, which also covers legacy `"product"`/`"news"` values.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some(CATEGORY_TYPE_LEAF) => CategoryType::Regular,
            _ => CategoryType::Parent,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            CategoryType::Parent => CATEGORY_TYPE_PARENT,
            CategoryType::Regular => CATEGORY_TYPE_LEAF,
        }
    }
}

/// Nesting capability of a category together with its placement.
///
/// A leaf-only category carries no parent at all, so "leaf-only with a
/// parent" cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    ParentCapable { parent_id: Option<i64> },
    LeafOnly,
}

impl CategoryKind {
    /// Combine a type and a requested parent. A leaf-only type discards the parent.
    pub fn from_parts(category_type: CategoryType, parent_id: Option<i64>) -> Self {
        match category_type {
            CategoryType::Parent => CategoryKind::ParentCapable { parent_id },
            CategoryType::Regular => CategoryKind::LeafOnly,
        }
    }

    pub fn parent_id(&self) -> Option<i64> {
        match self {
            CategoryKind::ParentCapable { parent_id } => *parent_id,
            CategoryKind::LeafOnly => None,
        }
    }

    pub fn is_leaf_only(&self) -> bool {
        matches!(self, CategoryKind::LeafOnly)
    }

    pub fn category_type(&self) -> CategoryType {
        match self {
            CategoryKind::ParentCapable { .. } => CategoryType::Parent,
            CategoryKind::LeafOnly => CategoryType::Regular,
        }
    }
}

/// Search/social metadata, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoMeta {
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub og_image_url: String,
}

/// A category as delivered by the content API, after field normalization
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub thumbnail_url: String,
    pub kind: CategoryKind,
    /// Denormalized depth as stored: 0 for main categories, 1 for subcategories
    pub level: i32,
    /// Sibling ordering key (`display_order`, falling back to `order_index`)
    pub display_order: i32,
    pub is_active: bool,
    pub seo: SeoMeta,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn parent_id(&self) -> Option<i64> {
        self.kind.parent_id()
    }

    /// Stored as a main category (level 0)
    pub fn is_main(&self) -> bool {
        self.level == 0
    }
}
