//! JSON shapes of the content API.
//!
//! Incoming records are parsed leniently: every field but `id` may be
//! missing, and the legacy `order_index` key stands in for `display_order`.
//! Numeric fields also accept numeric strings; other junk reads as absent.
//! A list record that still cannot be read is skipped, not the whole list.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::features::categories::models::{Category, CategoryKind, CategoryType, SeoMeta};
use crate::features::categories::ordering::OrderUpdate;
use crate::features::categories::payload::CategoryPayload;

fn lenient_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(number.and_then(|n| T::try_from(n).ok()))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        Some(Value::String(s)) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Category as returned by `GET /categories` and the write endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategory {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub category_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub parent_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub level: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub order_index: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub display_order: Option<i32>,
    /// Missing or unreadable means active
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub og_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// RFC 3339, or a bare `YYYY-MM-DD HH:MM:SS` taken as UTC. Anything else is dropped.
fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

impl From<ApiCategory> for Category {
    fn from(api: ApiCategory) -> Self {
        let category_type = CategoryType::from_wire(api.category_type.as_deref());
        let parent_id = api.parent_id.filter(|&id| id != 0);
        let display_order = api
            .display_order
            .filter(|&order| order != 0)
            .or(api.order_index)
            .unwrap_or(0);

        Category {
            id: api.id,
            name: api.name.unwrap_or_default(),
            slug: api.slug.unwrap_or_default(),
            description: api.description.unwrap_or_default(),
            thumbnail_url: api.thumbnail_url.unwrap_or_default(),
            kind: CategoryKind::from_parts(category_type, parent_id),
            level: api.level.unwrap_or(0),
            display_order,
            is_active: api.is_active.unwrap_or(true),
            seo: SeoMeta {
                meta_title: api.meta_title.unwrap_or_default(),
                meta_description: api.meta_description.unwrap_or_default(),
                meta_keywords: api.meta_keywords.unwrap_or_default(),
                og_image_url: api.og_image_url.unwrap_or_default(),
            },
            created_at: parse_timestamp(api.created_at.as_deref()),
            updated_at: parse_timestamp(api.updated_at.as_deref()),
        }
    }
}

/// Reads a `GET /categories` body record by record
pub fn categories_from_list(values: Vec<Value>) -> Vec<Category> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| match serde_json::from_value::<ApiCategory>(value) {
            Ok(record) => Some(record.into()),
            Err(e) => {
                tracing::warn!("Skipping unreadable category record #{}: {}", position, e);
                None
            }
        })
        .collect()
}

/// Body of `POST /categories` and `PUT /categories/{id}`.
///
/// `parent_id` is always serialized, as `null` for main categories, so an
/// update can move a subcategory back to the top level.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRequestBody<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<&'a str>,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<&'a str>,
    pub category_type: &'static str,
    pub parent_id: Option<i64>,
    pub is_active: bool,
    pub meta_title: &'a str,
    pub meta_description: &'a str,
    pub meta_keywords: &'a str,
    pub og_image_url: &'a str,
}

impl<'a> From<&'a CategoryPayload> for CategoryRequestBody<'a> {
    fn from(payload: &'a CategoryPayload) -> Self {
        Self {
            name: &payload.name,
            slug: payload.slug.as_deref(),
            description: &payload.description,
            thumbnail_url: payload.thumbnail_url.as_deref(),
            category_type: payload.kind.category_type().as_wire(),
            parent_id: payload.parent_id(),
            is_active: payload.is_active,
            meta_title: &payload.seo.meta_title,
            meta_description: &payload.seo.meta_description,
            meta_keywords: &payload.seo.meta_keywords,
            og_image_url: &payload.seo.og_image_url,
        }
    }
}

/// Body of `PUT /categories/update-order`
#[derive(Debug, Clone, Serialize)]
pub struct OrderBatchBody<'a> {
    pub categories: &'a [OrderUpdate],
}

/// Error body of the content API
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
