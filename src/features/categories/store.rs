use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::categories::models::Category;
use crate::features::categories::ordering::OrderUpdate;
use crate::features::categories::payload::CategoryPayload;

/// Remote system of record for categories.
///
/// Implementations return normalized [`Category`] records; the service never
/// sees wire-level field variants.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Full flat list, unordered
    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn create_category(&self, payload: &CategoryPayload) -> Result<Category>;

    async fn update_category(&self, id: i64, payload: &CategoryPayload) -> Result<Category>;

    async fn delete_category(&self, id: i64) -> Result<()>;

    /// Persist a dense ordering batch for one sibling group
    async fn update_display_order(&self, updates: &[OrderUpdate]) -> Result<()>;
}
