use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryKind, SeoMeta};
use crate::features::categories::ordering::OrderUpdate;
use crate::features::categories::payload::CategoryPayload;
use crate::features::categories::store::CategoryStore;
use crate::shared::validation::slugify;

/// Parent-capable, active category with a slug derived from `name`
pub fn category(id: i64, name: &str, parent_id: Option<i64>, display_order: i32) -> Category {
    Category {
        id,
        name: name.to_string(),
        slug: slugify(name),
        description: String::new(),
        thumbnail_url: String::new(),
        kind: CategoryKind::ParentCapable { parent_id },
        level: if parent_id.is_some() { 1 } else { 0 },
        display_order,
        is_active: true,
        seo: SeoMeta::default(),
        created_at: None,
        updated_at: None,
    }
}

pub fn leaf_category(id: i64, name: &str, display_order: i32) -> Category {
    Category {
        kind: CategoryKind::LeafOnly,
        ..category(id, name, None, display_order)
    }
}

/// Store call, as recorded by [`FakeCategoryStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List,
    Create(CategoryPayload),
    Update(i64, CategoryPayload),
    Delete(i64),
    UpdateOrder(Vec<OrderUpdate>),
}

#[derive(Default)]
struct FakeState {
    records: Vec<Category>,
    next_id: i64,
    calls: Vec<StoreCall>,
    /// Errors handed out to the next calls, in order
    failures: VecDeque<AppError>,
    fail_lists: bool,
}

/// In-memory store. Writes mutate the record list so that a following
/// refresh observes them, the way the content API would.
#[derive(Default)]
pub struct FakeCategoryStore {
    state: Mutex<FakeState>,
}

impl FakeCategoryStore {
    pub fn with_records(records: Vec<Category>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(FakeState {
                records,
                next_id,
                ..Default::default()
            }),
        }
    }

    pub fn fail_next(&self, error: AppError) {
        self.state.lock().unwrap().failures.push_back(error);
    }

    pub fn set_list_failing(&self, failing: bool) {
        self.state.lock().unwrap().fail_lists = failing;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls other than `List`
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| *c != StoreCall::List)
            .collect()
    }

    pub fn list_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == StoreCall::List)
            .count()
    }

    fn record(&self, call: StoreCall) -> Result<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

fn apply_payload(target: &mut Category, payload: &CategoryPayload) {
    target.name = payload.name.clone();
    if let Some(slug) = &payload.slug {
        target.slug = slug.clone();
    }
    target.description = payload.description.clone();
    target.thumbnail_url = payload.thumbnail_url.clone().unwrap_or_default();
    target.kind = payload.kind;
    target.level = if payload.parent_id().is_some() { 1 } else { 0 };
    target.is_active = payload.is_active;
    target.seo = payload.seo.clone();
}

#[async_trait]
impl CategoryStore for FakeCategoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        let state = self.record(StoreCall::List)?;
        if state.fail_lists {
            return Err(AppError::Remote("connection refused".to_string()));
        }
        Ok(state.records.clone())
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<Category> {
        let mut state = self.record(StoreCall::Create(payload.clone()))?;
        let id = state.next_id;
        state.next_id += 1;
        let mut created = category(id, &payload.name, None, 0);
        apply_payload(&mut created, payload);
        state.records.push(created.clone());
        Ok(created)
    }

    async fn update_category(&self, id: i64, payload: &CategoryPayload) -> Result<Category> {
        let mut state = self.record(StoreCall::Update(id, payload.clone()))?;
        let target = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
        apply_payload(target, payload);
        Ok(target.clone())
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        let mut state = self.record(StoreCall::Delete(id))?;
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        if state.records.len() == before {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }
        Ok(())
    }

    async fn update_display_order(&self, updates: &[OrderUpdate]) -> Result<()> {
        let mut state = self.record(StoreCall::UpdateOrder(updates.to_vec()))?;
        for update in updates {
            if let Some(record) = state.records.iter_mut().find(|r| r.id == update.id) {
                record.display_order = update.display_order;
            }
        }
        Ok(())
    }
}
