use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryFormDto, CategoryResponseDto, CategoryTreeDto, NavigationItemDto, ReorderResultDto,
};
use crate::features::categories::models::Category;
use crate::features::categories::ordering::{plan_move, MoveOp, SiblingGroup};
use crate::features::categories::payload::{prepare_payload, FormContext};
use crate::features::categories::store::CategoryStore;
use crate::features::categories::tree::{build_tree, CategoryForest};
use crate::shared::media_url::to_site_relative;

/// Records and forest from one completed fetch
#[derive(Debug, Default)]
pub struct TreeSnapshot {
    /// Ticket of the refresh that produced this snapshot; 0 before the first one
    pub generation: u64,
    pub records: Vec<Category>,
    pub forest: CategoryForest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched list is now the current snapshot
    Applied { generation: u64, total: usize },
    /// A newer refresh had already been installed; the result was dropped
    Stale { generation: u64, installed: u64 },
}

impl RefreshOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            RefreshOutcome::Applied { generation, .. } | RefreshOutcome::Stale { generation, .. } => {
                *generation
            }
        }
    }
}

/// Holds the category tree shown by the console and keeps it in step with the
/// content API. Every write is followed by a full refetch; the local tree is
/// never patched.
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
    rewrite_media_urls: bool,
    tickets: AtomicU64,
    snapshot: RwLock<Arc<TreeSnapshot>>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>, rewrite_media_urls: bool) -> Self {
        Self {
            store,
            rewrite_media_urls,
            tickets: AtomicU64::new(0),
            snapshot: RwLock::new(Arc::new(TreeSnapshot::default())),
        }
    }

    pub async fn snapshot(&self) -> Arc<TreeSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Refetch the flat list and rebuild the forest.
    ///
    /// A fetch failure installs an empty forest instead of failing. When
    /// refreshes overlap, only a result newer than the installed one is kept.
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;

        let records = match self.store.list_categories().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Category refresh #{} failed, showing empty tree: {}", ticket, e);
                Vec::new()
            }
        };
        let records = if self.rewrite_media_urls {
            records.into_iter().map(rewrite_media).collect()
        } else {
            records
        };
        let forest = build_tree(&records);

        let mut current = self.snapshot.write().await;
        if current.generation > ticket {
            tracing::debug!(
                "Dropping category refresh #{}; #{} is already installed",
                ticket,
                current.generation
            );
            return RefreshOutcome::Stale {
                generation: ticket,
                installed: current.generation,
            };
        }

        let total = records.len();
        *current = Arc::new(TreeSnapshot {
            generation: ticket,
            records,
            forest,
        });
        tracing::info!("Category tree refreshed (#{}, {} records)", ticket, total);

        RefreshOutcome::Applied {
            generation: ticket,
            total,
        }
    }

    /// Admin tree, inactive categories included
    pub async fn admin_tree(&self) -> (u64, usize, Vec<CategoryTreeDto>) {
        let snapshot = self.snapshot().await;
        let tree = snapshot.forest.roots().iter().map(Into::into).collect();
        (snapshot.generation, snapshot.records.len(), tree)
    }

    /// Public menu: active categories only, main categories at the top level
    pub async fn navigation(&self) -> Vec<NavigationItemDto> {
        let snapshot = self.snapshot().await;
        let active: Vec<Category> = snapshot
            .records
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect();

        let mut forest = build_tree(&active);
        forest.retain_roots(|root| root.category.is_main());
        forest.roots().iter().map(Into::into).collect()
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        self.snapshot()
            .await
            .records
            .iter()
            .find(|c| c.is_active && c.slug == slug)
            .map(CategoryResponseDto::from)
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    pub async fn active_categories(&self) -> Vec<Category> {
        self.snapshot()
            .await
            .records
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect()
    }

    pub async fn create(
        &self,
        form: CategoryFormDto,
        is_subcategory: bool,
        fixed_parent_id: Option<i64>,
    ) -> Result<CategoryResponseDto> {
        let ctx = match fixed_parent_id {
            Some(parent_id) => FormContext::create_child_of(parent_id),
            None => FormContext {
                is_subcategory,
                ..FormContext::create()
            },
        };
        let payload = prepare_payload(form, &ctx, &self.snapshot().await.forest)?;

        let result = self.store.create_category(&payload).await;
        self.refresh().await;

        let created = result.inspect_err(|e| tracing::warn!("Failed to create category: {}", e))?;
        tracing::info!("Category created: {} ({})", created.id, created.slug);
        Ok(created.into())
    }

    pub async fn update(&self, id: i64, form: CategoryFormDto) -> Result<CategoryResponseDto> {
        let snapshot = self.snapshot().await;
        let is_subcategory = snapshot
            .records
            .iter()
            .find(|c| c.id == id)
            .is_some_and(|c| !c.is_main());
        let payload = prepare_payload(form, &FormContext::edit(id, is_subcategory), &snapshot.forest)?;

        let result = self.store.update_category(id, &payload).await;
        self.refresh().await;

        let updated = result.inspect_err(|e| tracing::warn!("Failed to update category {}: {}", id, e))?;
        tracing::info!("Category updated: {}", id);
        Ok(updated.into())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = self.store.delete_category(id).await;
        self.refresh().await;

        result.inspect_err(|e| tracing::warn!("Failed to delete category {}: {}", id, e))?;
        tracing::info!("Category deleted: {}", id);
        Ok(())
    }

    /// Move one category within its sibling group and persist the new order.
    /// A no-op move sends nothing.
    pub async fn reorder(&self, group: SiblingGroup, op: MoveOp) -> Result<ReorderResultDto> {
        let sibling_ids = self
            .snapshot()
            .await
            .forest
            .sibling_ids(group)
            .ok_or_else(|| AppError::NotFound("Parent category not found".to_string()))?;

        let Some(updates) = plan_move(&sibling_ids, op)? else {
            return Ok(ReorderResultDto {
                applied: false,
                updates: Vec::new(),
            });
        };

        let result = self.store.update_display_order(&updates).await;
        self.refresh().await;

        result.inspect_err(|e| tracing::warn!("Failed to update category order: {}", e))?;
        Ok(ReorderResultDto {
            applied: true,
            updates,
        })
    }
}

fn rewrite_media(mut category: Category) -> Category {
    category.thumbnail_url = to_site_relative(&category.thumbnail_url);
    category.seo.og_image_url = to_site_relative(&category.seo.og_image_url);
    category
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::CategoryType;
    use crate::features::categories::ordering::OrderUpdate;
    use crate::features::categories::payload::CategoryPayload;
    use crate::shared::test_helpers::{category, FakeCategoryStore, StoreCall};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    fn records() -> Vec<Category> {
        vec![
            category(1, "Dự án", None, 1),
            category(2, "Dịch vụ", None, 2),
            category(3, "Biệt thự", Some(1), 2),
            category(4, "Nhà phố", Some(1), 1),
        ]
    }

    async fn service_with(records: Vec<Category>) -> (Arc<FakeCategoryStore>, CategoryService) {
        let store = Arc::new(FakeCategoryStore::with_records(records));
        let service = CategoryService::new(Arc::clone(&store) as Arc<dyn CategoryStore>, true);
        service.refresh().await;
        (store, service)
    }

    fn form(name: &str) -> CategoryFormDto {
        CategoryFormDto {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_refresh_builds_forest() {
        let (_, service) = service_with(records()).await;

        let snapshot = service.snapshot().await;

        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.forest.sibling_ids(SiblingGroup::Roots), Some(vec![1, 2]));
        assert_eq!(
            snapshot.forest.sibling_ids(SiblingGroup::ChildrenOf { parent_id: 1 }),
            Some(vec![4, 3])
        );
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let (_, service) = service_with(records()).await;
        let first = service.snapshot().await;

        service.refresh().await;
        let second = service.snapshot().await;

        assert_eq!(first.forest, second.forest);
        assert!(second.generation > first.generation);
    }

    #[tokio::test]
    async fn test_failed_fetch_installs_empty_forest() {
        let (store, service) = service_with(records()).await;
        store.set_list_failing(true);

        let outcome = service.refresh().await;

        assert!(matches!(outcome, RefreshOutcome::Applied { total: 0, .. }));
        assert!(service.snapshot().await.forest.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_rewrites_backend_media_urls() {
        let mut record = category(1, "Dự án", None, 1);
        record.thumbnail_url = "http://localhost:8080/uploads/a.jpg".to_string();
        let (_, service) = service_with(vec![record]).await;

        let snapshot = service.snapshot().await;

        assert_eq!(snapshot.records[0].thumbnail_url, "/uploads/a.jpg");
    }

    #[tokio::test]
    async fn test_create_subcategory_sends_fixed_parent_and_refreshes() {
        let (store, service) = service_with(records()).await;

        let mut f = form("Căn hộ");
        f.parent_id = Some(2);
        let created = service.create(f, true, Some(1)).await.unwrap();

        assert_eq!(created.parent_id, Some(1));
        assert_eq!(created.slug, "can-ho");
        assert_eq!(store.list_count(), 2);
        let snapshot = service.snapshot().await;
        assert!(snapshot
            .forest
            .sibling_ids(SiblingGroup::ChildrenOf { parent_id: 1 })
            .unwrap()
            .contains(&created.id));
    }

    #[tokio::test]
    async fn test_leaf_only_create_never_sends_parent() {
        let (store, service) = service_with(records()).await;

        let mut f = form("Tin tức");
        f.category_type = Some(CategoryType::Regular);
        f.parent_id = Some(1);
        service.create(f, true, Some(1)).await.unwrap();

        match &store.writes()[0] {
            StoreCall::Create(payload) => assert_eq!(payload.parent_id(), None),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_client_side_validation_sends_nothing() {
        let (store, service) = service_with(records()).await;

        let err = service.create(form(""), false, None).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.writes().is_empty());
        assert_eq!(store.list_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_still_refreshes() {
        let (store, service) = service_with(records()).await;
        store.fail_next(AppError::Remote("HTTP 500".to_string()));

        let err = service.update(2, form("Dịch vụ mới")).await.unwrap_err();

        assert!(matches!(err, AppError::Remote(_)));
        assert_eq!(store.list_count(), 2);
        assert_eq!(service.snapshot().await.generation, 2);
    }

    #[tokio::test]
    async fn test_update_of_subcategory_requires_parent() {
        let (store, service) = service_with(records()).await;

        let err = service.update(3, form("Biệt thự")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut f = form("Biệt thự");
        f.parent_id = Some(2);
        let updated = service.update(3, f).await.unwrap();
        assert_eq!(updated.parent_id, Some(2));
        assert_eq!(store.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_refetches_tree() {
        let (store, service) = service_with(records()).await;

        service.delete(2).await.unwrap();

        assert_eq!(store.writes(), vec![StoreCall::Delete(2)]);
        assert_eq!(
            service.snapshot().await.forest.sibling_ids(SiblingGroup::Roots),
            Some(vec![1])
        );
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let (store, service) = service_with(records()).await;

        let err = service.delete(99).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.list_count(), 2);
    }

    #[tokio::test]
    async fn test_reorder_sends_dense_batch() {
        let (store, service) = service_with(records()).await;

        let result = service
            .reorder(SiblingGroup::Roots, MoveOp::Up { index: 1 })
            .await
            .unwrap();

        let expected = vec![
            OrderUpdate { id: 2, display_order: 1 },
            OrderUpdate { id: 1, display_order: 2 },
        ];
        assert!(result.applied);
        assert_eq!(result.updates, expected);
        assert_eq!(store.writes(), vec![StoreCall::UpdateOrder(expected)]);
        assert_eq!(
            service.snapshot().await.forest.sibling_ids(SiblingGroup::Roots),
            Some(vec![2, 1])
        );
    }

    #[tokio::test]
    async fn test_failed_reorder_still_refreshes() {
        let (store, service) = service_with(records()).await;
        store.fail_next(AppError::Remote("HTTP 500 - Database error".to_string()));

        let err = service
            .reorder(SiblingGroup::Roots, MoveOp::Up { index: 1 })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Remote(_)));
        assert_eq!(store.list_count(), 2);
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.forest.sibling_ids(SiblingGroup::Roots), Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_noop_reorder_sends_nothing() {
        let (store, service) = service_with(records()).await;

        let result = service
            .reorder(
                SiblingGroup::ChildrenOf { parent_id: 1 },
                MoveOp::Down { index: 1 },
            )
            .await
            .unwrap();

        assert!(!result.applied);
        assert!(result.updates.is_empty());
        assert!(store.writes().is_empty());
        assert_eq!(store.list_count(), 1);
    }

    #[tokio::test]
    async fn test_reorder_in_unknown_group_is_not_found() {
        let (_, service) = service_with(records()).await;

        let err = service
            .reorder(
                SiblingGroup::ChildrenOf { parent_id: 3 },
                MoveOp::Up { index: 1 },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_navigation_uses_active_main_categories() {
        let mut hidden = category(5, "Ẩn", None, 0);
        hidden.is_active = false;
        let mut orphan = category(6, "Mồ côi", Some(77), 0);
        orphan.level = 1;
        let mut all = records();
        all.extend([hidden, orphan]);
        let (_, service) = service_with(all).await;

        let nav = service.navigation().await;

        let ids: Vec<i64> = nav.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(nav[0].children.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_slug_ignores_inactive() {
        let mut records = records();
        records[1].is_active = false;
        let (_, service) = service_with(records).await;

        assert_eq!(service.get_by_slug("du-an").await.unwrap().id, 1);
        assert!(matches!(
            service.get_by_slug("dich-vu").await,
            Err(AppError::NotFound(_))
        ));
    }

    /// Store whose list calls block until released, to force overlapping refreshes
    struct GatedStore {
        pending: Mutex<VecDeque<(oneshot::Receiver<()>, Vec<Category>)>>,
        started: AtomicUsize,
    }

    #[async_trait]
    impl CategoryStore for GatedStore {
        async fn list_categories(&self) -> Result<Vec<Category>> {
            let (gate, records) = self.pending.lock().unwrap().pop_front().unwrap();
            self.started.fetch_add(1, Ordering::SeqCst);
            gate.await.unwrap();
            Ok(records)
        }

        async fn create_category(&self, _: &CategoryPayload) -> Result<Category> {
            unimplemented!()
        }

        async fn update_category(&self, _: i64, _: &CategoryPayload) -> Result<Category> {
            unimplemented!()
        }

        async fn delete_category(&self, _: i64) -> Result<()> {
            unimplemented!()
        }

        async fn update_display_order(&self, _: &[OrderUpdate]) -> Result<()> {
            unimplemented!()
        }
    }

    async fn wait_until_started(store: &GatedStore, count: usize) {
        while store.started.load(Ordering::SeqCst) < count {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_late_response_of_older_refresh_is_discarded() {
        let (release_old, old_gate) = oneshot::channel();
        let (release_new, new_gate) = oneshot::channel();
        let store = Arc::new(GatedStore {
            pending: Mutex::new(VecDeque::from([
                (old_gate, vec![category(1, "Cũ", None, 1)]),
                (new_gate, vec![category(2, "Mới", None, 1)]),
            ])),
            started: AtomicUsize::new(0),
        });
        let service = Arc::new(CategoryService::new(
            Arc::clone(&store) as Arc<dyn CategoryStore>,
            false,
        ));

        let older = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.refresh().await }
        });
        wait_until_started(&store, 1).await;
        let newer = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.refresh().await }
        });
        wait_until_started(&store, 2).await;

        release_new.send(()).unwrap();
        let newer = newer.await.unwrap();
        release_old.send(()).unwrap();
        let older = older.await.unwrap();

        assert_eq!(newer, RefreshOutcome::Applied { generation: 2, total: 1 });
        assert_eq!(older, RefreshOutcome::Stale { generation: 1, installed: 2 });
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.records[0].name, "Mới");
    }
}
