use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use misional::config::{default_wards, WardSeed};
use misional::model::{AreaId, GoalPatch, Ward, WardPlan};
use misional::sync::{PlanEdit, SessionState, SyncController};
use misional::{MemoryWardStore, MisionalError, Result, WardStore};

const DEBOUNCE: Duration = Duration::from_millis(50);

/// Counts replace_plan calls on their way to the inner store.
struct CountingStore {
    inner: MemoryWardStore,
    persists: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryWardStore::new(),
            persists: AtomicUsize::new(0),
        }
    }

    fn persists(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WardStore for CountingStore {
    async fn initialize(&self, seeds: &[WardSeed]) -> Result<()> {
        self.inner.initialize(seeds).await
    }

    async fn find_by_passphrase(&self, candidate: &str) -> Result<Option<Ward>> {
        self.inner.find_by_passphrase(candidate).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ward>> {
        self.inner.find_by_id(id).await
    }

    async fn replace_plan(&self, id: &str, plan: &WardPlan) -> Result<()> {
        self.persists.fetch_add(1, Ordering::SeqCst);
        self.inner.replace_plan(id, plan).await
    }

    async fn list(&self) -> Result<Vec<Ward>> {
        self.inner.list().await
    }
}

#[tokio::test]
async fn debounce_collapses_rapid_edits_into_one_persist() {
    let store = Arc::new(CountingStore::new());
    store.initialize(&default_wards()).await.unwrap();
    let mut controller = SyncController::new(store.clone(), DEBOUNCE);
    controller.login("primavera").await.unwrap();

    let first = controller
        .apply_edit(AreaId::Finding, PlanEdit::Add)
        .unwrap()
        .expect("add returns the new id");
    for _ in 0..3 {
        controller
            .apply_edit(AreaId::Finding, PlanEdit::Add)
            .unwrap();
    }
    controller
        .apply_edit(
            AreaId::Finding,
            PlanEdit::Update {
                item_id: first.clone(),
                patch: GoalPatch {
                    what: Some("Contactar 3 familias".to_string()),
                    ..GoalPatch::default()
                },
            },
        )
        .unwrap();

    tokio::time::sleep(DEBOUNCE * 4).await;

    // One write, carrying all five edits in order.
    assert_eq!(store.persists(), 1);
    let stored = store.find_by_id("primavera").await.unwrap().unwrap();
    assert_eq!(stored.plan.finding.items.len(), 4);
    assert_eq!(stored.plan.finding.items[0].id, first);
    assert_eq!(stored.plan.finding.items[0].what, "Contactar 3 familias");
}

#[tokio::test]
async fn add_then_delete_leaves_item_count_unchanged() {
    let store = Arc::new(CountingStore::new());
    store.initialize(&default_wards()).await.unwrap();
    let mut controller = SyncController::new(store.clone(), DEBOUNCE);
    controller.login("primavera").await.unwrap();

    let before = controller.plan().unwrap().finding.items.len();
    let id = controller
        .apply_edit(AreaId::Finding, PlanEdit::Add)
        .unwrap()
        .unwrap();
    controller
        .apply_edit(AreaId::Finding, PlanEdit::Delete { item_id: id })
        .unwrap();

    tokio::time::sleep(DEBOUNCE * 4).await;

    assert_eq!(store.persists(), 1);
    let stored = store.find_by_id("primavera").await.unwrap().unwrap();
    assert_eq!(stored.plan.finding.items.len(), before);
}

#[tokio::test]
async fn primavera_scenario() {
    let store = Arc::new(MemoryWardStore::new());
    store.initialize(&default_wards()).await.unwrap();
    let mut controller = SyncController::new(store.clone(), DEBOUNCE);

    controller.login("primavera").await.unwrap();
    assert_eq!(controller.state(), SessionState::Ready);

    let plan = controller.plan().unwrap();
    for area in AreaId::ALL {
        assert_eq!(plan.area(area).id, area);
        assert!(plan.area(area).items.is_empty());
    }

    // Add a goal and name it.
    let id = controller
        .apply_edit(AreaId::Finding, PlanEdit::Add)
        .unwrap()
        .unwrap();
    controller
        .apply_edit(
            AreaId::Finding,
            PlanEdit::Update {
                item_id: id.clone(),
                patch: GoalPatch {
                    what: Some("Contact 3 families".to_string()),
                    ..GoalPatch::default()
                },
            },
        )
        .unwrap();
    controller.flush().await.unwrap();

    let stored = store.find_by_id("primavera").await.unwrap().unwrap();
    assert_eq!(stored.plan.finding.items.len(), 1);
    assert!(!stored.plan.finding.items[0].is_completed);
    assert_eq!(stored.plan.finding.items[0].what, "Contact 3 families");

    // Toggle completion; the text is untouched.
    controller
        .apply_edit(
            AreaId::Finding,
            PlanEdit::Update {
                item_id: id.clone(),
                patch: GoalPatch::completed(true),
            },
        )
        .unwrap();
    controller.flush().await.unwrap();

    let stored = store.find_by_id("primavera").await.unwrap().unwrap();
    assert!(stored.plan.finding.items[0].is_completed);
    assert_eq!(stored.plan.finding.items[0].what, "Contact 3 families");

    // Delete the goal.
    controller
        .apply_edit(AreaId::Finding, PlanEdit::Delete { item_id: id })
        .unwrap();
    controller.flush().await.unwrap();

    let stored = store.find_by_id("primavera").await.unwrap().unwrap();
    assert!(stored.plan.finding.items.is_empty());
}

#[tokio::test]
async fn login_storage_failure_is_not_authentication_failed() {
    let store = Arc::new(MemoryWardStore::new());
    store.initialize(&default_wards()).await.unwrap();
    store.set_available(false);

    let mut controller = SyncController::new(store.clone(), DEBOUNCE);
    let err = controller.login("primavera").await.unwrap_err();
    assert!(matches!(err, MisionalError::StorageUnavailable(_)));
}

#[tokio::test]
async fn fetch_failure_falls_back_to_empty_plan() {
    let store = Arc::new(MemoryWardStore::new());
    store.initialize(&default_wards()).await.unwrap();
    store.set_available(false);

    let mut controller = SyncController::new(store.clone(), DEBOUNCE);
    controller.select_ward("primavera").await.unwrap();

    // The session opens anyway, offline and empty.
    assert_eq!(controller.state(), SessionState::Ready);
    assert!(!controller.is_online());
    assert_eq!(controller.plan().unwrap(), WardPlan::empty());
}

#[tokio::test]
async fn persist_failure_keeps_optimistic_state() {
    let store = Arc::new(MemoryWardStore::new());
    store.initialize(&default_wards()).await.unwrap();

    let mut controller = SyncController::new(store.clone(), DEBOUNCE);
    controller.login("primavera").await.unwrap();

    store.set_available(false);
    let id = controller
        .apply_edit(AreaId::Teaching, PlanEdit::Add)
        .unwrap()
        .unwrap();
    let err = controller.flush().await.unwrap_err();
    assert!(matches!(err, MisionalError::StorageUnavailable(_)));
    assert!(!controller.is_online());

    // Local state survives the failed persist.
    assert_eq!(controller.plan().unwrap().teaching.items.len(), 1);

    // The next persist carries it forward.
    store.set_available(true);
    controller.flush().await.unwrap();
    assert!(controller.is_online());
    let stored = store.find_by_id("primavera").await.unwrap().unwrap();
    assert_eq!(stored.plan.teaching.items.len(), 1);
    assert_eq!(stored.plan.teaching.items[0].id, id);
}

#[tokio::test]
async fn remote_push_replaces_in_memory_plan() {
    let store = Arc::new(MemoryWardStore::new());
    store.initialize(&default_wards()).await.unwrap();

    let mut writer = SyncController::new(store.clone(), DEBOUNCE);
    let mut watcher = SyncController::new(store.clone(), DEBOUNCE);
    writer.login("primavera").await.unwrap();
    watcher.login("primavera").await.unwrap();
    watcher.watch_remote(store.notifier());

    writer
        .apply_edit(AreaId::Finding, PlanEdit::Add)
        .unwrap();
    writer.flush().await.unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(watcher.plan().unwrap().finding.items.len(), 1);
}

#[tokio::test]
async fn remote_push_wins_over_pending_local_edit() {
    let store = Arc::new(MemoryWardStore::new());
    store.initialize(&default_wards()).await.unwrap();

    let mut writer = SyncController::new(store.clone(), DEBOUNCE);
    let mut watcher = SyncController::new(store.clone(), DEBOUNCE);
    writer.login("primavera").await.unwrap();
    watcher.login("primavera").await.unwrap();
    watcher.watch_remote(store.notifier());

    // The watcher edits locally; its persist is still inside the quiet
    // period when the writer's push lands.
    watcher
        .apply_edit(AreaId::Teaching, PlanEdit::Add)
        .unwrap();
    assert!(watcher.persist_pending());

    writer
        .apply_edit(AreaId::Finding, PlanEdit::Add)
        .unwrap();
    writer.flush().await.unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    // The push replaced the watcher's plan wholesale; its local add is
    // gone. This is the accepted lost-update window of last-write-wins.
    let plan = watcher.plan().unwrap();
    assert!(plan.teaching.items.is_empty());
    assert_eq!(plan.finding.items.len(), 1);

    // When the watcher's pending persist fires it snapshots the replaced
    // plan, so the store converges on the pushed content.
    tokio::time::sleep(DEBOUNCE * 4).await;
    let stored = store.find_by_id("primavera").await.unwrap().unwrap();
    assert!(stored.plan.teaching.items.is_empty());
    assert_eq!(stored.plan.finding.items.len(), 1);
}
