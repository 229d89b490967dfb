use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{MisionalError, Result};
use crate::model::{next_goal_id, AreaId, GoalPatch, Ward, WardPlan};
use crate::store::WardStore;

use super::debounce::DebounceTimer;
use super::notify::ChangeNotifier;

/// Lifecycle of the active ward session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Unauthenticated = 0,
    Loading = 1,
    Ready = 2,
    Saving = 3,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SessionState::Loading,
            2 => SessionState::Ready,
            3 => SessionState::Saving,
            _ => SessionState::Unauthenticated,
        }
    }
}

/// One UI edit intent.
#[derive(Debug, Clone)]
pub enum PlanEdit {
    /// Append a fresh goal to the area; the generated id is returned.
    Add,
    /// Merge a field patch into the goal with this id.
    Update { item_id: String, patch: GoalPatch },
    /// Remove the goal with this id.
    Delete { item_id: String },
}

/// State shared with the persist timer and the remote listener.
struct SessionInner {
    ward_id: String,
    ward_name: String,
    plan: Mutex<WardPlan>,
    state: AtomicU8,
    online: AtomicBool,
    last_goal_id: AtomicU64,
}

impl SessionInner {
    fn plan(&self) -> MutexGuard<'_, WardPlan> {
        self.plan.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: SessionState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    fn next_goal_id(&self) -> String {
        // Single mutation path per session, so load/store is enough.
        let id = next_goal_id(self.last_goal_id.load(Ordering::SeqCst));
        self.last_goal_id.store(id, Ordering::SeqCst);
        id.to_string()
    }
}

/// Bridge between edit intents and the ward store.
///
/// Owns the in-memory plan of the active session, applies edits
/// optimistically, and persists full snapshots behind a debounce window.
/// Created empty; a session starts on [`login`](Self::login) or
/// [`select_ward`](Self::select_ward) and ends on
/// [`logout`](Self::logout).
pub struct SyncController {
    store: Arc<dyn WardStore>,
    debounce: DebounceTimer,
    session: Option<Arc<SessionInner>>,
    listener: Option<tokio::task::JoinHandle<()>>,
    loading: bool,
}

impl SyncController {
    pub fn new(store: Arc<dyn WardStore>, debounce_window: Duration) -> Self {
        Self {
            store,
            debounce: DebounceTimer::new(debounce_window),
            session: None,
            listener: None,
            loading: false,
        }
    }

    /// Authenticate with a passphrase and enter the matched ward.
    ///
    /// No match is `AuthenticationFailed`; a storage failure propagates
    /// as `StorageUnavailable` so the caller can tell them apart.
    pub async fn login(&mut self, passphrase: &str) -> Result<()> {
        self.logout();
        self.loading = true;
        let result = self.store.find_by_passphrase(passphrase).await;
        self.loading = false;

        let ward = result?.ok_or(MisionalError::AuthenticationFailed)?;
        self.start_session(ward, true);
        Ok(())
    }

    /// Enter a ward directly by id.
    ///
    /// A storage failure during the fetch falls back to an empty plan so
    /// the session still opens, marked offline. The risk is inherited
    /// from the availability-first contract: editing in this state can
    /// overwrite real remote data once persistence recovers.
    pub async fn select_ward(&mut self, id: &str) -> Result<()> {
        self.logout();
        self.loading = true;
        let result = self.store.find_by_id(id).await;
        self.loading = false;

        match result {
            Ok(Some(ward)) => {
                self.start_session(ward, true);
                Ok(())
            }
            Ok(None) => Err(MisionalError::WardNotFound(id.to_string())),
            Err(MisionalError::StorageUnavailable(msg)) => {
                warn!(ward = id, error = %msg, "fetch failed, entering with empty plan");
                let ward = Ward {
                    id: id.to_string(),
                    name: id.to_string(),
                    passphrase: String::new(),
                    plan: WardPlan::empty(),
                };
                self.start_session(ward, false);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn start_session(&mut self, ward: Ward, online: bool) {
        self.session = Some(Arc::new(SessionInner {
            ward_id: ward.id,
            ward_name: ward.name,
            plan: Mutex::new(ward.plan),
            state: AtomicU8::new(SessionState::Ready as u8),
            online: AtomicBool::new(online),
            last_goal_id: AtomicU64::new(0),
        }));
    }

    /// Apply an edit to the in-memory plan and schedule a persist.
    ///
    /// The local mutation is synchronous so callers can re-render with
    /// zero perceived latency; durability follows after the quiet
    /// period. Update and Delete are silent no-ops when the item id is
    /// gone, since a deletion may race an in-flight edit.
    pub fn apply_edit(&mut self, area: AreaId, edit: PlanEdit) -> Result<Option<String>> {
        let session = self.require_session()?;

        let new_id = {
            let mut plan = session.plan();
            match edit {
                PlanEdit::Add => {
                    let id = session.next_goal_id();
                    plan.add_item(area, id.clone());
                    Some(id)
                }
                PlanEdit::Update { item_id, patch } => {
                    plan.update_item(area, &item_id, &patch);
                    None
                }
                PlanEdit::Delete { item_id } => {
                    plan.remove_item(area, &item_id);
                    None
                }
            }
        };

        let store = self.store.clone();
        self.debounce.arm(move || persist_snapshot(store, session));
        Ok(new_id)
    }

    /// Persist the current plan immediately, skipping the quiet period.
    pub async fn flush(&mut self) -> Result<()> {
        let Some(session) = self.session.clone() else {
            return Ok(());
        };
        self.debounce.disarm();

        session.set_state(SessionState::Saving);
        let snapshot = session.plan().clone();
        let result = self.store.replace_plan(&session.ward_id, &snapshot).await;
        session.online.store(result.is_ok(), Ordering::SeqCst);
        session.set_state(SessionState::Ready);
        result
    }

    /// Feed remote plan replacements into this session.
    ///
    /// A pushed plan replaces the in-memory one unconditionally, even
    /// with a local persist pending; the pending persist will then write
    /// whatever the plan holds at fire time. That lost-update window is
    /// part of the last-write-wins contract, not something to repair
    /// here.
    pub fn watch_remote(&mut self, notifier: &dyn ChangeNotifier) {
        if let Some(handle) = self.listener.take() {
            handle.abort();
        }
        let Some(session) = self.session.clone() else {
            return;
        };
        let mut watch = notifier.subscribe(&session.ward_id);
        self.listener = Some(tokio::spawn(async move {
            while let Some(plan) = watch.changed().await {
                debug!(ward = %session.ward_id, "remote plan received");
                *session.plan() = plan;
            }
        }));
    }

    /// Drop the session, the remote listener, and any pending persist.
    /// An edit still inside its quiet period is lost, as documented.
    pub fn logout(&mut self) {
        self.debounce.disarm();
        if let Some(handle) = self.listener.take() {
            handle.abort();
        }
        self.session = None;
    }

    pub fn state(&self) -> SessionState {
        if self.loading {
            return SessionState::Loading;
        }
        match &self.session {
            Some(session) => session.state(),
            None => SessionState::Unauthenticated,
        }
    }

    pub fn ward_id(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.ward_id.clone())
    }

    pub fn ward_name(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.ward_name.clone())
    }

    /// Copy of the in-memory plan for rendering.
    pub fn plan(&self) -> Option<WardPlan> {
        self.session.as_ref().map(|s| s.plan().clone())
    }

    /// Last known persistence/fetch outcome, for the connectivity
    /// indicator. True when no session is active.
    pub fn is_online(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.online.load(Ordering::SeqCst))
            .unwrap_or(true)
    }

    /// True while an edit awaits its debounced persist.
    pub fn persist_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    fn require_session(&self) -> Result<Arc<SessionInner>> {
        self.session
            .clone()
            .ok_or_else(|| MisionalError::ValidationFailed {
                field: "session".to_string(),
                message: "no active ward session".to_string(),
            })
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.take() {
            handle.abort();
        }
    }
}

/// Snapshot the current plan and issue one replacement write.
async fn persist_snapshot(store: Arc<dyn WardStore>, session: Arc<SessionInner>) {
    session.set_state(SessionState::Saving);
    let snapshot = session.plan().clone();
    match store.replace_plan(&session.ward_id, &snapshot).await {
        Ok(()) => {
            session.online.store(true, Ordering::SeqCst);
            debug!(ward = %session.ward_id, "plan persisted");
        }
        Err(e) => {
            // Optimistic state stays; the next persist carries it forward.
            session.online.store(false, Ordering::SeqCst);
            warn!(ward = %session.ward_id, error = %e, "persist failed");
        }
    }
    session.set_state(SessionState::Ready);
}
