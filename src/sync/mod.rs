//! Client-side state synchronization: optimistic edits, debounced
//! persistence, optional remote reconciliation.

mod controller;
mod debounce;
mod notify;

pub use controller::{PlanEdit, SessionState, SyncController};
pub use debounce::DebounceTimer;
pub use notify::{BroadcastNotifier, ChangeNotifier, NoopNotifier, PlanChange, PlanWatch};
