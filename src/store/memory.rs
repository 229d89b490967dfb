use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::WardSeed;
use crate::error::{MisionalError, Result};
use crate::model::{Ward, WardPlan};
use crate::sync::{BroadcastNotifier, PlanChange};

use super::WardStore;

/// In-memory ward store with change broadcast, the real-time counterpart
/// of [`super::SqliteWardStore`]. Every plan replacement is pushed to
/// current subscribers of the notifier.
pub struct MemoryWardStore {
    wards: RwLock<HashMap<String, Ward>>,
    notifier: BroadcastNotifier,
    available: AtomicBool,
}

impl MemoryWardStore {
    pub fn new() -> Self {
        Self {
            wards: RwLock::new(HashMap::new()),
            notifier: BroadcastNotifier::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Change feed that live sessions can subscribe to.
    pub fn notifier(&self) -> &BroadcastNotifier {
        &self.notifier
    }

    /// Fault injection: while unavailable, every operation fails with
    /// StorageUnavailable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(MisionalError::StorageUnavailable(
                "ward store offline".to_string(),
            ))
        }
    }
}

impl Default for MemoryWardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WardStore for MemoryWardStore {
    async fn initialize(&self, seeds: &[WardSeed]) -> Result<()> {
        self.check_available()?;
        let mut wards = self.wards.write().await;
        for seed in seeds {
            wards.entry(seed.id.clone()).or_insert_with(|| Ward {
                id: seed.id.clone(),
                name: seed.name.clone(),
                passphrase: seed.resolved_passphrase().to_string(),
                plan: WardPlan::empty(),
            });
        }
        Ok(())
    }

    async fn find_by_passphrase(&self, candidate: &str) -> Result<Option<Ward>> {
        self.check_available()?;
        let wards = self.wards.read().await;
        Ok(wards.values().find(|w| w.passphrase == candidate).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ward>> {
        self.check_available()?;
        Ok(self.wards.read().await.get(id).cloned())
    }

    async fn replace_plan(&self, id: &str, plan: &WardPlan) -> Result<()> {
        self.check_available()?;
        let mut wards = self.wards.write().await;
        let ward = wards
            .get_mut(id)
            .ok_or_else(|| MisionalError::WardNotFound(id.to_string()))?;
        ward.plan = plan.clone();
        self.notifier.publish(PlanChange {
            ward_id: id.to_string(),
            plan: plan.clone(),
        });
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Ward>> {
        self.check_available()?;
        let mut wards: Vec<Ward> = self.wards.read().await.values().cloned().collect();
        wards.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(wards)
    }
}
