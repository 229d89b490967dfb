use tokio::sync::broadcast;

use crate::model::WardPlan;

/// A full-plan replacement event for one ward.
#[derive(Debug, Clone)]
pub struct PlanChange {
    pub ward_id: String,
    pub plan: WardPlan,
}

/// Source of remote plan changes.
///
/// Dropping the returned watch unsubscribes; there is no separate
/// unsubscribe call.
pub trait ChangeNotifier: Send + Sync {
    fn subscribe(&self, ward_id: &str) -> PlanWatch;
}

/// Receiver half of a subscription, filtered to a single ward.
pub struct PlanWatch {
    ward_id: String,
    rx: broadcast::Receiver<PlanChange>,
}

impl PlanWatch {
    /// Next remote plan for the subscribed ward, or `None` once the
    /// notifier is gone.
    ///
    /// Lagged receivers skip ahead: under last-write-wins only the most
    /// recent plan matters.
    pub async fn changed(&mut self) -> Option<WardPlan> {
        loop {
            match self.rx.recv().await {
                Ok(change) if change.ward_id == self.ward_id => return Some(change.plan),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Live push channel backed by a tokio broadcast.
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<PlanChange>,
}

impl BroadcastNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Deliver a change to all current subscribers. Nothing happens when
    /// no one is listening.
    pub fn publish(&self, change: PlanChange) {
        let _ = self.tx.send(change);
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn subscribe(&self, ward_id: &str) -> PlanWatch {
        PlanWatch {
            ward_id: ward_id.to_string(),
            rx: self.tx.subscribe(),
        }
    }
}

/// Poll-only deployments subscribe here and never hear anything.
pub struct NoopNotifier {
    // Held so subscribed watches stay open instead of reporting Closed.
    tx: broadcast::Sender<PlanChange>,
}

impl NoopNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }
}

impl Default for NoopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier for NoopNotifier {
    fn subscribe(&self, ward_id: &str) -> PlanWatch {
        PlanWatch {
            ward_id: ward_id.to_string(),
            rx: self.tx.subscribe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AreaId;

    #[tokio::test]
    async fn test_watch_filters_by_ward() {
        let notifier = BroadcastNotifier::new();
        let mut watch = notifier.subscribe("primavera");

        let mut other = WardPlan::empty();
        other.add_item(AreaId::Finding, "1".to_string());
        notifier.publish(PlanChange {
            ward_id: "jardines".to_string(),
            plan: other,
        });

        let mut mine = WardPlan::empty();
        mine.add_item(AreaId::Teaching, "2".to_string());
        notifier.publish(PlanChange {
            ward_id: "primavera".to_string(),
            plan: mine.clone(),
        });

        // The jardines event is skipped, the primavera one delivered.
        assert_eq!(watch.changed().await, Some(mine));
    }

    #[tokio::test]
    async fn test_watch_closes_with_notifier() {
        let notifier = BroadcastNotifier::new();
        let mut watch = notifier.subscribe("primavera");
        drop(notifier);
        assert_eq!(watch.changed().await, None);
    }
}
