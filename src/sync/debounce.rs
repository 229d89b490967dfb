use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Single re-armable timer for one pending side effect.
///
/// Arming while a previous job is still waiting replaces it, so a burst
/// of triggers collapses into the last-armed job; re-arming is the only
/// cancellation path. The job runs after a full quiet period.
pub struct DebounceTimer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// (Re)arm the timer with `job`.
    pub fn arm<F, Fut>(&mut self, job: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.disarm();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job().await;
        }));
    }

    /// Drop the pending job without running it.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a job is armed and has not finished.
    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}
