//! Periodic recomputation of every user's snapshot.
//!
//! ```text
//! interval tick ──▶ SnapshotService::recalculate_all_users ──▶ BatchReport
//!       ▲                                                          │
//!       └──────────────────────── log, wait ◀──────────────────────┘
//! ```
//!
//! The first tick fires immediately on start.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::service::SnapshotService;

/// Handle for controlling the scheduler lifecycle.
pub struct SchedulerHandle {
    /// Channel for sending shutdown signal.
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the scheduler to stop and wait for the current pass to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            error!(error = %e, "Recalculation scheduler task panicked");
        }
    }
}

/// Background task that recomputes all snapshots on a fixed interval.
pub struct RecalculationScheduler {
    service: Arc<SnapshotService>,
    interval: Duration,
}

impl RecalculationScheduler {
    pub fn new(service: Arc<SnapshotService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Spawn the scheduler on the current tokio runtime.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(
                interval_secs = self.interval.as_secs(),
                "Recalculation scheduler started"
            );

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Recalculation scheduler shutting down");
                        break;
                    }

                    _ = ticker.tick() => {
                        match self.service.recalculate_all_users().await {
                            Ok(report) if !report.is_clean() => {
                                warn!(
                                    succeeded = report.succeeded,
                                    failed = report.failed.len(),
                                    "Scheduled recalculation finished with failures"
                                );
                            }
                            Ok(_) => {}
                            Err(e) => {
                                warn!(error = %e, "Scheduled recalculation could not list users");
                            }
                        }
                    }
                }
            }
        });

        SchedulerHandle { shutdown_tx, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::{InMemoryJournal, InMemorySnapshotStore};
    use crate::application::analytics::service::SnapshotPolicy;
    use crate::domain::id::UserId;

    #[tokio::test]
    async fn first_tick_recalculates_all_users() {
        let journal = Arc::new(InMemoryJournal::new());
        journal.register(UserId::new("a"));
        journal.register(UserId::new("b"));
        let store = Arc::new(InMemorySnapshotStore::new());
        let service = Arc::new(SnapshotService::new(
            journal.clone(),
            journal,
            store.clone(),
            SnapshotPolicy::default(),
        ));

        let handle = RecalculationScheduler::new(service, Duration::from_secs(3600)).start();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while store.len() < 2 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.shutdown().await;

        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn shutdown_stops_the_task() {
        let journal = Arc::new(InMemoryJournal::new());
        let store = Arc::new(InMemorySnapshotStore::new());
        let service = Arc::new(SnapshotService::new(
            journal.clone(),
            journal,
            store,
            SnapshotPolicy::default(),
        ));

        let handle = RecalculationScheduler::new(service, Duration::from_millis(5)).start();
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
            .await
            .expect("scheduler should stop promptly");
    }
}
