//! Sweep scheduler — recomputes quietness per subject from the current
//! window set and drains eligible queues, periodically or on demand.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use quietsend_core::error::QuietResult;
use quietsend_core::types::{NotificationPayload, SubmitOutcome, SweepResult};
use quietsend_windows::evaluator;
use quietsend_windows::WindowStore;

use crate::queue::NotificationQueue;

/// Drives sweeps across all subjects with pending items. Quietness is
/// recomputed from the subject's current window set on every pass, so
/// window edits made while items are held take effect at the next sweep.
pub struct DeliveryScheduler {
    queue: Arc<NotificationQueue>,
    store: Arc<dyn WindowStore>,
    sweep_interval: Duration,
}

impl DeliveryScheduler {
    pub fn new(
        queue: Arc<NotificationQueue>,
        store: Arc<dyn WindowStore>,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            queue,
            store,
            sweep_interval,
        }
    }

    /// Inbound submission: evaluate quietness for the payload's subject and
    /// deliver or hold.
    pub fn submit(&self, payload: NotificationPayload) -> QuietResult<SubmitOutcome> {
        self.submit_at(payload, Utc::now())
    }

    pub fn submit_at(
        &self,
        payload: NotificationPayload,
        now: DateTime<Utc>,
    ) -> QuietResult<SubmitOutcome> {
        let windows = self.store.list_windows(&payload.subject_id);
        let quiet = evaluator::is_quiet_at(&windows, &now);
        self.queue.submit(payload, quiet, now)
    }

    /// On-demand sweep for one subject against its current window set.
    pub fn sweep_subject(&self, subject_id: &Uuid) -> SweepResult {
        self.sweep_subject_at(subject_id, Utc::now())
    }

    pub fn sweep_subject_at(&self, subject_id: &Uuid, now: DateTime<Utc>) -> SweepResult {
        let windows = self.store.list_windows(subject_id);
        let quiet = evaluator::is_quiet_at(&windows, &now);
        self.queue.sweep(subject_id, quiet, now)
    }

    /// Sweep every subject with pending items; merged counts.
    pub fn sweep_all(&self) -> SweepResult {
        self.sweep_all_at(Utc::now())
    }

    pub fn sweep_all_at(&self, now: DateTime<Utc>) -> SweepResult {
        let mut total = SweepResult::default();
        for subject_id in self.queue.subjects_with_pending() {
            total.merge(&self.sweep_subject_at(&subject_id, now));
        }
        if !total.is_noop() {
            debug!(
                delivered = total.delivered,
                expired = total.expired,
                failed = total.failed,
                remaining = total.remaining,
                "sweep pass completed"
            );
        }
        total
    }

    /// Periodic sweep loop. Runs until `shutdown` flips true, then performs
    /// one final drain pass and reports anything still held.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.sweep_interval);
        info!(
            interval_secs = self.sweep_interval.as_secs(),
            "delivery scheduler started"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.sweep_all();
                }
                changed = shutdown.changed() => {
                    // A closed sender counts as shutdown too.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let last = self.sweep_all();
        if last.remaining > 0 {
            warn!(
                remaining = last.remaining,
                "scheduler shutting down with notifications still held"
            );
        }
        info!("delivery scheduler stopped");
    }
}
