//! Per-subject FIFO queues of held notifications — the sole suppression
//! decision point, and the sweep that delivers, expires, or retains each
//! item.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use quietsend_core::error::QuietResult;
use quietsend_core::types::{NotificationPayload, QueuedItem, SubmitOutcome, SweepResult};

use crate::transport::DeliveryTransport;

/// Per-subject queues of suppressed notifications.
///
/// All mutation of one subject's queue happens under that subject's map
/// entry guard: `submit` and `sweep` for the same subject are mutually
/// exclusive, while different subjects proceed in parallel. A submit
/// arriving mid-sweep waits for the sweep to release the entry.
pub struct NotificationQueue {
    transport: Arc<dyn DeliveryTransport>,
    queues: DashMap<Uuid, Vec<QueuedItem>>,
    /// Items are dropped after this many failed delivery attempts;
    /// `0` retries forever.
    max_delivery_attempts: u32,
}

impl NotificationQueue {
    pub fn new(transport: Arc<dyn DeliveryTransport>, max_delivery_attempts: u32) -> Self {
        Self {
            transport,
            queues: DashMap::new(),
            max_delivery_attempts,
        }
    }

    /// Deliver immediately or hold, depending on the caller-computed quiet
    /// state. A transport failure on the immediate path is surfaced so the
    /// caller can decide whether to enqueue instead.
    pub fn submit(
        &self,
        payload: NotificationPayload,
        quiet: bool,
        now: DateTime<Utc>,
    ) -> QuietResult<SubmitOutcome> {
        let subject_id = payload.subject_id;

        if !quiet {
            if let Err(e) = self.transport.deliver(&payload) {
                metrics::counter!("delivery.failed").increment(1);
                return Err(e);
            }
            metrics::counter!("delivery.sent").increment(1);
            debug!(subject_id = %subject_id, "notification delivered immediately");
            return Ok(SubmitOutcome::Delivered);
        }

        self.queues
            .entry(subject_id)
            .or_default()
            .push(QueuedItem {
                payload,
                queued_at: now,
                attempts: 0,
            });
        metrics::counter!("delivery.queued").increment(1);
        debug!(subject_id = %subject_id, "notification held for quiet hours");
        Ok(SubmitOutcome::Queued)
    }

    /// One FIFO pass over a subject's queue: expire, deliver, or retain
    /// each held item.
    ///
    /// Expiry is checked before the quiet-state check, so a stale item is
    /// never delivered even once quiet hours have ended. Delivery failure
    /// retains the item in its original position for a later sweep; the
    /// subject's entry is removed entirely when nothing is left. Sweeping a
    /// subject with nothing pending is a no-op returning zero counts.
    pub fn sweep(&self, subject_id: &Uuid, now_quiet: bool, now: DateTime<Utc>) -> SweepResult {
        let mut occupied = match self.queues.entry(*subject_id) {
            Entry::Occupied(occupied) => occupied,
            Entry::Vacant(_) => return SweepResult::default(),
        };

        let drained = std::mem::take(occupied.get_mut());
        let mut kept = Vec::with_capacity(drained.len());
        let mut result = SweepResult::default();

        for mut item in drained {
            if let Some(deadline) = item.payload.relevance_expires_at {
                if now > deadline {
                    result.expired += 1;
                    metrics::counter!("delivery.expired").increment(1);
                    debug!(
                        subject_id = %subject_id,
                        deadline = %deadline,
                        "dropped expired notification"
                    );
                    continue;
                }
            }

            if now_quiet {
                result.remaining += 1;
                kept.push(item);
                continue;
            }

            match self.transport.deliver(&item.payload) {
                Ok(()) => {
                    result.delivered += 1;
                    metrics::counter!("delivery.sent").increment(1);
                }
                Err(e) => {
                    item.attempts += 1;
                    if self.max_delivery_attempts > 0
                        && item.attempts >= self.max_delivery_attempts
                    {
                        result.failed += 1;
                        metrics::counter!("delivery.dropped_failed").increment(1);
                        warn!(
                            subject_id = %subject_id,
                            attempts = item.attempts,
                            error = %e,
                            "dropped notification after exhausting delivery attempts"
                        );
                    } else {
                        result.remaining += 1;
                        warn!(
                            subject_id = %subject_id,
                            attempts = item.attempts,
                            error = %e,
                            "delivery failed, retaining for retry"
                        );
                        kept.push(item);
                    }
                }
            }
        }

        if kept.is_empty() {
            occupied.remove();
        } else {
            *occupied.get_mut() = kept;
        }
        result
    }

    /// Read-only snapshot of a subject's held items, FIFO order.
    pub fn peek(&self, subject_id: &Uuid) -> Vec<QueuedItem> {
        self.queues
            .get(subject_id)
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Subjects that currently have held items.
    pub fn subjects_with_pending(&self) -> Vec<Uuid> {
        self.queues.iter().map(|e| *e.key()).collect()
    }

    pub fn pending_count(&self, subject_id: &Uuid) -> usize {
        self.queues.get(subject_id).map(|q| q.len()).unwrap_or(0)
    }
}
