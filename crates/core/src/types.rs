//! Shared domain records for quiet windows, notifications, and sweep
//! accounting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::TimeOfDay;

/// A daily do-not-disturb window for one subject.
///
/// `end <= start` means the window wraps past midnight: 22:00 -> 07:00
/// covers 22:00-23:59 and 00:00-06:59. Windows are immutable value objects;
/// an update replaces the window wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Window {
    pub fn new(subject_id: Uuid, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            start,
            end,
        }
    }

    /// Whether the window spans midnight.
    pub fn wraps(&self) -> bool {
        self.end <= self.start
    }
}

/// An outgoing notification as handed to the delivery core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub subject_id: Uuid,
    pub message: String,
    /// Opaque pass-through data for the transport (deep links, badges, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opaque_data: Option<serde_json::Value>,
    /// Instant the notification was generated / intended to fire.
    pub occurs_at: DateTime<Utc>,
    /// Absolute deadline after which delivery is pointless.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_expires_at: Option<DateTime<Utc>>,
}

/// A held notification awaiting the end of quiet hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedItem {
    pub payload: NotificationPayload,
    pub queued_at: DateTime<Utc>,
    /// Failed delivery attempts so far.
    #[serde(default)]
    pub attempts: u32,
}

/// Outcome of submitting a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Delivered,
    Queued,
}

/// Per-sweep accounting for one subject's queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResult {
    pub delivered: usize,
    pub expired: usize,
    /// Dropped after exhausting the delivery retry cap.
    pub failed: usize,
    pub remaining: usize,
}

impl SweepResult {
    /// Fold counts from another sweep into this one.
    pub fn merge(&mut self, other: &SweepResult) {
        self.delivered += other.delivered;
        self.expired += other.expired;
        self.failed += other.failed;
        self.remaining += other.remaining;
    }

    pub fn is_noop(&self) -> bool {
        *self == SweepResult::default()
    }
}
