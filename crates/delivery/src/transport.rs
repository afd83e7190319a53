//! Delivery transport seam — the push capability the queue signals, plus
//! in-memory implementations for tests and the demo binary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use quietsend_core::error::{QuietError, QuietResult};
use quietsend_core::types::NotificationPayload;

/// The external push capability (APNs/FCM bridge, webhook, ...). Failure is
/// a distinguishable outcome so the queue can decide retain-vs-drop.
pub trait DeliveryTransport: Send + Sync {
    fn deliver(&self, payload: &NotificationPayload) -> QuietResult<()>;
}

/// Discards everything, always succeeds.
pub struct NoopTransport;

impl DeliveryTransport for NoopTransport {
    fn deliver(&self, _payload: &NotificationPayload) -> QuietResult<()> {
        Ok(())
    }
}

/// Captures delivered payloads for assertions; can be switched into a
/// failing mode to exercise retry paths.
#[derive(Default)]
pub struct CaptureTransport {
    delivered: Mutex<Vec<NotificationPayload>>,
    fail: AtomicBool,
}

impl CaptureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::Relaxed);
    }

    pub fn delivered(&self) -> Vec<NotificationPayload> {
        self.delivered
            .lock()
            .expect("capture mutex poisoned")
            .clone()
    }

    pub fn count(&self) -> usize {
        self.delivered.lock().expect("capture mutex poisoned").len()
    }
}

impl DeliveryTransport for CaptureTransport {
    fn deliver(&self, payload: &NotificationPayload) -> QuietResult<()> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(QuietError::DeliveryFailure(
                "transport in failing mode".into(),
            ));
        }
        self.delivered
            .lock()
            .expect("capture mutex poisoned")
            .push(payload.clone());
        Ok(())
    }
}

/// Logs each send; stands in for a real push bridge in the demo binary.
pub struct LoggingTransport;

impl DeliveryTransport for LoggingTransport {
    fn deliver(&self, payload: &NotificationPayload) -> QuietResult<()> {
        tracing::info!(
            subject_id = %payload.subject_id,
            message = %payload.message,
            occurs_at = %payload.occurs_at,
            "delivering notification"
        );
        Ok(())
    }
}

/// Convenience: a no-op transport for wiring that doesn't care.
pub fn noop_transport() -> Arc<dyn DeliveryTransport> {
    Arc::new(NoopTransport)
}

/// Convenience: a capture transport for tests.
pub fn capture_transport() -> Arc<CaptureTransport> {
    Arc::new(CaptureTransport::new())
}
