//! Deferred notification delivery — per-subject FIFO queues of suppressed
//! notifications, the transport seam, and the sweep scheduler.

pub mod queue;
pub mod scheduler;
pub mod transport;

pub use queue::NotificationQueue;
pub use scheduler::DeliveryScheduler;
pub use transport::DeliveryTransport;
