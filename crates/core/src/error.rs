use thiserror::Error;
use uuid::Uuid;

pub type QuietResult<T> = Result<T, QuietError>;

#[derive(Error, Debug)]
pub enum QuietError {
    #[error("Invalid time format: {0:?} (expected zero-padded 24-hour HH:mm)")]
    InvalidFormat(String),

    #[error("Window start and end are equal")]
    SameStartEnd,

    #[error("Window overlaps existing window {conflicting_id}")]
    Overlap { conflicting_id: Uuid },

    #[error("Window {0} not found")]
    NotFound(Uuid),

    #[error("Delivery transport failure: {0}")]
    DeliveryFailure(String),
}
