pub mod booking;
pub mod identity;
pub mod repository;
pub mod notification;

pub use booking::{BookingRecord, BookingRequest, BookingStatus};
pub use booking::MAX_GUEST_COUNT;
pub use identity::{is_valid_email, Requester};
pub use notification::{ConfirmationParams, Notifier};
pub use repository::BookingRepository;

/// Failure of a storage gateway write or read.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// Failure of the confirmation dispatcher. Never fatal to a booking.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Email dispatch is not configured")]
    NotConfigured,
    #[error("Email dispatch failed: {0}")]
    DispatchFailed(String),
}

/// Result of a storage gateway call
pub type StorageResult<T> = Result<T, StorageError>;
